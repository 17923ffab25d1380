//! # Qubit Mapping Module
//!
//! Encodes second-quantized operators as [`QubitOperator`]s.
//!
//! Every mapping is described by a [`ModeTable`]: for each mode `j` a pair of
//! Pauli strings `(real, imag)` such that
//!
//! ```text
//! a†_j = ½ (real_j − i·imag_j)        a_j = ½ (real_j + i·imag_j)
//! ```
//!
//! Mapping an operator then reduces to multiplying the mapped ladder factors
//! of each term. The fermionic encodings ([`jordan_wigner`], [`parity`],
//! [`bravyi_kitaev`]) differ only in how parity information is spread across
//! the qubits; the [`direct`] encoding assigns one qubit per vibrational modal
//! without any parity strings. [`tapering`] removes the two qubits of the
//! parity encoding fixed by particle-number symmetry.

pub mod bravyi_kitaev;
pub mod direct;
pub mod jordan_wigner;
pub mod parity;
pub mod tapering;

use crate::core::models::descriptor::ProblemClass;
use crate::core::operators::ladder::{Ladder, LadderOperator};
use crate::core::operators::pauli::{MAX_QUBITS, PauliString};
use crate::core::operators::qubit::{DEFAULT_ATOL, QubitOperator};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MappingError {
    #[error("The {mapping} mapping is not implemented for {problem} problems")]
    Unsupported {
        mapping: Mapping,
        problem: ProblemClass,
    },

    #[error("{modes} modes exceed the {max}-qubit register limit")]
    TooManyModes { modes: usize, max: usize },

    #[error("Operator acts with {pauli} on tapered qubit {qubit}, which breaks the particle-number symmetry")]
    SymmetryViolation { qubit: usize, pauli: char },

    #[error("Two-qubit reduction requires the particle numbers of the problem")]
    MissingParticleNumbers,

    #[error("Two-qubit reduction is only defined for the parity mapping, not {0}")]
    ReductionRequiresParity(Mapping),

    #[error("Operator references mode {mode} but the encoding has {num_modes} modes")]
    ModeOutOfRange { mode: usize, num_modes: usize },
}

/// The qubit encoding applied to a second-quantized operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mapping {
    JordanWigner,
    Parity,
    BravyiKitaev,
    Direct,
}

impl Mapping {
    pub const ALL: [Mapping; 4] = [
        Mapping::JordanWigner,
        Mapping::Parity,
        Mapping::BravyiKitaev,
        Mapping::Direct,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Mapping::JordanWigner => "jordan-wigner",
            Mapping::Parity => "parity",
            Mapping::BravyiKitaev => "bravyi-kitaev",
            Mapping::Direct => "direct",
        }
    }

    pub fn supports(self, problem: ProblemClass) -> bool {
        matches!(
            (self, problem),
            (
                Mapping::JordanWigner | Mapping::Parity | Mapping::BravyiKitaev,
                ProblemClass::Electronic
            ) | (Mapping::Direct, ProblemClass::Vibrational)
        )
    }

    /// Default mapping for a problem class.
    pub fn default_for(problem: ProblemClass) -> Self {
        match problem {
            ProblemClass::Electronic => Mapping::JordanWigner,
            ProblemClass::Vibrational => Mapping::Direct,
        }
    }

    /// Builds the mode table for `num_modes` modes of a `problem`-class operator.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::Unsupported`] when the mapping is not defined for
    /// the problem class and [`MappingError::TooManyModes`] when the register
    /// would exceed the Pauli-string width.
    pub fn mode_table(self, num_modes: usize, problem: ProblemClass) -> Result<ModeTable, MappingError> {
        if !self.supports(problem) {
            return Err(MappingError::Unsupported {
                mapping: self,
                problem,
            });
        }
        if num_modes > MAX_QUBITS {
            return Err(MappingError::TooManyModes {
                modes: num_modes,
                max: MAX_QUBITS,
            });
        }
        let pairs = match self {
            Mapping::JordanWigner => jordan_wigner::pauli_table(num_modes),
            Mapping::Parity => parity::pauli_table(num_modes),
            Mapping::BravyiKitaev => bravyi_kitaev::pauli_table(num_modes),
            Mapping::Direct => direct::pauli_table(num_modes),
        };
        Ok(ModeTable::new(pairs))
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Mapping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "jordan-wigner" | "jw" => Ok(Mapping::JordanWigner),
            "parity" => Ok(Mapping::Parity),
            "bravyi-kitaev" | "bk" => Ok(Mapping::BravyiKitaev),
            "direct" => Ok(Mapping::Direct),
            _ => Err(format!(
                "unknown mapping '{s}' (expected one of: jordan-wigner, parity, bravyi-kitaev, direct)"
            )),
        }
    }
}

/// The (real, imaginary) Pauli pair of every mode of an encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeTable {
    pairs: Vec<(PauliString, PauliString)>,
    create: Vec<QubitOperator>,
    annihilate: Vec<QubitOperator>,
}

impl ModeTable {
    pub fn new(pairs: Vec<(PauliString, PauliString)>) -> Self {
        let n = pairs.len();
        let half = Complex64::new(0.5, 0.0);
        let half_i = Complex64::new(0.0, 0.5);
        let create = pairs
            .iter()
            .map(|(real, imag)| QubitOperator::from_terms(n, [(*real, half), (*imag, -half_i)]))
            .collect();
        let annihilate = pairs
            .iter()
            .map(|(real, imag)| QubitOperator::from_terms(n, [(*real, half), (*imag, half_i)]))
            .collect();
        Self {
            pairs,
            create,
            annihilate,
        }
    }

    pub fn num_modes(&self) -> usize {
        self.pairs.len()
    }

    pub fn pairs(&self) -> &[(PauliString, PauliString)] {
        &self.pairs
    }

    pub fn creation(&self, mode: usize) -> &QubitOperator {
        &self.create[mode]
    }

    pub fn annihilation(&self, mode: usize) -> &QubitOperator {
        &self.annihilate[mode]
    }

    /// Maps every term of `op` by multiplying its mapped ladder factors.
    pub fn map(&self, op: &LadderOperator) -> Result<QubitOperator, MappingError> {
        let n = self.num_modes();
        if let Some(mode) = op.max_mode().filter(|&m| m >= n) {
            return Err(MappingError::ModeOutOfRange { mode, num_modes: n });
        }
        let mut result = QubitOperator::zero(n);
        for (factors, coefficient) in op.terms() {
            let mut product = QubitOperator::identity(n, *coefficient);
            for factor in factors {
                let mapped = match factor.kind {
                    Ladder::Create => &self.create[factor.mode],
                    Ladder::Annihilate => &self.annihilate[factor.mode],
                };
                product = product.compose(mapped);
                if product.is_zero() {
                    break;
                }
            }
            for (string, c) in product.terms() {
                result.add_term(*string, *c);
            }
        }
        Ok(result.simplify(DEFAULT_ATOL))
    }

    /// Basis state reached by creating every mode in `occupied` from the vacuum.
    pub fn occupation_state(&self, occupied: impl IntoIterator<Item = usize>) -> u64 {
        occupied
            .into_iter()
            .fold(0, |state, mode| state ^ self.pairs[mode].0.x_mask())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::operators::ladder::LadderFactor;

    fn anticommutator(a: &QubitOperator, b: &QubitOperator) -> QubitOperator {
        &(a * b) + &(b * a)
    }

    fn assert_car(mapping: Mapping, num_modes: usize) {
        let table = mapping
            .mode_table(num_modes, ProblemClass::Electronic)
            .unwrap();
        let identity = QubitOperator::identity(num_modes, Complex64::new(1.0, 0.0));
        for i in 0..num_modes {
            for j in 0..num_modes {
                let aa = anticommutator(table.annihilation(i), table.annihilation(j));
                assert!(aa.is_zero(), "{mapping}: {{a_{i}, a_{j}}} != 0");
                let ad = anticommutator(table.annihilation(i), table.creation(j));
                if i == j {
                    assert_eq!(ad, identity, "{mapping}: {{a_{i}, a†_{i}}} != 1");
                } else {
                    assert!(ad.is_zero(), "{mapping}: {{a_{i}, a†_{j}}} != 0");
                }
            }
        }
    }

    #[test]
    fn jordan_wigner_satisfies_anticommutation_relations() {
        assert_car(Mapping::JordanWigner, 5);
    }

    #[test]
    fn parity_satisfies_anticommutation_relations() {
        assert_car(Mapping::Parity, 5);
    }

    #[test]
    fn bravyi_kitaev_satisfies_anticommutation_relations() {
        assert_car(Mapping::BravyiKitaev, 5);
        assert_car(Mapping::BravyiKitaev, 6);
        assert_car(Mapping::BravyiKitaev, 8);
    }

    #[test]
    fn mode_table_rejects_unsupported_problem_class() {
        let result = Mapping::Direct.mode_table(4, ProblemClass::Electronic);
        assert_eq!(
            result.unwrap_err(),
            MappingError::Unsupported {
                mapping: Mapping::Direct,
                problem: ProblemClass::Electronic
            }
        );
        assert!(
            Mapping::JordanWigner
                .mode_table(4, ProblemClass::Vibrational)
                .is_err()
        );
    }

    #[test]
    fn mode_table_rejects_oversized_register() {
        let result = Mapping::JordanWigner.mode_table(65, ProblemClass::Electronic);
        assert!(matches!(
            result,
            Err(MappingError::TooManyModes { modes: 65, .. })
        ));
    }

    #[test]
    fn number_operator_maps_to_half_identity_minus_half_z() {
        let table = Mapping::JordanWigner
            .mode_table(2, ProblemClass::Electronic)
            .unwrap();
        let op = LadderOperator::one_body(2, 1, 1, 1.0);
        let mapped = table.map(&op).unwrap();
        assert_eq!(mapped.num_terms(), 2);
        assert_eq!(mapped.constant(), Complex64::new(0.5, 0.0));
        assert_eq!(
            mapped.coefficient(&PauliString::from_label("ZI").unwrap()),
            Complex64::new(-0.5, 0.0)
        );
    }

    #[test]
    fn map_rejects_modes_outside_table() {
        let table = Mapping::JordanWigner
            .mode_table(2, ProblemClass::Electronic)
            .unwrap();
        let mut op = LadderOperator::zero(3);
        op.add_term(
            vec![LadderFactor::create(2), LadderFactor::annihilate(2)],
            Complex64::new(1.0, 0.0),
        );
        assert_eq!(
            table.map(&op).unwrap_err(),
            MappingError::ModeOutOfRange {
                mode: 2,
                num_modes: 2
            }
        );
    }

    #[test]
    fn occupation_state_follows_encoding() {
        let jw = Mapping::JordanWigner
            .mode_table(4, ProblemClass::Electronic)
            .unwrap();
        assert_eq!(jw.occupation_state([0, 2]), 0b0101);
        let parity = Mapping::Parity
            .mode_table(4, ProblemClass::Electronic)
            .unwrap();
        assert_eq!(parity.occupation_state([0, 2]), 0b0011);
    }

    #[test]
    fn mapping_parses_aliases() {
        assert_eq!("JW".parse::<Mapping>().unwrap(), Mapping::JordanWigner);
        assert_eq!("bravyi_kitaev".parse::<Mapping>().unwrap(), Mapping::BravyiKitaev);
        assert!("qubit".parse::<Mapping>().is_err());
    }
}
