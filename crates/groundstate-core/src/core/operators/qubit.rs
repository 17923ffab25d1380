use super::pauli::PauliString;
use nalgebra::DMatrix;
use num_complex::Complex64;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Coefficients with modulus below this are dropped by [`QubitOperator::simplify`].
pub const DEFAULT_ATOL: f64 = 1e-12;

/// A weighted sum of Pauli strings over a fixed qubit register.
///
/// Terms are kept in a `BTreeMap`, so iteration order depends only on the
/// operator's content and two operators built from the same input compare
/// and print identically.
#[derive(Debug, Clone, PartialEq)]
pub struct QubitOperator {
    num_qubits: usize,
    terms: BTreeMap<PauliString, Complex64>,
}

impl QubitOperator {
    /// The zero operator on `num_qubits` qubits.
    pub fn zero(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            terms: BTreeMap::new(),
        }
    }

    pub fn identity(num_qubits: usize, coefficient: Complex64) -> Self {
        Self::from_terms(num_qubits, [(PauliString::identity(), coefficient)])
    }

    pub fn from_terms<I>(num_qubits: usize, terms: I) -> Self
    where
        I: IntoIterator<Item = (PauliString, Complex64)>,
    {
        let mut operator = Self::zero(num_qubits);
        for (string, coefficient) in terms {
            operator.add_term(string, coefficient);
        }
        operator
    }

    /// Adds `coefficient · string`, merging with an existing equal string.
    pub fn add_term(&mut self, string: PauliString, coefficient: Complex64) {
        *self.terms.entry(string).or_default() += coefficient;
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&PauliString, &Complex64)> {
        self.terms.iter()
    }

    pub fn coefficient(&self, string: &PauliString) -> Complex64 {
        self.terms.get(string).copied().unwrap_or_default()
    }

    /// Coefficient of the identity string.
    pub fn constant(&self) -> Complex64 {
        self.coefficient(&PauliString::identity())
    }

    /// Drops terms whose coefficient modulus is at most `atol`.
    pub fn simplify(mut self, atol: f64) -> Self {
        self.terms.retain(|_, c| c.norm() > atol);
        self
    }

    /// Returns a copy on a larger (or equal) register.
    pub fn with_num_qubits(mut self, num_qubits: usize) -> Self {
        self.num_qubits = self.num_qubits.max(num_qubits);
        self
    }

    pub fn adjoint(&self) -> Self {
        Self {
            num_qubits: self.num_qubits,
            terms: self.terms.iter().map(|(s, c)| (*s, c.conj())).collect(),
        }
    }

    /// True when every coefficient is real to within `atol`.
    pub fn is_hermitian(&self, atol: f64) -> bool {
        self.terms.values().all(|c| c.im.abs() <= atol)
    }

    pub fn scale(&self, factor: Complex64) -> Self {
        Self {
            num_qubits: self.num_qubits,
            terms: self.terms.iter().map(|(s, c)| (*s, c * factor)).collect(),
        }
    }

    /// Operator product `self · other`.
    pub fn compose(&self, other: &QubitOperator) -> Self {
        let mut result = Self::zero(self.num_qubits.max(other.num_qubits));
        for (a, ca) in &self.terms {
            for (b, cb) in &other.terms {
                let (phase, string) = a.multiply(b);
                result.add_term(string, phase * ca * cb);
            }
        }
        result.simplify(DEFAULT_ATOL)
    }

    /// Applies the operator to a statevector of length `2^num_qubits`.
    pub fn apply(&self, state: &[Complex64]) -> Vec<Complex64> {
        let mut out = vec![Complex64::default(); state.len()];
        for (string, coefficient) in &self.terms {
            for (basis, amplitude) in state.iter().enumerate() {
                if amplitude.norm_sqr() == 0.0 {
                    continue;
                }
                let (phase, target) = string.apply_to_basis(basis as u64);
                out[target as usize] += coefficient * phase * amplitude;
            }
        }
        out
    }

    /// Expectation value ⟨ψ|O|ψ⟩ on a normalized statevector.
    pub fn expectation(&self, state: &[Complex64]) -> Complex64 {
        #[cfg(not(feature = "parallel"))]
        let iterator = self.terms.iter();

        #[cfg(feature = "parallel")]
        let iterator = self.terms.par_iter();

        iterator
            .map(|(string, coefficient)| coefficient * string_expectation(string, state))
            .sum()
    }

    /// Dense `2^n × 2^n` matrix with element (row, col) = ⟨row|O|col⟩.
    pub fn to_matrix(&self) -> DMatrix<Complex64> {
        let dim = 1usize << self.num_qubits;
        let mut matrix = DMatrix::<Complex64>::zeros(dim, dim);
        for (string, coefficient) in &self.terms {
            for col in 0..dim {
                let (phase, row) = string.apply_to_basis(col as u64);
                matrix[(row as usize, col)] += coefficient * phase;
            }
        }
        matrix
    }
}

fn string_expectation(string: &PauliString, state: &[Complex64]) -> Complex64 {
    state
        .iter()
        .enumerate()
        .filter(|(_, amplitude)| amplitude.norm_sqr() != 0.0)
        .map(|(basis, amplitude)| {
            let (phase, target) = string.apply_to_basis(basis as u64);
            state[target as usize].conj() * phase * amplitude
        })
        .sum()
}

impl Add for &QubitOperator {
    type Output = QubitOperator;

    fn add(self, rhs: &QubitOperator) -> QubitOperator {
        let mut result = self.clone().with_num_qubits(rhs.num_qubits);
        for (string, coefficient) in &rhs.terms {
            result.add_term(*string, *coefficient);
        }
        result.simplify(DEFAULT_ATOL)
    }
}

impl Add for QubitOperator {
    type Output = QubitOperator;

    fn add(self, rhs: QubitOperator) -> QubitOperator {
        &self + &rhs
    }
}

impl Sub for &QubitOperator {
    type Output = QubitOperator;

    fn sub(self, rhs: &QubitOperator) -> QubitOperator {
        self + &(-rhs)
    }
}

impl Neg for &QubitOperator {
    type Output = QubitOperator;

    fn neg(self) -> QubitOperator {
        self.scale(Complex64::new(-1.0, 0.0))
    }
}

impl Mul for &QubitOperator {
    type Output = QubitOperator;

    fn mul(self, rhs: &QubitOperator) -> QubitOperator {
        self.compose(rhs)
    }
}

impl Mul<Complex64> for &QubitOperator {
    type Output = QubitOperator;

    fn mul(self, rhs: Complex64) -> QubitOperator {
        self.scale(rhs)
    }
}

impl Mul<f64> for &QubitOperator {
    type Output = QubitOperator;

    fn mul(self, rhs: f64) -> QubitOperator {
        self.scale(Complex64::new(rhs, 0.0))
    }
}

impl fmt::Display for QubitOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, (string, coefficient)) in self.terms.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:+.8}", coefficient.re)?;
            if coefficient.im != 0.0 {
                write!(f, "{:+.8}i", coefficient.im)?;
            }
            write!(f, " * {}", string.to_label(self.num_qubits))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::operators::pauli::Pauli;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    fn label(s: &str) -> PauliString {
        PauliString::from_label(s).unwrap()
    }

    #[test]
    fn from_terms_merges_equal_strings() {
        let op = QubitOperator::from_terms(2, [(label("XZ"), c(1.0)), (label("XZ"), c(0.5))]);
        assert_eq!(op.num_terms(), 1);
        assert_eq!(op.coefficient(&label("XZ")), c(1.5));
    }

    #[test]
    fn sum_cancels_opposite_terms() {
        let a = QubitOperator::from_terms(1, [(label("X"), c(1.0)), (label("Z"), c(2.0))]);
        let b = QubitOperator::from_terms(1, [(label("X"), c(-1.0))]);
        let sum = &a + &b;
        assert_eq!(sum.num_terms(), 1);
        assert_eq!(sum.coefficient(&label("Z")), c(2.0));
    }

    #[test]
    fn compose_of_anticommuting_strings_is_antisymmetric() {
        let x = QubitOperator::from_terms(1, [(label("X"), c(1.0))]);
        let y = QubitOperator::from_terms(1, [(label("Y"), c(1.0))]);
        let anticommutator = &(&x * &y) + &(&y * &x);
        assert!(anticommutator.is_zero());
    }

    #[test]
    fn to_matrix_of_x_plus_z_is_hadamard_like() {
        let op = QubitOperator::from_terms(1, [(label("X"), c(1.0)), (label("Z"), c(1.0))]);
        let m = op.to_matrix();
        assert_eq!(m[(0, 0)], c(1.0));
        assert_eq!(m[(1, 1)], c(-1.0));
        assert_eq!(m[(0, 1)], c(1.0));
        assert_eq!(m[(1, 0)], c(1.0));
    }

    #[test]
    fn expectation_agrees_with_dense_matrix() {
        let op = QubitOperator::from_terms(
            2,
            [
                (label("ZI"), c(0.3)),
                (label("XY"), c(-0.7)),
                (PauliString::single(0, Pauli::X), c(0.2)),
            ],
        );
        let norm = (0.1f64 + 0.2 + 0.3 + 0.4).sqrt();
        let state = vec![
            Complex64::new(0.1f64.sqrt() / norm, 0.0),
            Complex64::new(0.0, 0.2f64.sqrt() / norm),
            Complex64::new(0.3f64.sqrt() / norm, 0.0),
            Complex64::new(-(0.4f64.sqrt()) / norm, 0.0),
        ];
        let psi = nalgebra::DVector::from_vec(state.clone());
        let dense = (psi.adjoint() * op.to_matrix() * &psi)[(0, 0)];
        let direct = op.expectation(&state);
        assert!((dense - direct).norm() < 1e-12);
    }

    #[test]
    fn apply_matches_dense_matrix() {
        let op = QubitOperator::from_terms(2, [(label("YX"), c(1.0)), (label("IZ"), c(0.5))]);
        let state = vec![c(0.5), c(0.5), c(0.5), c(0.5)];
        let applied = op.apply(&state);
        let dense = op.to_matrix() * nalgebra::DVector::from_vec(state);
        for (a, b) in applied.iter().zip(dense.iter()) {
            assert!((a - b).norm() < 1e-12);
        }
    }

    #[test]
    fn display_lists_terms_in_canonical_order() {
        let a = QubitOperator::from_terms(2, [(label("ZI"), c(1.0)), (label("II"), c(-0.5))]);
        let b = QubitOperator::from_terms(2, [(label("II"), c(-0.5)), (label("ZI"), c(1.0))]);
        assert_eq!(a.to_string(), b.to_string());
        assert!(a.to_string().starts_with("-0.50000000 * II"));
    }
}
