use crate::core::models::descriptor::ProblemDescriptor;
use crate::core::operators::qubit::QubitOperator;
use num_complex::Complex64;
use std::collections::BTreeMap;

/// Expectation values of named auxiliary operators, keyed by name.
pub type ObservableValues = BTreeMap<String, f64>;

pub const PARTICLE_NUMBER: &str = "particle_number";
pub const ANGULAR_MOMENTUM: &str = "angular_momentum";
pub const MAGNETIZATION: &str = "magnetization";
pub const DIPOLE_AXES: [&str; 3] = ["dipole_x", "dipole_y", "dipole_z"];

pub fn occupation_key(mode: usize) -> String {
    format!("occupation_mode_{mode}")
}

/// Everything an eigensolver consumes: the qubit Hamiltonian plus the
/// operators and reference data needed to interpret and seed a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct QubitProblem {
    pub hamiltonian: QubitOperator,
    pub aux_operators: BTreeMap<String, QubitOperator>,
    /// Basis state of the Hartree–Fock determinant or VSCF product state.
    pub reference_state: Option<u64>,
    /// Mapped anti-Hermitian excitation generators.
    pub excitations: Vec<QubitOperator>,
}

impl QubitProblem {
    pub fn new(hamiltonian: QubitOperator) -> Self {
        Self {
            hamiltonian,
            aux_operators: BTreeMap::new(),
            reference_state: None,
            excitations: Vec::new(),
        }
    }

    pub fn with_aux_operator(mut self, name: impl Into<String>, operator: QubitOperator) -> Self {
        self.aux_operators.insert(name.into(), operator);
        self
    }

    pub fn with_reference_state(mut self, state: u64) -> Self {
        self.reference_state = Some(state);
        self
    }

    pub fn with_excitations(mut self, excitations: Vec<QubitOperator>) -> Self {
        self.excitations = excitations;
        self
    }

    pub fn num_qubits(&self) -> usize {
        self.hamiltonian.num_qubits()
    }

    /// Real parts of the auxiliary expectation values on `state`.
    pub fn evaluate_aux(&self, state: &[Complex64]) -> ObservableValues {
        self.aux_operators
            .iter()
            .map(|(name, op)| (name.clone(), op.expectation(state).re))
            .collect()
    }
}

/// A descriptor after problem transformers, paired with its qubit encoding.
#[derive(Debug, Clone)]
pub struct PreparedProblem {
    pub descriptor: ProblemDescriptor,
    pub qubit: QubitProblem,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::operators::pauli::{Pauli, PauliString};

    #[test]
    fn evaluate_aux_reports_real_expectations() {
        let z0 = QubitOperator::from_terms(
            1,
            [(PauliString::single(0, Pauli::Z), Complex64::new(1.0, 0.0))],
        );
        let problem = QubitProblem::new(z0.clone()).with_aux_operator("z", z0);
        let one = [Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)];
        let values = problem.evaluate_aux(&one);
        assert_eq!(values["z"], -1.0);
        assert_eq!(problem.num_qubits(), 1);
    }

    #[test]
    fn occupation_keys_are_indexed_by_mode() {
        assert_eq!(occupation_key(3), "occupation_mode_3");
    }
}
