use super::MappingError;
use crate::core::operators::pauli::Pauli;
use crate::core::operators::qubit::{DEFAULT_ATOL, QubitOperator};

/// Removes the two qubits of a parity-encoded, block spin-ordered register
/// that are fixed by the alpha and total particle numbers.
///
/// In the parity encoding qubit `n/2 − 1` holds the parity of the alpha
/// occupation and qubit `n − 1` the parity of the total occupation, so on the
/// target sector both are eigenstates of `Z` with eigenvalues `(−1)^{N_α}` and
/// `(−1)^{N_α + N_β}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoQubitReduction {
    num_qubits: usize,
    num_particles: (usize, usize),
}

impl TwoQubitReduction {
    pub fn new(num_qubits: usize, num_particles: (usize, usize)) -> Self {
        Self {
            num_qubits,
            num_particles,
        }
    }

    /// Tapered qubits in removal order (highest index first).
    pub fn tapered_qubits(&self) -> [(usize, f64); 2] {
        let (alpha, beta) = self.num_particles;
        let sign = |n: usize| if n % 2 == 0 { 1.0 } else { -1.0 };
        [
            (self.num_qubits - 1, sign(alpha + beta)),
            (self.num_qubits / 2 - 1, sign(alpha)),
        ]
    }

    pub fn num_reduced_qubits(&self) -> usize {
        self.num_qubits - 2
    }

    /// Substitutes the `Z` eigenvalues on the tapered qubits and drops them.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::SymmetryViolation`] if any term acts with `X` or
    /// `Y` on a tapered qubit.
    pub fn reduce(&self, op: &QubitOperator) -> Result<QubitOperator, MappingError> {
        let mut reduced = QubitOperator::zero(self.num_reduced_qubits());
        for (string, coefficient) in op.terms() {
            let mut string = *string;
            let mut coefficient = *coefficient;
            for (qubit, eigenvalue) in self.tapered_qubits() {
                match string.pauli_at(qubit) {
                    Pauli::I => {}
                    Pauli::Z => coefficient *= eigenvalue,
                    other => {
                        return Err(MappingError::SymmetryViolation {
                            qubit,
                            pauli: other.symbol(),
                        });
                    }
                }
                string = string.remove_qubit(qubit);
            }
            reduced.add_term(string, coefficient);
        }
        Ok(reduced.simplify(DEFAULT_ATOL))
    }

    /// Drops the tapered bits from a computational basis state.
    pub fn reduce_basis_state(&self, state: u64) -> u64 {
        self.tapered_qubits()
            .iter()
            .fold(state, |state, &(qubit, _)| {
                let low = (1u64 << qubit) - 1;
                (state & low) | ((state >> 1) & !low)
            })
    }
}
