use crate::core::operators::pauli::{Pauli, PauliString};

/// `real_j = X_j`, `imag_j = Y_j`: one qubit per modal, no parity strings.
pub fn pauli_table(num_modes: usize) -> Vec<(PauliString, PauliString)> {
    (0..num_modes)
        .map(|j| (PauliString::single(j, Pauli::X), PauliString::single(j, Pauli::Y)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_are_single_qubit() {
        for (j, (real, imag)) in pauli_table(5).iter().enumerate() {
            assert_eq!(real.weight(), 1);
            assert_eq!(imag.pauli_at(j), Pauli::Y);
        }
    }
}
