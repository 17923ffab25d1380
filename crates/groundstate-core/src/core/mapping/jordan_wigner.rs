use crate::core::operators::pauli::{Pauli, PauliString};

/// `real_j = Z_{<j} X_j`, `imag_j = Z_{<j} Y_j`.
pub fn pauli_table(num_modes: usize) -> Vec<(PauliString, PauliString)> {
    (0..num_modes)
        .map(|j| {
            let lower = (1u64 << j) - 1;
            let string = PauliString::from_masks(0, lower);
            (string.with(j, Pauli::X), string.with(j, Pauli::Y))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_carry_z_on_lower_modes() {
        let table = pauli_table(3);
        assert_eq!(table[0].0.to_label(3), "IIX");
        assert_eq!(table[2].0.to_label(3), "XZZ");
        assert_eq!(table[2].1.to_label(3), "YZZ");
    }
}
