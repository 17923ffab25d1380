use crate::core::operators::pauli::{Pauli, PauliString};

/// `real_j = Z_{j-1} X_j X_{>j}`, `imag_j = Y_j X_{>j}`.
///
/// Qubit `j` stores the parity of modes `0..=j`.
pub fn pauli_table(num_modes: usize) -> Vec<(PauliString, PauliString)> {
    let all = if num_modes == 64 {
        u64::MAX
    } else {
        (1u64 << num_modes) - 1
    };
    (0..num_modes)
        .map(|j| {
            let upper = all & !((1u64 << j) - 1) & !(1u64 << j);
            let tail = PauliString::from_masks(upper, 0);
            let mut real = tail.with(j, Pauli::X);
            if j > 0 {
                real = real.with(j - 1, Pauli::Z);
            }
            (real, tail.with(j, Pauli::Y))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_carry_x_on_upper_modes() {
        let table = pauli_table(4);
        assert_eq!(table[0].0.to_label(4), "XXXX");
        assert_eq!(table[0].1.to_label(4), "XXXY");
        assert_eq!(table[2].0.to_label(4), "XXZI");
        assert_eq!(table[3].1.to_label(4), "YIII");
    }
}
