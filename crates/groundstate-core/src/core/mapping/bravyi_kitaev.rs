use crate::core::operators::pauli::{Pauli, PauliString};

// Index sets on a binary tree of `n` (a power of two) modes. Each returns a
// bit mask; indices at or beyond the real mode count are filtered by the caller.

fn parity_set(j: usize, n: usize) -> u64 {
    if n < 2 {
        return 0;
    }
    let half = n / 2;
    if j < half {
        parity_set(j, half)
    } else {
        (parity_set(j - half, half) << half) | (1u64 << (half - 1))
    }
}

fn update_set(j: usize, n: usize) -> u64 {
    if n < 2 {
        return 0;
    }
    let half = n / 2;
    if j < half {
        (1u64 << (n - 1)) | update_set(j, half)
    } else {
        update_set(j - half, half) << half
    }
}

fn flip_set(j: usize, n: usize) -> u64 {
    if n < 2 {
        return 0;
    }
    let half = n / 2;
    if j < half {
        flip_set(j, half)
    } else if j < n - 1 {
        flip_set(j - half, half) << half
    } else {
        (flip_set(j - half, half) << half) | (1u64 << (half - 1))
    }
}

/// Bravyi–Kitaev encoding built from the update, parity and remainder sets.
///
/// `real_j = X_{U(j) ∪ {j}} Z_{P(j)}`, `imag_j = X_{U(j)} Y_j Z_{R(j)}` with
/// `R(j) = P(j) \ F(j)`.
pub fn pauli_table(num_modes: usize) -> Vec<(PauliString, PauliString)> {
    let superset = num_modes.max(1).next_power_of_two().max(2);
    let valid = if num_modes >= 64 {
        u64::MAX
    } else {
        (1u64 << num_modes) - 1
    };
    (0..num_modes)
        .map(|j| {
            let update = update_set(j, superset) & valid;
            let parity = parity_set(j, superset) & valid;
            let flip = flip_set(j, superset) & valid;
            let remainder = parity & !flip;

            let real = PauliString::from_masks(update, parity).with(j, Pauli::X);
            let imag = PauliString::from_masks(update, remainder).with(j, Pauli::Y);
            (real, imag)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_mode_sets_match_binary_tree() {
        assert_eq!(update_set(0, 4), 0b1010);
        assert_eq!(update_set(2, 4), 0b1000);
        assert_eq!(parity_set(3, 4), 0b0110);
        assert_eq!(flip_set(3, 4), 0b0110);
        assert_eq!(flip_set(1, 4), 0b0001);
    }

    #[test]
    fn four_mode_strings() {
        let table = pauli_table(4);
        assert_eq!(table[0].0.to_label(4), "XIXX");
        assert_eq!(table[1].1.to_label(4), "XIYI");
        assert_eq!(table[3].0.to_label(4), "XZZI");
        assert_eq!(table[3].1.to_label(4), "YIII");
    }
}
