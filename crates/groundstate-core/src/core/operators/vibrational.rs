//! Second-quantized vibrational operators over the flattened modal index.

use super::ladder::{LadderFactor, LadderOperator};
use crate::core::models::vibrational::VibrationalDescriptor;
use num_complex::Complex64;

/// Σ c Π b†_{m,i} b_{m,j} over every integral of the descriptor.
pub fn hamiltonian(descriptor: &VibrationalDescriptor) -> LadderOperator {
    let mut op = LadderOperator::zero(descriptor.total_modals());
    for term in descriptor.terms() {
        let factors = term
            .factors
            .iter()
            .flat_map(|e| {
                [
                    LadderFactor::create(descriptor.modal_offset(e.mode, e.creation)),
                    LadderFactor::annihilate(descriptor.modal_offset(e.mode, e.annihilation)),
                ]
            })
            .collect();
        op.add_term(factors, Complex64::new(term.coefficient, 0.0));
    }
    op
}

/// Number of quanta occupying the modals of `mode`: Σ_k b†_{m,k} b_{m,k}.
pub fn occupation(descriptor: &VibrationalDescriptor, mode: usize) -> LadderOperator {
    let mut op = LadderOperator::zero(descriptor.total_modals());
    for k in 0..descriptor.num_modals()[mode] {
        let index = descriptor.modal_offset(mode, k);
        op.add_term(
            vec![LadderFactor::create(index), LadderFactor::annihilate(index)],
            Complex64::new(1.0, 0.0),
        );
    }
    op
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harmonic_hamiltonian_is_diagonal_in_flat_modals() {
        let descriptor = VibrationalDescriptor::harmonic(&[1000.0, 2000.0], &[2, 2]).unwrap();
        let op = hamiltonian(&descriptor);
        assert_eq!(op.num_terms(), 4);
        let expected = vec![LadderFactor::create(3), LadderFactor::annihilate(3)];
        let coefficient = op
            .terms()
            .find(|(factors, _)| *factors == expected.as_slice())
            .map(|(_, c)| c.re);
        assert_eq!(coefficient, Some(3000.0));
    }

    #[test]
    fn occupation_counts_only_the_requested_mode() {
        let descriptor = VibrationalDescriptor::harmonic(&[1.0, 1.0], &[3, 2]).unwrap();
        let op = occupation(&descriptor, 1);
        assert_eq!(op.num_terms(), 2);
        assert_eq!(op.max_mode(), Some(4));
    }
}
