//! Second-quantized electronic operators in the block spin-orbital ordering.
//!
//! Spatial orbital `p` maps to spin orbital `p` for alpha spin and `p + n`
//! for beta spin, where `n` is the number of spatial orbitals.

use super::ladder::{LadderFactor, LadderOperator};
use crate::core::models::integrals::ElectronicIntegrals;
use nalgebra::DMatrix;
use num_complex::Complex64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spin {
    Alpha,
    Beta,
}

#[inline]
pub fn spin_orbital(p: usize, spin: Spin, num_spatial: usize) -> usize {
    match spin {
        Spin::Alpha => p,
        Spin::Beta => p + num_spatial,
    }
}

const SPINS: [Spin; 2] = [Spin::Alpha, Spin::Beta];

/// H = Σ h_pq a†_{pσ} a_{qσ} + ½ Σ (pq|rs) a†_{pσ} a†_{rτ} a_{sτ} a_{qσ}.
pub fn hamiltonian(integrals: &ElectronicIntegrals) -> LadderOperator {
    let n = integrals.num_spatial_orbitals();
    let mut op = spin_conserving_one_body(integrals.one_body());
    let eri = integrals.two_body();

    for p in 0..n {
        for q in 0..n {
            for r in 0..n {
                for s in 0..n {
                    let value = eri.get(p, q, r, s);
                    if value == 0.0 {
                        continue;
                    }
                    for sigma in SPINS {
                        for tau in SPINS {
                            let ps = spin_orbital(p, sigma, n);
                            let qs = spin_orbital(q, sigma, n);
                            let rs = spin_orbital(r, tau, n);
                            let ss = spin_orbital(s, tau, n);
                            if ps == rs || qs == ss {
                                continue;
                            }
                            op.add_term(
                                vec![
                                    LadderFactor::create(ps),
                                    LadderFactor::create(rs),
                                    LadderFactor::annihilate(ss),
                                    LadderFactor::annihilate(qs),
                                ],
                                Complex64::new(0.5 * value, 0.0),
                            );
                        }
                    }
                }
            }
        }
    }
    op
}

/// Σ_{pq,σ} m_pq a†_{pσ} a_{qσ} for a spin-free one-body matrix `m`.
pub fn spin_conserving_one_body(matrix: &DMatrix<f64>) -> LadderOperator {
    let n = matrix.nrows();
    let mut op = LadderOperator::zero(2 * n);
    for sigma in SPINS {
        for p in 0..n {
            for q in 0..n {
                let value = matrix[(p, q)];
                if value != 0.0 {
                    op.add_term(
                        vec![
                            LadderFactor::create(spin_orbital(p, sigma, n)),
                            LadderFactor::annihilate(spin_orbital(q, sigma, n)),
                        ],
                        Complex64::new(value, 0.0),
                    );
                }
            }
        }
    }
    op
}

/// N = Σ_i a†_i a_i over all spin orbitals.
pub fn particle_number(num_spatial: usize) -> LadderOperator {
    spin_conserving_one_body(&DMatrix::identity(num_spatial, num_spatial))
}

/// S_z = ½ Σ_p (n_{pα} − n_{pβ}).
pub fn magnetization(num_spatial: usize) -> LadderOperator {
    let n = num_spatial;
    let mut op = LadderOperator::zero(2 * n);
    for p in 0..n {
        for (spin, sign) in [(Spin::Alpha, 0.5), (Spin::Beta, -0.5)] {
            let mode = spin_orbital(p, spin, n);
            op.add_term(
                vec![LadderFactor::create(mode), LadderFactor::annihilate(mode)],
                Complex64::new(sign, 0.0),
            );
        }
    }
    op
}

fn s_plus(num_spatial: usize) -> LadderOperator {
    let n = num_spatial;
    let mut op = LadderOperator::zero(2 * n);
    for p in 0..n {
        op.add_term(
            vec![
                LadderFactor::create(spin_orbital(p, Spin::Alpha, n)),
                LadderFactor::annihilate(spin_orbital(p, Spin::Beta, n)),
            ],
            Complex64::new(1.0, 0.0),
        );
    }
    op
}

/// S² = S₋S₊ + S_z + S_z².
pub fn angular_momentum(num_spatial: usize) -> LadderOperator {
    let plus = s_plus(num_spatial);
    let minus = plus.adjoint();
    let sz = magnetization(num_spatial);
    let sz2 = &sz * &sz;
    &(&(&minus * &plus) + &sz) + &sz2
}

/// Electronic dipole component Σ d_pq a†_{pσ} a_{qσ} along one axis.
pub fn dipole(matrix: &DMatrix<f64>) -> LadderOperator {
    spin_conserving_one_body(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::integrals::TwoBodyIntegrals;

    #[test]
    fn particle_number_has_one_term_per_spin_orbital() {
        let op = particle_number(3);
        assert_eq!(op.num_terms(), 6);
        assert_eq!(op.num_modes(), 6);
    }

    #[test]
    fn hamiltonian_skips_vanishing_same_spin_pairs() {
        let mut eri = TwoBodyIntegrals::zeros(1).unwrap();
        eri.set(0, 0, 0, 0, 1.0);
        let integrals = ElectronicIntegrals::new(DMatrix::from_element(1, 1, -1.0), eri).unwrap();
        let op = hamiltonian(&integrals);
        // 2 one-body terms plus the αβ and βα Coulomb terms.
        assert_eq!(op.num_terms(), 4);
    }

    #[test]
    fn spin_orbitals_use_block_ordering() {
        assert_eq!(spin_orbital(1, Spin::Alpha, 4), 1);
        assert_eq!(spin_orbital(1, Spin::Beta, 4), 5);
    }
}
