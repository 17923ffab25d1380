//! Anti-Hermitian excitation generators `T − T†` for unitary coupled-cluster trial states.

use super::electronic::{Spin, spin_orbital};
use super::ladder::{LadderFactor, LadderOperator};
use num_complex::Complex64;

fn generator(num_modes: usize, created: &[usize], annihilated: &[usize]) -> LadderOperator {
    let mut excitation = LadderOperator::zero(num_modes);
    let factors = created
        .iter()
        .map(|&p| LadderFactor::create(p))
        .chain(annihilated.iter().rev().map(|&q| LadderFactor::annihilate(q)))
        .collect();
    excitation.add_term(factors, Complex64::new(1.0, 0.0));
    &excitation + &excitation.adjoint().scale(Complex64::new(-1.0, 0.0))
}

fn pairs(items: &[usize]) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for (i, &a) in items.iter().enumerate() {
        for &b in &items[i + 1..] {
            out.push((a, b));
        }
    }
    out
}

/// Spin-conserving single and double excitations out of the Hartree–Fock
/// determinant, in block spin ordering.
///
/// Order: alpha singles, beta singles, alpha-alpha doubles, beta-beta
/// doubles, alpha-beta doubles.
pub fn uccsd(num_spatial: usize, num_particles: (usize, usize)) -> Vec<LadderOperator> {
    let num_modes = 2 * num_spatial;
    let (alpha, beta) = num_particles;
    let occupied = |spin: Spin, n: usize| -> Vec<usize> {
        (0..n.min(num_spatial))
            .map(|p| spin_orbital(p, spin, num_spatial))
            .collect()
    };
    let virtual_ = |spin: Spin, n: usize| -> Vec<usize> {
        (n.min(num_spatial)..num_spatial)
            .map(|p| spin_orbital(p, spin, num_spatial))
            .collect()
    };
    let (occ_a, vir_a) = (occupied(Spin::Alpha, alpha), virtual_(Spin::Alpha, alpha));
    let (occ_b, vir_b) = (occupied(Spin::Beta, beta), virtual_(Spin::Beta, beta));

    let mut generators = Vec::new();
    for (occ, vir) in [(&occ_a, &vir_a), (&occ_b, &vir_b)] {
        for &i in occ {
            for &a in vir {
                generators.push(generator(num_modes, &[a], &[i]));
            }
        }
    }
    for (occ, vir) in [(&occ_a, &vir_a), (&occ_b, &vir_b)] {
        for (i, j) in pairs(occ) {
            for (a, b) in pairs(vir) {
                generators.push(generator(num_modes, &[a, b], &[i, j]));
            }
        }
    }
    for &i in &occ_a {
        for &j in &occ_b {
            for &a in &vir_a {
                for &b in &vir_b {
                    generators.push(generator(num_modes, &[a, b], &[i, j]));
                }
            }
        }
    }
    generators
}

/// Single and double modal excitations out of the product of ground modals.
///
/// Mode `m` occupies flat modal index `Σ_{k<m} num_modals[k]` in the reference.
pub fn uvccsd(num_modals: &[usize]) -> Vec<LadderOperator> {
    let num_modes: usize = num_modals.iter().sum();
    let offsets: Vec<usize> = num_modals
        .iter()
        .scan(0, |acc, &n| {
            let offset = *acc;
            *acc += n;
            Some(offset)
        })
        .collect();

    let mut generators = Vec::new();
    for (m, &modals) in num_modals.iter().enumerate() {
        for k in 1..modals {
            generators.push(generator(num_modes, &[offsets[m] + k], &[offsets[m]]));
        }
    }
    for m in 0..num_modals.len() {
        for n in m + 1..num_modals.len() {
            for k in 1..num_modals[m] {
                for l in 1..num_modals[n] {
                    generators.push(generator(
                        num_modes,
                        &[offsets[m] + k, offsets[n] + l],
                        &[offsets[m], offsets[n]],
                    ));
                }
            }
        }
    }
    generators
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uccsd_h2_has_two_singles_and_one_double() {
        let generators = uccsd(2, (1, 1));
        assert_eq!(generators.len(), 3);
        for g in &generators {
            assert_eq!(g.num_terms(), 2);
            assert_eq!(g.adjoint(), g.scale(Complex64::new(-1.0, 0.0)));
        }
    }

    #[test]
    fn uccsd_counts_match_combinatorics() {
        // 4 spatial orbitals, 2 alpha and 2 beta electrons:
        // singles 2·(2·2), same-spin doubles 2·(1·1), mixed doubles 4·4.
        assert_eq!(uccsd(4, (2, 2)).len(), 8 + 2 + 16);
    }

    #[test]
    fn uccsd_without_virtuals_is_empty() {
        assert!(uccsd(2, (2, 2)).is_empty());
    }

    #[test]
    fn uvccsd_counts_singles_and_doubles() {
        let generators = uvccsd(&[2, 3]);
        // singles 1 + 2, doubles 1·2
        assert_eq!(generators.len(), 5);
        assert_eq!(generators[0].max_mode(), Some(1));
    }
}
