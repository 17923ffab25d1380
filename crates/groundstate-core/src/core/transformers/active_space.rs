use crate::core::models::descriptor::{DescriptorError, ElectronicDescriptor};
use crate::core::models::integrals::{DipoleIntegrals, ElectronicIntegrals, TwoBodyIntegrals};
use crate::core::utils::elements;
use nalgebra::{DMatrix, Vector3};
use tracing::debug;

pub const INACTIVE_ENERGY_KEY: &str = "active_space_inactive_energy";

/// Restricts an electronic problem to `num_spatial_orbitals` orbitals holding
/// `num_electrons` electrons.
///
/// The lowest `(N − num_electrons) / 2` orbitals are treated as doubly
/// occupied and folded into a constant energy shift and a modified one-body
/// operator; the active window is the orbitals directly above them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSpace {
    pub num_electrons: usize,
    pub num_spatial_orbitals: usize,
}

impl ActiveSpace {
    pub fn new(num_electrons: usize, num_spatial_orbitals: usize) -> Self {
        Self {
            num_electrons,
            num_spatial_orbitals,
        }
    }

    /// Number of frozen (doubly occupied) orbitals for `descriptor`.
    pub fn num_inactive(&self, descriptor: &ElectronicDescriptor) -> Result<usize, DescriptorError> {
        let (alpha, beta) = descriptor.num_particles();
        let total = alpha + beta;
        if self.num_electrons > total {
            return Err(DescriptorError::InvalidActiveSpace(format!(
                "{} active electrons requested but the problem has only {total}",
                self.num_electrons
            )));
        }
        if (total - self.num_electrons) % 2 != 0 {
            return Err(DescriptorError::InvalidActiveSpace(format!(
                "{} inactive electrons cannot fill closed-shell orbitals",
                total - self.num_electrons
            )));
        }
        let inactive = (total - self.num_electrons) / 2;
        let minority = alpha.min(beta);
        if inactive > minority {
            return Err(DescriptorError::InvalidActiveSpace(format!(
                "{inactive} inactive orbitals exceed the {minority} electrons of the minority spin"
            )));
        }
        if inactive + self.num_spatial_orbitals > descriptor.num_spatial_orbitals() {
            return Err(DescriptorError::InvalidActiveSpace(format!(
                "{} inactive + {} active orbitals exceed the {} available",
                inactive,
                self.num_spatial_orbitals,
                descriptor.num_spatial_orbitals()
            )));
        }
        for (label, count) in [("alpha", alpha), ("beta", beta)] {
            if count - inactive > self.num_spatial_orbitals {
                return Err(DescriptorError::InvalidActiveSpace(format!(
                    "{} active {label} electrons do not fit into {} orbitals",
                    count - inactive,
                    self.num_spatial_orbitals
                )));
            }
        }
        Ok(inactive)
    }

    pub fn transform(&self, descriptor: &ElectronicDescriptor) -> Result<ElectronicDescriptor, DescriptorError> {
        if self.num_spatial_orbitals == 0 {
            return Err(DescriptorError::InvalidActiveSpace(
                "the active space needs at least one orbital".to_string(),
            ));
        }
        let inactive = self.num_inactive(descriptor)?;
        let active: Vec<usize> = (inactive..inactive + self.num_spatial_orbitals).collect();
        let core: Vec<usize> = (0..inactive).collect();

        let integrals = descriptor.integrals();
        let h = integrals.one_body();
        let eri = integrals.two_body();

        let mut inactive_energy = 0.0;
        for &i in &core {
            inactive_energy += 2.0 * h[(i, i)];
            for &j in &core {
                inactive_energy += 2.0 * eri.get(i, i, j, j) - eri.get(i, j, j, i);
            }
        }

        let n = active.len();
        let one_body = DMatrix::from_fn(n, n, |a, b| {
            let (p, q) = (active[a], active[b]);
            h[(p, q)]
                + core
                    .iter()
                    .map(|&i| 2.0 * eri.get(p, q, i, i) - eri.get(p, i, i, q))
                    .sum::<f64>()
        });

        let mut two_body = TwoBodyIntegrals::zeros(n)?;
        for a in 0..n {
            for b in 0..=a {
                for c in 0..=a {
                    let d_max = if c == a { b } else { c };
                    for d in 0..=d_max {
                        let value = eri.get(active[a], active[b], active[c], active[d]);
                        if value != 0.0 {
                            two_body.set(a, b, c, d, value);
                        }
                    }
                }
            }
        }

        let (dipole, dipole_shift) = match descriptor.dipole() {
            Some(d) => {
                let slice = |m: &DMatrix<f64>| DMatrix::from_fn(n, n, |a, b| m[(active[a], active[b])]);
                let core_trace = |m: &DMatrix<f64>| 2.0 * core.iter().map(|&i| m[(i, i)]).sum::<f64>();
                let [x, y, z] = d.axes();
                (
                    Some(DipoleIntegrals::new(slice(x), slice(y), slice(z))?),
                    Vector3::new(core_trace(x), core_trace(y), core_trace(z)),
                )
            }
            None => (None, Vector3::zeros()),
        };

        let (alpha, beta) = descriptor.num_particles();
        debug!(
            inactive_orbitals = inactive,
            active_orbitals = n,
            inactive_energy,
            "Reduced problem to active space"
        );

        Ok(descriptor.reduced(
            ElectronicIntegrals::new(one_body, two_body)?,
            (alpha - inactive, beta - inactive),
            dipole,
            dipole_shift,
            INACTIVE_ENERGY_KEY,
            inactive_energy,
        ))
    }
}

/// Freezes the chemical core orbitals implied by the molecule's elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FreezeCore;

impl FreezeCore {
    pub fn num_core_orbitals(descriptor: &ElectronicDescriptor) -> Result<usize, DescriptorError> {
        let molecule = descriptor.molecule().ok_or_else(|| {
            DescriptorError::InvalidActiveSpace("freezing the core requires a molecule".to_string())
        })?;
        Ok(molecule
            .atoms()
            .iter()
            .map(|atom| elements::core_orbitals(atom.atomic_number))
            .sum())
    }

    pub fn transform(&self, descriptor: &ElectronicDescriptor) -> Result<ElectronicDescriptor, DescriptorError> {
        let core = Self::num_core_orbitals(descriptor)?;
        if core == 0 {
            return Ok(descriptor.clone());
        }
        let (alpha, beta) = descriptor.num_particles();
        let electrons = (alpha + beta).checked_sub(2 * core).ok_or_else(|| {
            DescriptorError::InvalidActiveSpace(format!(
                "{core} core orbitals need more electrons than the problem has"
            ))
        })?;
        let orbitals = descriptor
            .num_spatial_orbitals()
            .checked_sub(core)
            .filter(|&o| o > 0)
            .ok_or_else(|| {
                DescriptorError::InvalidActiveSpace(format!(
                    "{core} core orbitals leave no active orbitals"
                ))
            })?;
        ActiveSpace::new(electrons, orbitals).transform(descriptor)
    }
}
