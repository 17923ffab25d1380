use super::integrals::{DipoleIntegrals, ElectronicIntegrals};
use super::molecule::Molecule;
use super::vibrational::VibrationalDescriptor;
use nalgebra::Vector3;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DescriptorError {
    #[error("Unknown element label: '{0}'")]
    UnknownElement(String),

    #[error("Multiplicity {multiplicity} is impossible with {electrons} electrons")]
    InconsistentSpin { electrons: i64, multiplicity: u32 },

    #[error("Dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{what} integrals are not symmetric (max deviation {asymmetry:.3e})")]
    NotSymmetric { what: &'static str, asymmetry: f64 },

    #[error("{alpha} alpha and {beta} beta particles do not fit into {orbitals} spatial orbitals")]
    TooManyParticles {
        alpha: usize,
        beta: usize,
        orbitals: usize,
    },

    #[error("Missing required descriptor data: {0}")]
    Missing(&'static str),

    #[error("Invalid vibrational term {index}: {reason}")]
    InvalidVibrationalTerm { index: usize, reason: String },

    #[error("Invalid active space: {0}")]
    InvalidActiveSpace(String),

    #[error("{0} spatial orbitals are too many to store two-body integrals")]
    TooManyOrbitals(usize),
}

/// The class of physical problem a descriptor describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProblemClass {
    Electronic,
    Vibrational,
}

impl fmt::Display for ProblemClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemClass::Electronic => write!(f, "electronic"),
            ProblemClass::Vibrational => write!(f, "vibrational"),
        }
    }
}

/// Input to a [`Transformation`](crate::engine::transform::Transformation).
#[derive(Debug, Clone, PartialEq)]
pub enum ProblemDescriptor {
    Electronic(ElectronicDescriptor),
    Vibrational(VibrationalDescriptor),
}

impl ProblemDescriptor {
    pub fn class(&self) -> ProblemClass {
        match self {
            ProblemDescriptor::Electronic(_) => ProblemClass::Electronic,
            ProblemDescriptor::Vibrational(_) => ProblemClass::Vibrational,
        }
    }
}

impl From<ElectronicDescriptor> for ProblemDescriptor {
    fn from(d: ElectronicDescriptor) -> Self {
        ProblemDescriptor::Electronic(d)
    }
}

impl From<VibrationalDescriptor> for ProblemDescriptor {
    fn from(d: VibrationalDescriptor) -> Self {
        ProblemDescriptor::Vibrational(d)
    }
}

/// An electronic-structure problem in a restricted spatial-orbital basis.
///
/// The descriptor owns everything needed to build the second-quantized
/// Hamiltonian and the classical constants added back after the solve:
/// the nuclear repulsion energy, the nuclear dipole and any energy shifts
/// produced by problem transformers (for example an active-space reduction).
#[derive(Debug, Clone, PartialEq)]
pub struct ElectronicDescriptor {
    molecule: Option<Molecule>,
    integrals: ElectronicIntegrals,
    num_particles: (usize, usize),
    nuclear_repulsion_energy: f64,
    dipole: Option<DipoleIntegrals>,
    nuclear_dipole: Vector3<f64>,
    dipole_shift: Vector3<f64>,
    energy_shifts: BTreeMap<String, f64>,
}

impl ElectronicDescriptor {
    pub fn builder() -> ElectronicDescriptorBuilder {
        ElectronicDescriptorBuilder::default()
    }

    pub fn molecule(&self) -> Option<&Molecule> {
        self.molecule.as_ref()
    }

    pub fn integrals(&self) -> &ElectronicIntegrals {
        &self.integrals
    }

    pub fn num_spatial_orbitals(&self) -> usize {
        self.integrals.num_spatial_orbitals()
    }

    pub fn num_spin_orbitals(&self) -> usize {
        2 * self.num_spatial_orbitals()
    }

    pub fn num_particles(&self) -> (usize, usize) {
        self.num_particles
    }

    pub fn nuclear_repulsion_energy(&self) -> f64 {
        self.nuclear_repulsion_energy
    }

    pub fn dipole(&self) -> Option<&DipoleIntegrals> {
        self.dipole.as_ref()
    }

    pub fn nuclear_dipole(&self) -> Vector3<f64> {
        self.nuclear_dipole
    }

    /// Electronic dipole carried by orbitals removed from the problem.
    pub fn dipole_shift(&self) -> Vector3<f64> {
        self.dipole_shift
    }

    /// Named constant energies accumulated by problem transformers.
    pub fn energy_shifts(&self) -> &BTreeMap<String, f64> {
        &self.energy_shifts
    }

    /// Nuclear repulsion plus every transformer shift.
    pub fn constant_energy(&self) -> f64 {
        self.nuclear_repulsion_energy + self.energy_shifts.values().sum::<f64>()
    }

    /// Returns a reduced copy of this descriptor, used by problem transformers.
    pub(crate) fn reduced(
        &self,
        integrals: ElectronicIntegrals,
        num_particles: (usize, usize),
        dipole: Option<DipoleIntegrals>,
        dipole_shift: Vector3<f64>,
        shift_name: &str,
        shift: f64,
    ) -> Self {
        let mut energy_shifts = self.energy_shifts.clone();
        *energy_shifts.entry(shift_name.to_string()).or_default() += shift;
        Self {
            molecule: self.molecule.clone(),
            integrals,
            num_particles,
            nuclear_repulsion_energy: self.nuclear_repulsion_energy,
            dipole,
            nuclear_dipole: self.nuclear_dipole,
            dipole_shift: self.dipole_shift + dipole_shift,
            energy_shifts,
        }
    }
}

#[derive(Default)]
pub struct ElectronicDescriptorBuilder {
    molecule: Option<Molecule>,
    integrals: Option<ElectronicIntegrals>,
    num_particles: Option<(usize, usize)>,
    nuclear_repulsion_energy: Option<f64>,
    dipole: Option<DipoleIntegrals>,
}

impl ElectronicDescriptorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn molecule(mut self, molecule: Molecule) -> Self {
        self.molecule = Some(molecule);
        self
    }
    pub fn integrals(mut self, integrals: ElectronicIntegrals) -> Self {
        self.integrals = Some(integrals);
        self
    }
    pub fn num_particles(mut self, alpha: usize, beta: usize) -> Self {
        self.num_particles = Some((alpha, beta));
        self
    }
    pub fn nuclear_repulsion_energy(mut self, energy: f64) -> Self {
        self.nuclear_repulsion_energy = Some(energy);
        self
    }
    pub fn dipole(mut self, dipole: DipoleIntegrals) -> Self {
        self.dipole = Some(dipole);
        self
    }

    /// Validates the collected data and produces the immutable descriptor.
    ///
    /// Explicit particle numbers and nuclear repulsion take precedence over
    /// the values derived from the molecule. Without a molecule both must be
    /// supplied explicitly.
    pub fn build(self) -> Result<ElectronicDescriptor, DescriptorError> {
        let integrals = self.integrals.ok_or(DescriptorError::Missing("integrals"))?;
        let num_particles = match (self.num_particles, &self.molecule) {
            (Some(n), _) => n,
            (None, Some(molecule)) => molecule.num_alpha_beta()?,
            (None, None) => return Err(DescriptorError::Missing("num_particles")),
        };
        let nuclear_repulsion_energy = match (self.nuclear_repulsion_energy, &self.molecule) {
            (Some(e), _) => e,
            (None, Some(molecule)) => molecule.nuclear_repulsion_energy(),
            (None, None) => return Err(DescriptorError::Missing("nuclear_repulsion_energy")),
        };

        let orbitals = integrals.num_spatial_orbitals();
        if num_particles.0 > orbitals || num_particles.1 > orbitals {
            return Err(DescriptorError::TooManyParticles {
                alpha: num_particles.0,
                beta: num_particles.1,
                orbitals,
            });
        }
        if let Some(dipole) = &self.dipole {
            if dipole.num_spatial_orbitals() != orbitals {
                return Err(DescriptorError::DimensionMismatch {
                    what: "dipole integrals",
                    expected: orbitals,
                    found: dipole.num_spatial_orbitals(),
                });
            }
        }

        let nuclear_dipole = self
            .molecule
            .as_ref()
            .map(Molecule::nuclear_dipole)
            .unwrap_or_else(Vector3::zeros);

        Ok(ElectronicDescriptor {
            molecule: self.molecule,
            integrals,
            num_particles,
            nuclear_repulsion_energy,
            dipole: self.dipole,
            nuclear_dipole,
            dipole_shift: Vector3::zeros(),
            energy_shifts: BTreeMap::new(),
        })
    }
}
