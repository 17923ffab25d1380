use super::descriptor::DescriptorError;
use crate::core::utils::elements;
use crate::core::utils::units::ANGSTROM_TO_BOHR;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Unit in which atomic coordinates are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LengthUnit {
    #[default]
    Angstrom,
    Bohr,
}

impl LengthUnit {
    /// Factor converting a length in this unit to bohr.
    pub fn to_bohr(self) -> f64 {
        match self {
            LengthUnit::Angstrom => ANGSTROM_TO_BOHR,
            LengthUnit::Bohr => 1.0,
        }
    }
}

/// A single nucleus of a molecular geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The element label as given (e.g. "H", "Li").
    pub label: String,
    /// The nuclear charge resolved from the label.
    pub atomic_number: u32,
    /// The position in the molecule's length unit.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates an atom, resolving its nuclear charge from the element table.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::UnknownElement`] if the label does not name
    /// a known element.
    pub fn new(label: &str, position: Point3<f64>) -> Result<Self, DescriptorError> {
        let atomic_number = elements::atomic_number(label)
            .ok_or_else(|| DescriptorError::UnknownElement(label.to_string()))?;
        Ok(Self {
            label: label.trim().to_string(),
            atomic_number,
            position,
        })
    }
}

/// An ordered molecular geometry together with its charge and spin multiplicity.
///
/// The geometry is immutable once constructed; all derived quantities
/// (electron counts, nuclear repulsion, nuclear dipole) are computed on demand
/// in atomic units.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
    charge: i32,
    multiplicity: u32,
    unit: LengthUnit,
}

impl Molecule {
    /// Creates a molecule and checks that the charge and multiplicity are
    /// consistent with the number of electrons.
    ///
    /// # Errors
    ///
    /// Returns an error if the multiplicity is zero, if the charge removes more
    /// electrons than exist, or if the multiplicity cannot be realized with the
    /// resulting electron count.
    pub fn new(
        atoms: Vec<Atom>,
        charge: i32,
        multiplicity: u32,
        unit: LengthUnit,
    ) -> Result<Self, DescriptorError> {
        let molecule = Self {
            atoms,
            charge,
            multiplicity,
            unit,
        };
        molecule.num_alpha_beta()?;
        Ok(molecule)
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn charge(&self) -> i32 {
        self.charge
    }

    pub fn multiplicity(&self) -> u32 {
        self.multiplicity
    }

    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    /// Total number of electrons, ΣZ minus the molecular charge.
    pub fn num_electrons(&self) -> Result<usize, DescriptorError> {
        let nuclear_charge: i64 = self.atoms.iter().map(|a| a.atomic_number as i64).sum();
        let electrons = nuclear_charge - self.charge as i64;
        usize::try_from(electrons).map_err(|_| DescriptorError::InconsistentSpin {
            electrons,
            multiplicity: self.multiplicity,
        })
    }

    /// Number of alpha and beta electrons implied by charge and multiplicity.
    pub fn num_alpha_beta(&self) -> Result<(usize, usize), DescriptorError> {
        let electrons = self.num_electrons()?;
        let unpaired = (self.multiplicity as usize).checked_sub(1);
        match unpaired {
            Some(unpaired) if unpaired <= electrons && (electrons - unpaired) % 2 == 0 => {
                let beta = (electrons - unpaired) / 2;
                Ok((beta + unpaired, beta))
            }
            _ => Err(DescriptorError::InconsistentSpin {
                electrons: electrons as i64,
                multiplicity: self.multiplicity,
            }),
        }
    }

    /// Atomic positions converted to bohr.
    pub fn positions_bohr(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        let factor = self.unit.to_bohr();
        self.atoms.iter().map(move |a| a.position * factor)
    }

    /// Classical nuclear repulsion energy Σ_{A<B} Z_A Z_B / R_AB in Hartree.
    pub fn nuclear_repulsion_energy(&self) -> f64 {
        let positions: Vec<_> = self.positions_bohr().collect();
        let mut energy = 0.0;
        for i in 0..self.atoms.len() {
            for j in (i + 1)..self.atoms.len() {
                let distance = (positions[i] - positions[j]).norm();
                if distance > 1e-12 {
                    energy += (self.atoms[i].atomic_number * self.atoms[j].atomic_number) as f64
                        / distance;
                }
            }
        }
        energy
    }

    /// Nuclear contribution to the dipole moment Σ Z_A R_A in atomic units.
    pub fn nuclear_dipole(&self) -> Vector3<f64> {
        self.atoms
            .iter()
            .zip(self.positions_bohr())
            .fold(Vector3::zeros(), |acc, (atom, position)| {
                acc + position.coords * atom.atomic_number as f64
            })
    }
}
