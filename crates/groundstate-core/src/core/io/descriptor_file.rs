use crate::core::io::fcidump::{FcidumpError, FcidumpFile};
use crate::core::io::traits::ChemistryFile;
use crate::core::io::xyz::{XyzError, XyzFile};
use crate::core::models::descriptor::{DescriptorError, ElectronicDescriptor, ProblemDescriptor};
use crate::core::models::integrals::DipoleIntegrals;
use crate::core::models::molecule::{Atom, LengthUnit, Molecule};
use crate::core::models::vibrational::{ModalExcitation, VibrationalDescriptor, VibrationalTerm};
use nalgebra::{DMatrix, Point3};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DescriptorFileError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("FCIDUMP error for '{path}': {source}")]
    Fcidump { path: String, source: FcidumpError },
    #[error("XYZ error for '{path}': {source}")]
    Xyz { path: String, source: XyzError },
    #[error("Invalid problem description: {0}")]
    Descriptor(#[from] DescriptorError),
    #[error("Problem file must contain exactly one of [electronic] or [vibrational]")]
    AmbiguousProblem,
    #[error("Invalid problem description: {0}")]
    Invalid(String),
}

/// On-disk description of a problem, one section per problem class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProblemFile {
    pub electronic: Option<ElectronicSection>,
    pub vibrational: Option<VibrationalSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ElectronicSection {
    pub fcidump: PathBuf,
    pub xyz: Option<PathBuf>,
    pub atoms: Option<Vec<AtomEntry>>,
    pub unit: Option<LengthUnit>,
    pub charge: Option<i32>,
    pub multiplicity: Option<u32>,
    pub num_particles: Option<[usize; 2]>,
    pub nuclear_repulsion_energy: Option<f64>,
    pub dipole: Option<DipoleSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AtomEntry {
    pub symbol: String,
    pub position: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DipoleSection {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<Vec<f64>>,
    pub z: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct VibrationalSection {
    pub num_modals: Vec<usize>,
    pub frequencies: Option<Vec<f64>>,
    #[serde(default)]
    pub terms: Vec<TermEntry>,
}

/// `coefficient × Π b†_{mode,creation} b_{mode,annihilation}`, factors as `[mode, creation, annihilation]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TermEntry {
    pub coefficient: f64,
    pub factors: Vec<[usize; 3]>,
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn matrix(rows: &[Vec<f64>], what: &'static str) -> Result<DMatrix<f64>, DescriptorFileError> {
    let n = rows.len();
    if let Some(row) = rows.iter().find(|r| r.len() != n) {
        return Err(DescriptorError::DimensionMismatch {
            what,
            expected: n,
            found: row.len(),
        }
        .into());
    }
    Ok(DMatrix::from_fn(n, n, |i, j| rows[i][j]))
}

/// Reads a problem file and every file it references.
pub fn load_descriptor(path: &Path) -> Result<ProblemDescriptor, DescriptorFileError> {
    let content = std::fs::read_to_string(path).map_err(|e| DescriptorFileError::Io {
        path: path_string(path),
        source: e,
    })?;
    let file: ProblemFile = toml::from_str(&content).map_err(|e| DescriptorFileError::Toml {
        path: path_string(path),
        source: e,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    build_descriptor(&file, base_dir)
}

/// Builds a descriptor from a parsed problem file; relative paths resolve against `base_dir`.
pub fn build_descriptor(file: &ProblemFile, base_dir: &Path) -> Result<ProblemDescriptor, DescriptorFileError> {
    match (&file.electronic, &file.vibrational) {
        (Some(section), None) => Ok(build_electronic(section, base_dir)?.into()),
        (None, Some(section)) => Ok(build_vibrational(section)?.into()),
        _ => Err(DescriptorFileError::AmbiguousProblem),
    }
}

fn build_molecule(section: &ElectronicSection, base_dir: &Path) -> Result<Option<Molecule>, DescriptorFileError> {
    match (&section.xyz, &section.atoms) {
        (Some(_), Some(_)) => Err(DescriptorFileError::Invalid(
            "specify the geometry either via 'xyz' or via 'atoms', not both".to_string(),
        )),
        (Some(xyz), None) => {
            let xyz_path = resolve(base_dir, xyz);
            let (molecule, _) = XyzFile::read_from_path(&xyz_path).map_err(|e| DescriptorFileError::Xyz {
                path: path_string(&xyz_path),
                source: e,
            })?;
            if section.charge.is_none() && section.multiplicity.is_none() {
                return Ok(Some(molecule));
            }
            Ok(Some(Molecule::new(
                molecule.atoms().to_vec(),
                section.charge.unwrap_or(molecule.charge()),
                section.multiplicity.unwrap_or(molecule.multiplicity()),
                molecule.unit(),
            )?))
        }
        (None, Some(entries)) => {
            let atoms = entries
                .iter()
                .map(|a| Atom::new(&a.symbol, Point3::from(a.position)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(Molecule::new(
                atoms,
                section.charge.unwrap_or(0),
                section.multiplicity.unwrap_or(1),
                section.unit.unwrap_or_default(),
            )?))
        }
        (None, None) => Ok(None),
    }
}

fn build_electronic(section: &ElectronicSection, base_dir: &Path) -> Result<ElectronicDescriptor, DescriptorFileError> {
    let fcidump_path = resolve(base_dir, &section.fcidump);
    let (data, header) =
        FcidumpFile::read_from_path(&fcidump_path).map_err(|e| DescriptorFileError::Fcidump {
            path: path_string(&fcidump_path),
            source: e,
        })?;

    let molecule = build_molecule(section, base_dir)?;
    let num_particles = match (section.num_particles, &molecule) {
        (Some([alpha, beta]), _) => (alpha, beta),
        (None, Some(molecule)) => molecule.num_alpha_beta()?,
        (None, None) => header.num_particles().map_err(|e| DescriptorFileError::Fcidump {
            path: path_string(&fcidump_path),
            source: e,
        })?,
    };

    let mut builder = ElectronicDescriptor::builder()
        .integrals(data.integrals)
        .num_particles(num_particles.0, num_particles.1)
        .nuclear_repulsion_energy(section.nuclear_repulsion_energy.unwrap_or(data.core_energy));
    if let Some(molecule) = molecule {
        builder = builder.molecule(molecule);
    }
    if let Some(dipole) = &section.dipole {
        builder = builder.dipole(DipoleIntegrals::new(
            matrix(&dipole.x, "dipole x")?,
            matrix(&dipole.y, "dipole y")?,
            matrix(&dipole.z, "dipole z")?,
        )?);
    }
    Ok(builder.build()?)
}

fn build_vibrational(section: &VibrationalSection) -> Result<VibrationalDescriptor, DescriptorFileError> {
    let mut terms = match &section.frequencies {
        Some(frequencies) => VibrationalDescriptor::harmonic(frequencies, &section.num_modals)?
            .terms()
            .to_vec(),
        None => Vec::new(),
    };
    terms.extend(section.terms.iter().map(|entry| {
        VibrationalTerm::new(
            entry.coefficient,
            entry
                .factors
                .iter()
                .map(|&[mode, creation, annihilation]| ModalExcitation::new(mode, creation, annihilation))
                .collect(),
        )
    }));
    Ok(VibrationalDescriptor::new(section.num_modals.clone(), terms)?)
}
