use crate::core::io::traits::ChemistryFile;
use crate::core::models::descriptor::DescriptorError;
use crate::core::models::molecule::{Atom, LengthUnit, Molecule};
use crate::core::utils::units::BOHR_IN_ANGSTROM;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// The free-text comment line of an XYZ file, minus recognised tokens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XyzMetadata {
    pub comment: String,
}

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("Expected {expected} atoms, found {found}")]
    AtomCountMismatch { expected: usize, found: usize },
    #[error("Invalid molecule: {0}")]
    Descriptor(#[from] DescriptorError),
}

#[derive(Debug, Error, PartialEq)]
pub enum XyzParseErrorKind {
    #[error("Invalid atom count '{0}'")]
    InvalidCount(String),
    #[error("Invalid value for {key}: '{value}'")]
    InvalidToken { key: &'static str, value: String },
    #[error("Atom line needs 'symbol x y z'")]
    MissingField,
    #[error("Invalid coordinate '{0}'")]
    InvalidFloat(String),
}

pub struct XyzFile;

struct CommentLine {
    charge: i32,
    multiplicity: u32,
    comment: String,
}

fn parse_comment(line: &str, line_num: usize) -> Result<CommentLine, XyzError> {
    let mut charge = 0;
    let mut multiplicity = 1;
    let mut rest = Vec::new();
    for token in line.split_whitespace() {
        let lower = token.to_ascii_lowercase();
        if let Some(value) = lower.strip_prefix("charge=") {
            charge = value.parse().map_err(|_| XyzError::Parse {
                line: line_num,
                kind: XyzParseErrorKind::InvalidToken {
                    key: "charge",
                    value: value.to_string(),
                },
            })?;
        } else if let Some(value) = lower.strip_prefix("multiplicity=") {
            multiplicity = value.parse().map_err(|_| XyzError::Parse {
                line: line_num,
                kind: XyzParseErrorKind::InvalidToken {
                    key: "multiplicity",
                    value: value.to_string(),
                },
            })?;
        } else {
            rest.push(token);
        }
    }
    Ok(CommentLine {
        charge,
        multiplicity,
        comment: rest.join(" "),
    })
}

impl ChemistryFile for XyzFile {
    type Data = Molecule;
    type Metadata = XyzMetadata;
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Self::Data, Self::Metadata), Self::Error> {
        let mut lines = reader.lines();

        let count_line = lines.next().transpose()?.unwrap_or_default();
        let expected: usize = count_line.trim().parse().map_err(|_| XyzError::Parse {
            line: 1,
            kind: XyzParseErrorKind::InvalidCount(count_line.trim().to_string()),
        })?;
        let comment_line = lines.next().transpose()?.unwrap_or_default();
        let comment = parse_comment(&comment_line, 2)?;

        let mut atoms = Vec::with_capacity(expected);
        for (offset, line_res) in lines.enumerate() {
            let line = line_res?;
            let line_num = offset + 3;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if atoms.len() == expected {
                return Err(XyzError::AtomCountMismatch {
                    expected,
                    found: expected + 1,
                });
            }
            if fields.len() < 4 {
                return Err(XyzError::Parse {
                    line: line_num,
                    kind: XyzParseErrorKind::MissingField,
                });
            }
            let mut coords = [0.0; 3];
            for (slot, token) in coords.iter_mut().zip(&fields[1..4]) {
                *slot = token.parse().map_err(|_| XyzError::Parse {
                    line: line_num,
                    kind: XyzParseErrorKind::InvalidFloat(token.to_string()),
                })?;
            }
            atoms.push(Atom::new(
                fields[0],
                Point3::new(coords[0], coords[1], coords[2]),
            )?);
        }
        if atoms.len() != expected {
            return Err(XyzError::AtomCountMismatch {
                expected,
                found: atoms.len(),
            });
        }

        let molecule = Molecule::new(
            atoms,
            comment.charge,
            comment.multiplicity,
            LengthUnit::Angstrom,
        )?;
        Ok((
            molecule,
            XyzMetadata {
                comment: comment.comment,
            },
        ))
    }

    fn write_to(
        data: &Self::Data,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        writeln!(writer, "{}", data.atoms().len())?;
        write!(
            writer,
            "charge={} multiplicity={}",
            data.charge(),
            data.multiplicity()
        )?;
        if !metadata.comment.is_empty() {
            write!(writer, " {}", metadata.comment)?;
        }
        writeln!(writer)?;
        let to_angstrom = data.unit().to_bohr() * BOHR_IN_ANGSTROM;
        for atom in data.atoms() {
            let p = atom.position * to_angstrom;
            writeln!(
                writer,
                "{:<3} {:>15.10} {:>15.10} {:>15.10}",
                atom.label, p.x, p.y, p.z
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    const H2O: &str = "3\ncharge=0 multiplicity=1 water\nO 0.0 0.0 0.1173\nH 0.0 0.7572 -0.4692\nH 0.0 -0.7572 -0.4692\n";

    #[test]
    fn read_parses_atoms_and_comment_tokens() {
        let (molecule, metadata) = XyzFile::read_from(&mut Cursor::new(H2O)).unwrap();
        assert_eq!(molecule.atoms().len(), 3);
        assert_eq!(molecule.atoms()[0].atomic_number, 8);
        assert_eq!(molecule.num_alpha_beta().unwrap(), (5, 5));
        assert_eq!(metadata.comment, "water");
    }

    #[test]
    fn read_defaults_to_neutral_singlet() {
        let input = "2\n\nH 0 0 0\nH 0 0 0.74\n";
        let (molecule, _) = XyzFile::read_from(&mut Cursor::new(input)).unwrap();
        assert_eq!(molecule.charge(), 0);
        assert_eq!(molecule.multiplicity(), 1);
    }

    #[test]
    fn read_reports_atom_count_mismatch() {
        let input = "3\n\nH 0 0 0\nH 0 0 0.74\n";
        let err = XyzFile::read_from(&mut Cursor::new(input)).unwrap_err();
        assert!(matches!(
            err,
            XyzError::AtomCountMismatch {
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn read_reports_bad_coordinate_with_line_number() {
        let input = "1\n\nH 0 zero 0\n";
        let err = XyzFile::read_from(&mut Cursor::new(input)).unwrap_err();
        match err {
            XyzError::Parse { line, kind } => {
                assert_eq!(line, 3);
                assert_eq!(kind, XyzParseErrorKind::InvalidFloat("zero".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn read_rejects_unknown_element() {
        let input = "1\n\nXx 0 0 0\n";
        let err = XyzFile::read_from(&mut Cursor::new(input)).unwrap_err();
        assert!(matches!(
            err,
            XyzError::Descriptor(DescriptorError::UnknownElement(_))
        ));
    }

    #[test]
    fn write_then_read_preserves_geometry() {
        let (molecule, metadata) = XyzFile::read_from(&mut Cursor::new(H2O)).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("water.xyz");
        XyzFile::write_to_path(&molecule, &metadata, &path).unwrap();
        let (reread, remeta) = XyzFile::read_from_path(&path).unwrap();
        assert_eq!(remeta, metadata);
        for (a, b) in reread.atoms().iter().zip(molecule.atoms()) {
            assert_eq!(a.label, b.label);
            assert!((a.position - b.position).norm() < 1e-9);
        }
    }
}
