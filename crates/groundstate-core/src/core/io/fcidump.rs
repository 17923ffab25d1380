use crate::core::io::traits::ChemistryFile;
use crate::core::models::descriptor::DescriptorError;
use crate::core::models::integrals::{ElectronicIntegrals, TwoBodyIntegrals};
use crate::core::operators::pauli::MAX_QUBITS;
use nalgebra::DMatrix;
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Two spin orbitals per spatial orbital, one qubit each.
const MAX_SPATIAL_ORBITALS: usize = MAX_QUBITS / 2;

/// Integrals and core energy stored in an FCIDUMP file.
#[derive(Debug, Clone, PartialEq)]
pub struct FcidumpData {
    pub integrals: ElectronicIntegrals,
    pub core_energy: f64,
}

/// The `&FCI ... /` namelist header.
#[derive(Debug, Clone, PartialEq)]
pub struct FcidumpHeader {
    pub norb: usize,
    pub nelec: usize,
    pub ms2: i64,
    pub orbsym: Vec<u32>,
    pub isym: u32,
}

impl FcidumpHeader {
    pub fn new(norb: usize, nelec: usize, ms2: i64) -> Self {
        Self {
            norb,
            nelec,
            ms2,
            orbsym: vec![1; norb],
            isym: 1,
        }
    }

    /// Alpha and beta electron counts implied by NELEC and MS2.
    pub fn num_particles(&self) -> Result<(usize, usize), FcidumpError> {
        let nelec = self.nelec as i64;
        if (nelec + self.ms2) % 2 != 0 || self.ms2.abs() > nelec {
            return Err(FcidumpError::Inconsistency(format!(
                "NELEC={} is incompatible with MS2={}",
                self.nelec, self.ms2
            )));
        }
        Ok((((nelec + self.ms2) / 2) as usize, ((nelec - self.ms2) / 2) as usize))
    }
}

#[derive(Debug, Error)]
pub enum FcidumpError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: FcidumpParseErrorKind },
    #[error("Missing header field: {0}")]
    MissingField(&'static str),
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Invalid integrals: {0}")]
    Descriptor(#[from] DescriptorError),
}

#[derive(Debug, Error, PartialEq)]
pub enum FcidumpParseErrorKind {
    #[error("Unterminated &FCI namelist")]
    UnterminatedHeader,
    #[error("Invalid value for header field {field}: '{value}'")]
    InvalidHeaderValue { field: String, value: String },
    #[error("Expected 5 fields (value i j k l), found {0}")]
    WrongFieldCount(usize),
    #[error("Invalid float '{0}'")]
    InvalidFloat(String),
    #[error("Invalid orbital index '{0}'")]
    InvalidIndex(String),
    #[error("Orbital index {index} exceeds NORB={norb}")]
    IndexOutOfRange { index: usize, norb: usize },
}

pub struct FcidumpFile;

fn parse_header(text: &str, line: usize) -> Result<FcidumpHeader, FcidumpError> {
    let body = text
        .trim()
        .trim_start_matches(|c: char| c == '&' || c == '$')
        .trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut current: Option<String> = None;
    for token in body.split(|c: char| c == ',' || c.is_whitespace()) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if let Some((key, value)) = token.split_once('=') {
            let key = key.trim().to_ascii_uppercase();
            let values = fields.entry(key.clone()).or_default();
            if !value.trim().is_empty() {
                values.push(value.trim().to_string());
            }
            current = Some(key);
        } else if let Some(key) = &current {
            fields.entry(key.clone()).or_default().push(token.to_string());
        }
    }

    let scalar = |name: &'static str| -> Result<Option<i64>, FcidumpError> {
        match fields.get(name).and_then(|v| v.first()) {
            None => Ok(None),
            Some(value) => value.parse::<i64>().map(Some).map_err(|_| FcidumpError::Parse {
                line,
                kind: FcidumpParseErrorKind::InvalidHeaderValue {
                    field: name.to_string(),
                    value: value.clone(),
                },
            }),
        }
    };

    let norb = scalar("NORB")?.ok_or(FcidumpError::MissingField("NORB"))?;
    let nelec = scalar("NELEC")?.ok_or(FcidumpError::MissingField("NELEC"))?;
    let ms2 = scalar("MS2")?.unwrap_or(0);
    let isym = scalar("ISYM")?.unwrap_or(1);
    if norb < 0 || nelec < 0 {
        return Err(FcidumpError::Inconsistency(format!(
            "negative NORB={norb} or NELEC={nelec}"
        )));
    }
    if norb as usize > MAX_SPATIAL_ORBITALS {
        return Err(FcidumpError::Inconsistency(format!(
            "NORB={norb} exceeds the {MAX_SPATIAL_ORBITALS} spatial orbitals any mapping can encode"
        )));
    }
    let orbsym = match fields.get("ORBSYM") {
        Some(values) => values
            .iter()
            .map(|v| {
                v.parse::<u32>().map_err(|_| FcidumpError::Parse {
                    line,
                    kind: FcidumpParseErrorKind::InvalidHeaderValue {
                        field: "ORBSYM".to_string(),
                        value: v.clone(),
                    },
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => vec![1; norb as usize],
    };

    Ok(FcidumpHeader {
        norb: norb as usize,
        nelec: nelec as usize,
        ms2,
        orbsym,
        isym: isym.max(0) as u32,
    })
}

fn parse_index(token: &str, norb: usize, line: usize) -> Result<usize, FcidumpError> {
    let index: usize = token.parse().map_err(|_| FcidumpError::Parse {
        line,
        kind: FcidumpParseErrorKind::InvalidIndex(token.to_string()),
    })?;
    if index > norb {
        return Err(FcidumpError::Parse {
            line,
            kind: FcidumpParseErrorKind::IndexOutOfRange { index, norb },
        });
    }
    Ok(index)
}

fn is_header_end(line: &str) -> bool {
    let trimmed = line.trim().to_ascii_uppercase();
    trimmed.ends_with('/') || trimmed.ends_with("&END") || trimmed.ends_with("$END")
}

impl ChemistryFile for FcidumpFile {
    type Data = FcidumpData;
    type Metadata = FcidumpHeader;
    type Error = FcidumpError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Self::Data, Self::Metadata), Self::Error> {
        let mut lines = reader.lines().enumerate();

        let mut header_text = String::new();
        let mut header_line = 1;
        let mut terminated = false;
        for (line_num, line_res) in lines.by_ref() {
            let line = line_res?;
            header_line = line_num + 1;
            let upper = line.trim().to_ascii_uppercase();
            let content = upper
                .trim_end_matches("&END")
                .trim_end_matches("$END")
                .trim_end_matches('/');
            header_text.push(' ');
            header_text.push_str(content);
            if is_header_end(&line) {
                terminated = true;
                break;
            }
        }
        if !terminated {
            return Err(FcidumpError::Parse {
                line: header_line,
                kind: FcidumpParseErrorKind::UnterminatedHeader,
            });
        }
        let header = parse_header(&header_text, header_line)?;
        let norb = header.norb;

        let mut one_body = DMatrix::<f64>::zeros(norb, norb);
        let mut two_body = TwoBodyIntegrals::zeros(norb)?;
        let mut core_energy = 0.0;

        for (line_num, line_res) in lines {
            let line = line_res?;
            let line_num = line_num + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() != 5 {
                return Err(FcidumpError::Parse {
                    line: line_num,
                    kind: FcidumpParseErrorKind::WrongFieldCount(fields.len()),
                });
            }
            let value: f64 = fields[0]
                .replace(['D', 'd'], "E")
                .parse()
                .map_err(|_| FcidumpError::Parse {
                    line: line_num,
                    kind: FcidumpParseErrorKind::InvalidFloat(fields[0].to_string()),
                })?;
            let mut idx = [0usize; 4];
            for (slot, token) in idx.iter_mut().zip(&fields[1..]) {
                *slot = parse_index(token, norb, line_num)?;
            }
            match idx {
                [0, 0, 0, 0] => core_energy = value,
                [i, j, 0, 0] if i > 0 && j > 0 => {
                    one_body[(i - 1, j - 1)] = value;
                    one_body[(j - 1, i - 1)] = value;
                }
                [i, j, k, l] if i > 0 && j > 0 && k > 0 && l > 0 => {
                    two_body.set(i - 1, j - 1, k - 1, l - 1, value);
                }
                // Orbital energies (i 0 0 0) and other partial records carry no integrals.
                _ => {}
            }
        }

        let integrals = ElectronicIntegrals::new(one_body, two_body)?;
        Ok((
            FcidumpData {
                integrals,
                core_energy,
            },
            header,
        ))
    }

    fn write_to(
        data: &Self::Data,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let norb = data.integrals.num_spatial_orbitals();
        if metadata.norb != norb {
            return Err(FcidumpError::Inconsistency(format!(
                "header NORB={} but integrals cover {} orbitals",
                metadata.norb, norb
            )));
        }
        let orbsym: Vec<String> = metadata.orbsym.iter().map(u32::to_string).collect();
        writeln!(
            writer,
            " &FCI NORB={},NELEC={},MS2={},",
            metadata.norb, metadata.nelec, metadata.ms2
        )?;
        writeln!(writer, "  ORBSYM={},", orbsym.join(","))?;
        writeln!(writer, "  ISYM={},", metadata.isym)?;
        writeln!(writer, " &END")?;

        for ((p, q, r, s), value) in data.integrals.two_body().unique_nonzero() {
            writeln!(writer, "{:>24.16e} {:>4} {:>4} {:>4} {:>4}", value, p + 1, q + 1, r + 1, s + 1)?;
        }
        let h = data.integrals.one_body();
        for p in 0..norb {
            for q in 0..=p {
                if h[(p, q)] != 0.0 {
                    writeln!(writer, "{:>24.16e} {:>4} {:>4} {:>4} {:>4}", h[(p, q)], p + 1, q + 1, 0, 0)?;
                }
            }
        }
        writeln!(writer, "{:>24.16e} {:>4} {:>4} {:>4} {:>4}", data.core_energy, 0, 0, 0, 0)?;
        Ok(())
    }
}
