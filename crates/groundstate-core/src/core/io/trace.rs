use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("CSV error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// One objective evaluation of a variational run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub evaluation: usize,
    pub energy: f64,
}

#[derive(Serialize)]
struct ObservableRecord<'a> {
    observable: &'a str,
    value: f64,
}

fn csv_error(path: &Path) -> impl Fn(csv::Error) -> TraceError + '_ {
    move |source| TraceError::Csv {
        path: path.to_string_lossy().to_string(),
        source,
    }
}

/// Writes the energy of every objective evaluation, numbered from 1.
pub fn write_energy_trace(path: &Path, history: &[f64]) -> Result<(), TraceError> {
    let mut writer = csv::Writer::from_path(path).map_err(csv_error(path))?;
    for (i, &energy) in history.iter().enumerate() {
        writer
            .serialize(TraceRecord {
                evaluation: i + 1,
                energy,
            })
            .map_err(csv_error(path))?;
    }
    writer.flush().map_err(|e| TraceError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

pub fn read_energy_trace(path: &Path) -> Result<Vec<TraceRecord>, TraceError> {
    let mut reader = csv::Reader::from_path(path).map_err(csv_error(path))?;
    reader
        .deserialize::<TraceRecord>()
        .map(|record| record.map_err(csv_error(path)))
        .collect()
}

/// Writes an `observable,value` table.
pub fn write_observables(path: &Path, values: &BTreeMap<String, f64>) -> Result<(), TraceError> {
    let mut writer = csv::Writer::from_path(path).map_err(csv_error(path))?;
    for (observable, &value) in values {
        writer
            .serialize(ObservableRecord { observable, value })
            .map_err(csv_error(path))?;
    }
    writer.flush().map_err(|e| TraceError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}
