use std::{fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, Trim};
use nalgebra::Vector3;
use serde::Deserialize;
use thiserror::Error;

pub const RA_ERROR: &str = "RA_error";
pub const DEC_ERROR: &str = "DEC_error";
pub const ROLL_ERROR: &str = "Roll_error";

#[derive(Debug, Error)]
pub enum InputErrors {
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("could not open {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
}

/// Measured pointing error for one step, one component per axis.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct PointingError {
    #[serde(rename = "RA_error")]
    pub ra: f64,
    #[serde(rename = "DEC_error")]
    pub dec: f64,
    #[serde(rename = "Roll_error")]
    pub roll: f64,
}

impl PointingError {
    pub fn new(ra: f64, dec: f64, roll: f64) -> Self {
        Self { ra, dec, roll }
    }

    pub fn vector(&self) -> Vector3<f64> {
        Vector3::new(self.ra, self.dec, self.roll)
    }

    pub fn is_finite(&self) -> bool {
        self.ra.is_finite() && self.dec.is_finite() && self.roll.is_finite()
    }
}

impl From<(f64, f64, f64)> for PointingError {
    fn from((ra, dec, roll): (f64, f64, f64)) -> Self {
        Self::new(ra, dec, roll)
    }
}

#[derive(Debug, Default)]
pub struct LoadedErrors {
    pub errors: Vec<PointingError>,
    /// Rows dropped for a missing, non-numeric or non-finite value.
    pub skipped: usize,
}

/// Reads error samples from CSV with a header row.
///
/// Columns are matched by name and any other columns are ignored. A row that
/// does not yield three finite numbers is dropped and counted in `skipped`,
/// including every row of an input that lacks one of the error columns.
pub fn read_errors<R: Read>(reader: R) -> Result<LoadedErrors, InputErrors> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in [RA_ERROR, DEC_ERROR, ROLL_ERROR] {
        if !headers.iter().any(|h| h == column) {
            tracing::warn!("input has no '{}' column; every row will be skipped", column);
        }
    }

    let mut loaded = LoadedErrors::default();
    for (row_index, result) in reader.deserialize::<PointingError>().enumerate() {
        match result {
            Ok(error) if error.is_finite() => loaded.errors.push(error),
            Ok(_) => {
                tracing::debug!("skipping row {}: non-finite value", row_index + 1);
                loaded.skipped += 1;
            }
            Err(e) => {
                tracing::debug!("skipping row {}: {}", row_index + 1, e);
                loaded.skipped += 1;
            }
        }
    }
    Ok(loaded)
}

pub fn load_errors(path: &Path) -> Result<LoadedErrors, InputErrors> {
    let file = File::open(path).map_err(|source| InputErrors::Open {
        path: path.display().to_string(),
        source,
    })?;
    let loaded = read_errors(file)?;
    tracing::info!(
        "loaded {} error samples from {} ({} rows skipped)",
        loaded.errors.len(),
        path.display(),
        loaded.skipped
    );
    Ok(loaded)
}
