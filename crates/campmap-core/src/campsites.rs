//! Campsite dataset loading.
//!
//! The dataset is a headered CSV with one row per campground. Coordinates that
//! are blank or unparsable are coerced to `0.0` so that a single bad cell does
//! not drop an otherwise usable row; rows that cannot be decoded at all are
//! skipped with a warning.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open campsite dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A single campground from the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Campsite {
    #[serde(rename(deserialize = "Name"))]
    pub name: String,
    #[serde(rename(deserialize = "Type"), default)]
    pub facility_type: String,
    #[serde(rename(deserialize = "County"), default)]
    pub county: String,
    #[serde(
        rename(deserialize = "Latitude"),
        default,
        deserialize_with = "coerce_f64"
    )]
    pub latitude: f64,
    #[serde(
        rename(deserialize = "Longitude"),
        default,
        deserialize_with = "coerce_f64"
    )]
    pub longitude: f64,
    #[serde(rename(deserialize = "Website"), default)]
    pub website: Option<String>,
}

fn coerce_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().parse::<f64>().unwrap_or(0.0))
}

/// Loads the campsite dataset from a CSV file on disk.
///
/// # Errors
///
/// Returns [`DatasetError::Io`] if the file cannot be opened, or
/// [`DatasetError::Csv`] if the header row cannot be read.
pub fn load_campsites(path: &Path) -> Result<Vec<Campsite>, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let sites = parse_campsites(BufReader::new(file))?;
    tracing::debug!(path = %path.display(), count = sites.len(), "loaded campsite dataset");
    Ok(sites)
}

/// Parses campsite rows from any CSV source.
///
/// # Errors
///
/// Returns [`DatasetError::Csv`] if the header row cannot be read. Individual
/// malformed rows are skipped, not reported as errors.
pub fn parse_campsites<R: Read>(reader: R) -> Result<Vec<Campsite>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    // Surface header problems before iterating rows.
    reader.headers()?;

    let sites = reader
        .deserialize::<Campsite>()
        .enumerate()
        .filter_map(|(row, record)| {
            record
                .map_err(|e| {
                    tracing::warn!(row = row + 1, error = %e, "skipping malformed campsite row");
                })
                .ok()
        })
        .collect();

    Ok(sites)
}

/// Returns the campsites inside a `[west, south, east, north]` box, edges inclusive.
#[must_use]
pub fn campsites_within(sites: &[Campsite], bbox: [f64; 4]) -> Vec<&Campsite> {
    let [west, south, east, north] = bbox;
    sites
        .iter()
        .filter(|site| {
            (south..=north).contains(&site.latitude) && (west..=east).contains(&site.longitude)
        })
        .collect()
}
