use serde::{Deserialize, Serialize};

use crate::record::{FacilityRecord, SourceRecord};

/// Shape of the dataset document.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    /// Header row plus `lng,lat` columns.
    Csv,
    /// Array of features, or an object with a `features` array.
    #[default]
    Json,
}

impl DataFormat {
    /// Guesses the format from a URL or path extension.
    pub fn infer(location: &str) -> Self {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        if path.to_ascii_lowercase().ends_with(".csv") {
            DataFormat::Csv
        } else {
            DataFormat::Json
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    Json(String),
    NotAFeatureList,
    EmptyCsv,
    MissingColumn(&'static str),
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Json(msg) => write!(f, "dataset is not valid JSON: {msg}"),
            DatasetError::NotAFeatureList => {
                write!(f, "expected an array of features or an object with `features`")
            }
            DatasetError::EmptyCsv => write!(f, "CSV dataset has no header row"),
            DatasetError::MissingColumn(name) => write!(f, "CSV header has no `{name}` column"),
        }
    }
}

impl std::error::Error for DatasetError {}

/// Normalized, read-only dataset.
///
/// Record indices are stable for the lifetime of the dataset; picking and
/// tooltips refer to records by index.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<FacilityRecord>,
    skipped: usize,
}

impl Dataset {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<FacilityRecord>) -> Self {
        Self {
            records,
            skipped: 0,
        }
    }

    pub fn from_sources(sources: Vec<SourceRecord>, skipped: usize) -> Self {
        Self {
            records: sources.into_iter().map(SourceRecord::into_facility).collect(),
            skipped,
        }
    }

    pub fn parse(format: DataFormat, text: &str) -> Result<Self, DatasetError> {
        match format {
            DataFormat::Csv => {
                let parsed = crate::csv::parse_points(text)?;
                Ok(Self::from_sources(parsed.records, parsed.skipped))
            }
            DataFormat::Json => {
                let parsed = crate::features::parse_features(text)?;
                Ok(Self::from_sources(parsed.records, parsed.skipped))
            }
        }
    }

    pub fn records(&self) -> &[FacilityRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&FacilityRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Source entries dropped during ingestion.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
