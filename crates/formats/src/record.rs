use foundation::geo::LonLat;
use serde::Serialize;

/// A facility as every downstream encoder sees it.
///
/// Text fields are empty when the source had none. Numeric fields are `None`
/// when absent or not numeric; parsed values may still be non-finite
/// (`"NaN"` in a string field), which display code must tolerate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityRecord {
    pub position: LonLat,
    pub name: String,
    pub address: String,
    pub ownership: String,
    /// Primary metric, e.g. median wait time in minutes.
    pub value: Option<f64>,
    /// Secondary rate, e.g. readmission percentage.
    pub readmission_rate: Option<f64>,
}

impl FacilityRecord {
    /// A record with only a position.
    pub fn at(position: LonLat) -> Self {
        Self {
            position,
            name: String::new(),
            address: String::new(),
            ownership: String::new(),
            value: None,
            readmission_rate: None,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// The metric as a float; absent values read as NaN.
    pub fn metric(&self) -> f64 {
        self.value.unwrap_or(f64::NAN)
    }

    pub fn rate(&self) -> f64 {
        self.readmission_rate.unwrap_or(f64::NAN)
    }
}

/// A record as it was found in the source document.
///
/// Resolved once at ingestion; nothing downstream inspects the source shape.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRecord {
    /// A `lng,lat` row from a CSV file.
    CsvPoint { position: LonLat },
    /// A JSON feature with attributes.
    Feature(FacilityRecord),
}

impl SourceRecord {
    pub fn position(&self) -> LonLat {
        match self {
            SourceRecord::CsvPoint { position } => *position,
            SourceRecord::Feature(record) => record.position,
        }
    }

    pub fn into_facility(self) -> FacilityRecord {
        match self {
            SourceRecord::CsvPoint { position } => FacilityRecord::at(position),
            SourceRecord::Feature(record) => record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FacilityRecord, SourceRecord};
    use foundation::geo::LonLat;

    #[test]
    fn csv_points_normalize_to_bare_records() {
        let p = LonLat::new(-122.4, 37.74);
        let record = SourceRecord::CsvPoint { position: p }.into_facility();
        assert_eq!(record, FacilityRecord::at(p));
        assert!(record.metric().is_nan());
        assert!(record.name.is_empty());
    }

    #[test]
    fn features_pass_through() {
        let record = FacilityRecord::at(LonLat::new(1.0, 2.0)).with_value(150.0);
        let source = SourceRecord::Feature(record.clone());
        assert_eq!(source.position(), LonLat::new(1.0, 2.0));
        assert_eq!(source.into_facility(), record);
    }
}
