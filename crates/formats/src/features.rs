//! JSON feature ingestion.
//!
//! Accepted documents:
//! - a top-level array of feature objects, or
//! - an object with a `features` array (GeoJSON `FeatureCollection` or similar).
//!
//! Attributes are looked up on the feature first, then in its `properties`
//! object. The position is the first of:
//! - `centroid` as `[lng, lat]`
//! - `centroid` as `{ "position": [lng, lat] }` or `{ "coordinates": [lng, lat] }`
//! - a GeoJSON `Point` geometry

use foundation::geo::LonLat;
use serde_json::{Map, Value};
use tracing::debug;

use crate::dataset::DatasetError;
use crate::record::{FacilityRecord, SourceRecord};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FeatureRecords {
    pub records: Vec<SourceRecord>,
    /// Features dropped because they had no usable position.
    pub skipped: usize,
}

pub fn parse_features(text: &str) -> Result<FeatureRecords, DatasetError> {
    let value: Value = serde_json::from_str(text).map_err(|e| DatasetError::Json(e.to_string()))?;
    parse_features_value(&value)
}

pub fn parse_features_value(value: &Value) -> Result<FeatureRecords, DatasetError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(obj) => obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(DatasetError::NotAFeatureList)?,
        _ => return Err(DatasetError::NotAFeatureList),
    };

    let mut out = FeatureRecords::default();
    for (index, item) in items.iter().enumerate() {
        match parse_feature(item) {
            Some(record) => out.records.push(SourceRecord::Feature(record)),
            None => {
                debug!(index, "skipping feature without a position");
                out.skipped += 1;
            }
        }
    }
    Ok(out)
}

struct Fields<'a> {
    item: &'a Map<String, Value>,
    properties: Option<&'a Map<String, Value>>,
}

impl<'a> Fields<'a> {
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.item
            .get(key)
            .filter(|v| !v.is_null())
            .or_else(|| self.properties.and_then(|p| p.get(key)))
    }

    fn text(&self, key: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(number_from_value)
    }
}

fn parse_feature(item: &Value) -> Option<FacilityRecord> {
    let item = item.as_object()?;
    let fields = Fields {
        item,
        properties: item.get("properties").and_then(|v| v.as_object()),
    };

    let position = fields
        .get("centroid")
        .and_then(parse_centroid)
        .or_else(|| item.get("geometry").and_then(parse_point_geometry))?;

    Some(FacilityRecord {
        position,
        name: fields.text("name"),
        address: fields.text("address"),
        ownership: fields.text("ownership"),
        value: fields.number("value"),
        readmission_rate: fields.number("readmission_rate"),
    })
}

fn parse_centroid(value: &Value) -> Option<LonLat> {
    match value {
        Value::Array(_) => parse_pair(value),
        Value::Object(obj) => obj
            .get("position")
            .or_else(|| obj.get("coordinates"))
            .and_then(parse_pair),
        _ => None,
    }
}

fn parse_point_geometry(value: &Value) -> Option<LonLat> {
    let obj = value.as_object()?;
    if obj.get("type").and_then(|v| v.as_str()) != Some("Point") {
        return None;
    }
    obj.get("coordinates").and_then(parse_pair)
}

fn parse_pair(value: &Value) -> Option<LonLat> {
    let arr = value.as_array()?;
    if arr.len() < 2 {
        return None;
    }
    let lon = number_from_value(&arr[0])?;
    let lat = number_from_value(&arr[1])?;
    LonLat::checked(lon, lat)
}

/// Numbers, or strings holding a number. Strings may parse to non-finite
/// values (`"NaN"`); those are kept so display code can blank them.
fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
