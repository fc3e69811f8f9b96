use formats::FacilityRecord;
use foundation::precision::{canonical_f64, fixed, fixed_trimmed};
use serde::{Deserialize, Serialize};

/// Line labels of the facility tooltip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FacilityLabels {
    pub metric: String,
    /// Appended after the metric, including any leading space.
    pub metric_suffix: String,
    pub rate: String,
    pub rate_suffix: String,
}

impl Default for FacilityLabels {
    fn default() -> Self {
        Self {
            metric: "Median wait time".to_string(),
            metric_suffix: " minutes".to_string(),
            rate: "Readmission rate".to_string(),
            rate_suffix: "%".to_string(),
        }
    }
}

/// Hover text for a picked record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TooltipTemplate {
    /// Name, address, ownership, metric and rate.
    Facility(FacilityLabels),
    /// `height: <value * meters_per_unit>m`.
    Height {
        #[serde(rename = "metersPerUnit")]
        meters_per_unit: f64,
    },
    /// Latitude and longitude to six decimals.
    Position,
    /// No tooltip at all.
    Disabled,
}

impl Default for TooltipTemplate {
    fn default() -> Self {
        TooltipTemplate::Facility(FacilityLabels::default())
    }
}

impl TooltipTemplate {
    /// `None` when nothing is under the pointer. Numeric fields that are
    /// missing or non-finite render as empty text.
    pub fn render(&self, picked: Option<&FacilityRecord>) -> Option<String> {
        let record = picked?;
        match self {
            TooltipTemplate::Facility(labels) => Some(format!(
                "Name: {}\nAddress: {}\nOwnership type: {}\n{}: {}{}\n{}: {}{}",
                record.name,
                record.address,
                record.ownership,
                labels.metric,
                metric_text(record.value),
                labels.metric_suffix,
                labels.rate,
                metric_text(record.readmission_rate),
                labels.rate_suffix,
            )),
            TooltipTemplate::Height { meters_per_unit } => {
                let height = record
                    .value
                    .map(|v| canonical_f64(v * meters_per_unit))
                    .filter(|h| h.is_finite())
                    .map(|h| h.to_string())
                    .unwrap_or_default();
                Some(format!("height: {height}m"))
            }
            TooltipTemplate::Position => Some(format!(
                "latitude: {}\nlongitude: {}",
                fixed(record.position.lat_deg, 6).unwrap_or_default(),
                fixed(record.position.lon_deg, 6).unwrap_or_default(),
            )),
            TooltipTemplate::Disabled => None,
        }
    }
}

fn metric_text(value: Option<f64>) -> String {
    value.and_then(|v| fixed_trimmed(v, 3)).unwrap_or_default()
}
