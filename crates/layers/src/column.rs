use formats::Dataset;
use foundation::color::{Rgb, Rgba};
use foundation::geo::LonLat;
use foundation::time::Millis;
use serde::{Deserialize, Serialize};

use crate::layer::{Layer, LayerId};
use crate::lighting::Material;
use crate::symbology::ValueEncoder;

/// Layer property the engine animates when it changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimatedProperty {
    #[serde(rename = "getElevation")]
    Elevation,
    #[serde(rename = "elevationScale")]
    ElevationScale,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyTransition {
    pub property: AnimatedProperty,
    #[serde(rename = "durationMs")]
    pub duration: Millis,
    /// Value newly added columns animate from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enter_from: Option<f64>,
}

impl PropertyTransition {
    /// Column heights grow from 0 over one second.
    pub const fn elevation_enter() -> Self {
        Self {
            property: AnimatedProperty::Elevation,
            duration: Millis(1000),
            enter_from: Some(0.0),
        }
    }

    pub const fn elevation_scale(duration: Millis) -> Self {
        Self {
            property: AnimatedProperty::ElevationScale,
            duration,
            enter_from: None,
        }
    }
}

/// Descriptor of an extruded column layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnLayer {
    pub id: LayerId,
    pub disk_resolution: u32,
    pub elevation_scale: f64,
    pub extruded: bool,
    /// Column radius in meters.
    pub radius: f64,
    pub line_color: Rgb,
    pub line_width: f64,
    pub pickable: bool,
    pub transitions: Vec<PropertyTransition>,
    /// `None` leaves the engine's default material.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,
}

impl Default for ColumnLayer {
    fn default() -> Self {
        Self {
            id: LayerId::new("column"),
            disk_resolution: 12,
            elevation_scale: 100.0,
            extruded: true,
            radius: 250.0,
            line_color: Rgb::BLACK,
            line_width: 20.0,
            pickable: true,
            transitions: Vec::new(),
            material: None,
        }
    }
}

impl Layer for ColumnLayer {
    fn id(&self) -> &LayerId {
        &self.id
    }

    fn pickable(&self) -> bool {
        self.pickable
    }
}

/// One rendered column; `index` refers back into the dataset.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub index: usize,
    pub position: LonLat,
    pub elevation: f64,
    pub fill_color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnLayerData {
    #[serde(flatten)]
    pub layer: ColumnLayer,
    pub columns: Vec<Column>,
}

impl ColumnLayer {
    pub fn with_transition(mut self, transition: PropertyTransition) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn build(&self, dataset: &Dataset, encoder: &ValueEncoder) -> ColumnLayerData {
        let columns = dataset
            .records()
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let encoded = encoder.encode(record);
                Column {
                    index,
                    position: record.position,
                    elevation: encoded.elevation,
                    fill_color: encoded.fill_color,
                }
            })
            .collect();

        ColumnLayerData {
            layer: self.clone(),
            columns,
        }
    }
}

impl ColumnLayerData {
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::{ColumnLayer, PropertyTransition};
    use crate::layer::Layer;
    use crate::symbology::palette::{COLOR_1, COLOR_5, OTHER};
    use crate::symbology::{ColorBuckets, ColorEncoding, ElevationEncoding, ValueEncoder};
    use formats::{Dataset, FacilityRecord};
    use foundation::color::Rgba;
    use foundation::geo::LonLat;

    fn encoder() -> ValueEncoder {
        ValueEncoder::new(
            ElevationEncoding::new(117.0, 0.3),
            ColorEncoding::Buckets(ColorBuckets::wait_times()),
        )
    }

    #[test]
    fn builds_one_column_per_record() {
        let dataset = Dataset::from_records(vec![
            FacilityRecord::at(LonLat::new(-73.9, 40.7)).with_value(230.0),
            FacilityRecord::at(LonLat::new(-73.8, 40.6)).with_value(150.0),
            FacilityRecord::at(LonLat::new(-73.7, 40.5)).with_value(50.0),
        ]);
        let data = ColumnLayer::default().build(&dataset, &encoder());

        let colors: Vec<_> = data.columns.iter().map(|c| c.fill_color).collect();
        assert_eq!(
            colors,
            vec![Rgba::from(COLOR_1), Rgba::from(COLOR_5), Rgba::from(OTHER)]
        );
        assert!((data.columns[0].elevation - 33.9).abs() < 1e-9);
        assert!((data.columns[2].elevation - -20.1).abs() < 1e-9);
        assert_eq!(data.column(1).map(|c| c.position), Some(LonLat::new(-73.8, 40.6)));
    }

    #[test]
    fn descriptor_defaults() {
        let layer = ColumnLayer::default();
        assert_eq!(layer.id().as_str(), "column");
        assert!(layer.pickable());
        assert_eq!(layer.disk_resolution, 12);
        assert_eq!(layer.radius, 250.0);
    }

    #[test]
    fn serializes_flat_with_transitions() {
        let layer = ColumnLayer::default().with_transition(PropertyTransition::elevation_enter());
        let data = layer.build(&Dataset::empty(), &encoder());
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["id"], "column");
        assert_eq!(json["elevationScale"], 100.0);
        assert_eq!(json["transitions"][0]["property"], "getElevation");
        assert_eq!(json["transitions"][0]["enterFrom"], 0.0);
        assert!(json["columns"].as_array().unwrap().is_empty());
        assert!(json.get("material").is_none());
    }
}
