use camera::view_state::ViewState;
use layers::{ColumnLayerData, LightingEffect};
use serde::Serialize;

/// Everything the rendering engine draws for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDescription {
    pub map_style: String,
    pub view_state: ViewState,
    pub layers: Vec<ColumnLayerData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lighting: Option<LightingEffect>,
}

impl SceneDescription {
    /// Number of pickable objects across all pickable layers.
    pub fn pickable_count(&self) -> usize {
        self.layers
            .iter()
            .filter(|l| l.layer.pickable)
            .map(|l| l.columns.len())
            .sum()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::SceneDescription;
    use camera::view_state::ViewState;
    use formats::{Dataset, FacilityRecord};
    use foundation::geo::LonLat;
    use layers::{ColorEncoding, ColumnLayer, ElevationEncoding, LightingEffect, ValueEncoder};

    #[test]
    fn serializes_engine_facing_shape() {
        let dataset = Dataset::from_records(vec![
            FacilityRecord::at(LonLat::new(-122.4, 37.7)).with_value(0.5),
        ]);
        let encoder = ValueEncoder::new(ElevationEncoding::new(0.0, 50.0), ColorEncoding::blue_ramp());
        let scene = SceneDescription {
            map_style: "style.json".to_string(),
            view_state: ViewState::new(-122.4, 37.74, 11.0, 30.0, 0.0),
            layers: vec![ColumnLayer::default().build(&dataset, &encoder)],
            lighting: Some(LightingEffect::default()),
        };
        assert_eq!(scene.pickable_count(), 1);

        let json: serde_json::Value =
            serde_json::from_str(&scene.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["mapStyle"], "style.json");
        assert_eq!(json["viewState"]["pitch"], 30.0);
        assert_eq!(json["layers"][0]["columns"][0]["elevation"], 25.0);
        assert_eq!(
            json["layers"][0]["columns"][0]["fillColor"],
            serde_json::json!([48, 128, 128, 255])
        );
        assert!(json["viewState"].get("transition").is_none());
    }
}
