//! Visualization configuration.
//!
//! A config starts from a built-in preset or a JSON file, then environment
//! variables override individual fields:
//! - `FACILITY_MAP_DATA_URL`: dataset location (URL or path)
//! - `FACILITY_MAP_STYLE`: basemap style URL
//! - `FACILITY_MAP_RESUME_IDLE_MS`: resume rotation after this much idle time
//!   (`0` disables resuming)

use std::env;
use std::path::{Path, PathBuf};

use camera::animator::{ResumePolicy, RotationConfig};
use camera::view_state::ViewState;
use formats::DataFormat;
use foundation::time::Millis;
use layers::{
    ColorBuckets, ColorEncoding, ColumnLayer, ElevationEncoding, LightingEffect,
    PropertyTransition, SymbologyError, TooltipTemplate, ValueEncoder,
};
use serde::{Deserialize, Serialize};

pub const NYC_HOSPITALS_URL: &str =
    "https://raw.githubusercontent.com/onefact/maps.payless.health/main/data/newyork_hospitals.json";
pub const HEXAGONS_URL: &str =
    "https://raw.githubusercontent.com/onefact/maps.payless.health/main/data/hexagons.json";
pub const HEATMAP_CSV_URL: &str =
    "https://raw.githubusercontent.com/visgl/deck.gl-data/master/examples/3d-heatmap/heatmap-data.csv";

pub const DARK_MATTER_STYLE: &str =
    "https://basemaps.cartocdn.com/gl/dark-matter-gl-style/style.json";
pub const DARK_MATTER_NOLABELS_STYLE: &str =
    "https://basemaps.cartocdn.com/gl/dark-matter-nolabels-gl-style/style.json";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Json(serde_json::Error),
    Symbology(SymbologyError),
    Invalid(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Json(err) => write!(f, "invalid config JSON: {err}"),
            ConfigError::Symbology(err) => write!(f, "invalid color encoding: {err}"),
            ConfigError::Invalid(what) => write!(f, "invalid config: {what}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Json(err) => Some(err),
            ConfigError::Symbology(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    /// NYC hospitals, wait-time colors, auto-rotating camera.
    RotatingHospitals,
    /// Aggregated hexagons over San Francisco, blue ramp, no tooltip.
    Hexagons,
}

/// Everything one map variant needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisualizationConfig {
    pub name: String,
    pub data_url: String,
    /// Inferred from `data_url` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_format: Option<DataFormat>,
    pub elevation: ElevationEncoding,
    pub color: ColorEncoding,
    pub tooltip: TooltipTemplate,
    pub initial_view: ViewState,
    pub map_style: String,
    pub column: ColumnLayer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lighting: Option<LightingEffect>,
    /// `None` keeps the camera still.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<RotationConfig>,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self::preset(Preset::RotatingHospitals)
    }
}

impl VisualizationConfig {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::RotatingHospitals => Self {
                name: "rotating-hospitals".to_string(),
                data_url: NYC_HOSPITALS_URL.to_string(),
                data_format: None,
                elevation: ElevationEncoding::new(117.0, 0.3),
                color: ColorEncoding::Buckets(ColorBuckets::wait_times()),
                tooltip: TooltipTemplate::default(),
                initial_view: ViewState::new(-73.9936065, 40.7368521, 11.0, 60.0, 0.0),
                map_style: DARK_MATTER_STYLE.to_string(),
                column: ColumnLayer::default()
                    .with_transition(PropertyTransition::elevation_enter()),
                lighting: Some(LightingEffect::default()),
                rotation: Some(RotationConfig::default()),
            },
            Preset::Hexagons => Self {
                name: "hexagons".to_string(),
                data_url: HEXAGONS_URL.to_string(),
                data_format: None,
                elevation: ElevationEncoding::new(0.0, 50.0),
                color: ColorEncoding::blue_ramp(),
                tooltip: TooltipTemplate::Disabled,
                initial_view: ViewState::new(-122.4, 37.74, 11.0, 30.0, 0.0).with_max_zoom(20.0),
                map_style: DARK_MATTER_NOLABELS_STYLE.to_string(),
                column: ColumnLayer::default()
                    .with_transition(PropertyTransition::elevation_scale(Millis(3000))),
                lighting: Some(LightingEffect::default()),
                rotation: None,
            },
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&text)
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides from `vars`; unparsable values are ignored.
    pub fn with_overrides(mut self, vars: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = vars("FACILITY_MAP_DATA_URL").filter(|v| !v.trim().is_empty()) {
            self.data_url = url;
        }
        if let Some(style) = vars("FACILITY_MAP_STYLE").filter(|v| !v.trim().is_empty()) {
            self.map_style = style;
        }
        let idle_ms = vars("FACILITY_MAP_RESUME_IDLE_MS").and_then(|v| v.trim().parse::<u64>().ok());
        if let (Some(idle_ms), Some(rotation)) = (idle_ms, self.rotation.as_mut()) {
            rotation.resume = match idle_ms {
                0 => ResumePolicy::Never,
                ms => ResumePolicy::AfterIdle {
                    idle_ms: Millis(ms),
                },
            };
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_url.trim().is_empty() {
            return Err(ConfigError::Invalid("dataUrl is empty"));
        }
        let v = &self.initial_view;
        let camera = [v.longitude, v.latitude, v.zoom, v.pitch, v.bearing];
        if camera.iter().any(|c| !c.is_finite()) {
            return Err(ConfigError::Invalid("initialView has non-finite fields"));
        }
        if let Some(rotation) = &self.rotation {
            if !rotation.step_deg.is_finite() {
                return Err(ConfigError::Invalid("rotation stepDeg is not finite"));
            }
        }
        self.color.validate().map_err(ConfigError::Symbology)
    }

    pub fn data_format(&self) -> DataFormat {
        self.data_format
            .unwrap_or_else(|| DataFormat::infer(&self.data_url))
    }

    pub fn encoder(&self) -> ValueEncoder {
        ValueEncoder::new(self.elevation, self.color.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, Preset, VisualizationConfig, HEATMAP_CSV_URL};
    use camera::animator::ResumePolicy;
    use formats::DataFormat;
    use foundation::time::Millis;
    use layers::{ColorEncoding, TooltipTemplate};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn rotating_preset_matches_the_hospital_map() {
        let c = VisualizationConfig::preset(Preset::RotatingHospitals);
        assert_eq!(c.initial_view.latitude, 40.7368521);
        assert_eq!(c.initial_view.pitch, 60.0);
        assert_eq!(c.data_format(), DataFormat::Json);
        assert!(c.rotation.is_some());
        assert_eq!(c.encoder().elevation(230.0), (230.0 - 117.0) * 0.3);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn hexagons_preset_is_static_and_silent() {
        let c = VisualizationConfig::preset(Preset::Hexagons);
        assert_eq!(c.rotation, None);
        assert_eq!(c.tooltip, TooltipTemplate::Disabled);
        assert_eq!(c.initial_view.max_zoom, Some(20.0));
        assert_eq!(c.color, ColorEncoding::blue_ramp());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c = VisualizationConfig::from_json(
            r#"{"name": "heatmap", "dataUrl": "https://example.org/heatmap-data.csv", "rotation": null}"#,
        )
        .unwrap();
        assert_eq!(c.name, "heatmap");
        assert_eq!(c.data_format(), DataFormat::Csv);
        assert_eq!(c.rotation, None);
        assert_eq!(c.column, VisualizationConfig::default().column);
    }

    #[test]
    fn explicit_format_wins_over_extension() {
        let c = VisualizationConfig {
            data_url: HEATMAP_CSV_URL.to_string(),
            data_format: Some(DataFormat::Json),
            ..VisualizationConfig::default()
        };
        assert_eq!(c.data_format(), DataFormat::Json);
    }

    #[test]
    fn overrides_replace_fields() {
        let c = VisualizationConfig::default().with_overrides(|key| match key {
            "FACILITY_MAP_DATA_URL" => Some("data/local.json".to_string()),
            "FACILITY_MAP_RESUME_IDLE_MS" => Some("4000".to_string()),
            _ => None,
        });
        assert_eq!(c.data_url, "data/local.json");
        assert_eq!(
            c.rotation.map(|r| r.resume),
            Some(ResumePolicy::AfterIdle {
                idle_ms: Millis(4000)
            })
        );

        let unchanged = VisualizationConfig::default().with_overrides(|key| match key {
            "FACILITY_MAP_RESUME_IDLE_MS" => Some("soon".to_string()),
            "FACILITY_MAP_STYLE" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(unchanged, VisualizationConfig::default());
    }

    #[test]
    fn rejects_bad_configs() {
        let empty = VisualizationConfig {
            data_url: String::new(),
            ..VisualizationConfig::default()
        };
        assert!(matches!(empty.validate(), Err(ConfigError::Invalid(_))));

        let ramp = VisualizationConfig::from_json(
            r#"{"color": {"kind": "channel-ramp", "base": [0, 0, 0, 255], "channel": 7, "scale": 1.0}}"#,
        )
        .unwrap();
        assert!(matches!(ramp.validate(), Err(ConfigError::Symbology(_))));

        assert!(matches!(
            VisualizationConfig::from_json("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[tokio::test]
    async fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "from-file", "mapStyle": "style.json"}}"#).unwrap();
        let c = VisualizationConfig::load(file.path()).await.unwrap();
        assert_eq!(c.name, "from-file");
        assert_eq!(c.map_style, "style.json");

        let missing = VisualizationConfig::load(std::path::Path::new("/nonexistent/config.json")).await;
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
