use serde::{Deserialize, Serialize};

use crate::transition::Transition;

/// Camera state of the map view.
///
/// Exactly one `ViewState` is authoritative at a time. Updates replace the
/// whole value; struct-update syntax (`..*prev`) is the only way fields carry
/// over from a previous state.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    /// Tilt from vertical, degrees.
    pub pitch: f64,
    /// Rotation around the vertical axis, degrees. Not normalized: it keeps
    /// accumulating across full turns.
    pub bearing: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_zoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
}

impl ViewState {
    pub const fn new(longitude: f64, latitude: f64, zoom: f64, pitch: f64, bearing: f64) -> Self {
        Self {
            longitude,
            latitude,
            zoom,
            pitch,
            bearing,
            min_zoom: None,
            max_zoom: None,
            transition: None,
        }
    }

    pub fn with_max_zoom(mut self, max_zoom: f64) -> Self {
        self.max_zoom = Some(max_zoom);
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = Some(transition);
        self
    }

    /// The same camera with transition metadata cleared.
    pub fn settled(mut self) -> Self {
        self.transition = None;
        self
    }

    /// Compares camera fields only, ignoring transition metadata.
    pub fn same_camera(&self, other: &ViewState) -> bool {
        self.settled() == other.settled()
    }
}
