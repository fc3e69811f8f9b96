use foundation::time::Millis;
use serde::{Deserialize, Serialize};

use crate::view_state::ViewState;

/// Identifies one camera transition so its completion signal can be matched.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionId(pub u64);

/// Interpolation strategy between two camera states.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Interpolator {
    /// Straight-line interpolation of longitude, latitude, zoom, pitch and bearing.
    #[default]
    Linear,
}

impl Interpolator {
    /// Camera at fraction `t` of the way from `from` to `to`.
    ///
    /// `t` is clamped to `[0, 1]`. The result carries `to`'s zoom limits and
    /// no transition metadata.
    pub fn interpolate(self, from: &ViewState, to: &ViewState, t: f64) -> ViewState {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Interpolator::Linear => ViewState {
                longitude: lerp(from.longitude, to.longitude, t),
                latitude: lerp(from.latitude, to.latitude, t),
                zoom: lerp(from.zoom, to.zoom, t),
                pitch: lerp(from.pitch, to.pitch, t),
                bearing: lerp(from.bearing, to.bearing, t),
                transition: None,
                ..*to
            },
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if t >= 1.0 {
        return b;
    }
    a + (b - a) * t
}

/// What should happen once a transition completes naturally.
///
/// Stored as data rather than a callback: the animator reacts to the
/// completion signal and decides the next state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionAction {
    #[default]
    None,
    /// Start the next auto-rotation step from the reached state.
    Rotate,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub id: TransitionId,
    #[serde(rename = "durationMs")]
    pub duration: Millis,
    #[serde(default)]
    pub interpolator: Interpolator,
    #[serde(default)]
    pub on_end: CompletionAction,
}
