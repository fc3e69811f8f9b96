use serde::{Deserialize, Serialize};

use crate::view_state::ViewState;

/// Steepest tilt the map controller allows, degrees.
pub const MAX_PITCH_DEG: f64 = 60.0;
pub const DEFAULT_MIN_ZOOM: f64 = 0.0;
pub const DEFAULT_MAX_ZOOM: f64 = 20.0;
/// Web Mercator latitude limit.
pub const MAX_LATITUDE_DEG: f64 = 85.051_129;

/// A user gesture on the map.
///
/// Applying one produces a full replacement `ViewState` with no transition,
/// the same shape the rendering engine reports for drags and scrolls.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Interaction {
    Pan { dlon_deg: f64, dlat_deg: f64 },
    Zoom { delta: f64 },
    Orbit { dbearing_deg: f64, dpitch_deg: f64 },
}

impl Interaction {
    pub fn apply(&self, v: &ViewState) -> ViewState {
        let mut next = v.settled();
        match *self {
            Interaction::Pan { dlon_deg, dlat_deg } => {
                next.longitude = wrap_longitude(v.longitude + dlon_deg);
                next.latitude = (v.latitude + dlat_deg).clamp(-MAX_LATITUDE_DEG, MAX_LATITUDE_DEG);
            }
            Interaction::Zoom { delta } => {
                let min = v.min_zoom.unwrap_or(DEFAULT_MIN_ZOOM);
                let max = v.max_zoom.unwrap_or(DEFAULT_MAX_ZOOM).max(min);
                next.zoom = (v.zoom + delta).clamp(min, max);
            }
            Interaction::Orbit {
                dbearing_deg,
                dpitch_deg,
            } => {
                next.bearing = v.bearing + dbearing_deg;
                next.pitch = (v.pitch + dpitch_deg).clamp(0.0, MAX_PITCH_DEG);
            }
        }
        next
    }
}

fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        return lon;
    }
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 { 180.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::{Interaction, MAX_PITCH_DEG};
    use crate::animator::rotate;
    use crate::view_state::ViewState;

    fn base() -> ViewState {
        ViewState::new(-73.99, 40.73, 11.0, 60.0, 0.0)
    }

    #[test]
    fn interactions_clear_transitions() {
        let rotating = rotate(&base());
        let next = Interaction::Pan {
            dlon_deg: 0.01,
            dlat_deg: 0.0,
        }
        .apply(&rotating);
        assert!(next.transition.is_none());
        assert_eq!(next.bearing, rotating.bearing);
    }

    #[test]
    fn zoom_is_clamped_to_limits() {
        let v = base().with_max_zoom(12.0);
        assert_eq!(Interaction::Zoom { delta: 5.0 }.apply(&v).zoom, 12.0);
        assert_eq!(Interaction::Zoom { delta: -50.0 }.apply(&v).zoom, 0.0);
    }

    #[test]
    fn pitch_is_clamped_bearing_is_not() {
        let next = Interaction::Orbit {
            dbearing_deg: 400.0,
            dpitch_deg: 15.0,
        }
        .apply(&base());
        assert_eq!(next.pitch, MAX_PITCH_DEG);
        assert_eq!(next.bearing, 400.0);
    }

    #[test]
    fn pan_wraps_longitude_and_clamps_latitude() {
        let v = ViewState::new(179.0, 85.0, 3.0, 0.0, 0.0);
        let next = Interaction::Pan {
            dlon_deg: 2.0,
            dlat_deg: 1.0,
        }
        .apply(&v);
        assert!((next.longitude - -179.0).abs() < 1e-9);
        assert_eq!(next.latitude, super::MAX_LATITUDE_DEG);
    }
}
