//! Continuous camera auto-rotation.
//!
//! Rotation is a chain of short linear transitions. Each step's
//! [`Transition`] carries `on_end: Rotate`; when the rendering engine reports
//! that the transition completed, [`CameraAnimator::on_transition_end`]
//! computes the next step from the reached state. A transition that gets
//! superseded (user drag, zoom, orbit) never completes, so the chain stops.
//!
//! Whether the chain re-arms after the user goes idle is a [`ResumePolicy`].

use foundation::time::Millis;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::transition::{CompletionAction, Interpolator, Transition, TransitionId};
use crate::view_state::ViewState;

/// Bearing increment per rotation step, degrees.
pub const ROTATION_STEP_DEG: f64 = 0.5;

/// Duration of one rotation step.
pub const ROTATION_STEP_DURATION: Millis = Millis(1000);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum ResumePolicy {
    /// Rotate until touched.
    #[default]
    Never,
    /// Re-arm rotation once no interaction has happened for `idle_ms`.
    AfterIdle {
        #[serde(rename = "idleMs")]
        idle_ms: Millis,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RotationConfig {
    pub step_deg: f64,
    #[serde(rename = "durationMs")]
    pub duration: Millis,
    pub resume: ResumePolicy,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            step_deg: ROTATION_STEP_DEG,
            duration: ROTATION_STEP_DURATION,
            resume: ResumePolicy::Never,
        }
    }
}

/// One rotation step with the default step and duration.
///
/// Every field except `bearing` and the transition metadata is copied from
/// `current`. Bearing is not wrapped.
pub fn rotate(current: &ViewState) -> ViewState {
    rotate_with(current, &RotationConfig::default(), TransitionId(0))
}

pub fn rotate_with(current: &ViewState, config: &RotationConfig, id: TransitionId) -> ViewState {
    ViewState {
        bearing: current.bearing + config.step_deg,
        transition: Some(Transition {
            id,
            duration: config.duration,
            interpolator: Interpolator::Linear,
            on_end: CompletionAction::Rotate,
        }),
        ..*current
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AnimatorState {
    /// Waiting for the rendering surface to finish loading.
    WaitingForLoad,
    /// A rotation step is in flight.
    Rotating { pending: TransitionId },
    /// The user took over at `since`.
    Interrupted { since: Millis },
}

/// Drives the rotation chain from engine signals.
///
/// Every method returns the next authoritative `ViewState` when a new step
/// starts, and `None` when nothing should change.
#[derive(Debug, Clone)]
pub struct CameraAnimator {
    config: RotationConfig,
    state: AnimatorState,
    next_id: u64,
    steps: u64,
}

impl CameraAnimator {
    pub fn new(config: RotationConfig) -> Self {
        Self {
            config,
            state: AnimatorState::WaitingForLoad,
            next_id: 1,
            steps: 0,
        }
    }

    pub fn config(&self) -> &RotationConfig {
        &self.config
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn is_rotating(&self) -> bool {
        matches!(self.state, AnimatorState::Rotating { .. })
    }

    /// Rotation steps started so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// The rendering surface has loaded; starts the first step.
    ///
    /// Only the first load counts. A user interaction before load does not
    /// prevent the first rotation.
    pub fn on_load(&mut self, current: &ViewState) -> Option<ViewState> {
        match self.state {
            AnimatorState::WaitingForLoad => Some(self.start(current)),
            _ => None,
        }
    }

    /// A transition completed naturally.
    ///
    /// Completions for anything but the pending rotation step are ignored:
    /// they belong to a superseded state.
    pub fn on_transition_end(&mut self, id: TransitionId, current: &ViewState) -> Option<ViewState> {
        let AnimatorState::Rotating { pending } = self.state else {
            return None;
        };
        let chained = current
            .transition
            .is_some_and(|t| t.id == id && t.on_end == CompletionAction::Rotate);
        if pending != id || !chained {
            debug!(id = id.0, pending = pending.0, "ignoring stale transition end");
            return None;
        }
        Some(self.start(&current.settled()))
    }

    /// An external view-state change replaced the authoritative state.
    pub fn on_interaction(&mut self, now: Millis) {
        match self.state {
            AnimatorState::WaitingForLoad => {}
            AnimatorState::Rotating { pending } => {
                debug!(pending = pending.0, "rotation interrupted by interaction");
                self.state = AnimatorState::Interrupted { since: now };
            }
            AnimatorState::Interrupted { .. } => {
                self.state = AnimatorState::Interrupted { since: now };
            }
        }
    }

    /// When rotation may resume, if the policy allows it at all.
    pub fn resume_deadline(&self) -> Option<Millis> {
        match (self.state, self.config.resume) {
            (AnimatorState::Interrupted { since }, ResumePolicy::AfterIdle { idle_ms }) => {
                Some(since + idle_ms)
            }
            _ => None,
        }
    }

    /// Idle check; restarts rotation once the resume deadline has passed.
    pub fn on_idle(&mut self, now: Millis, current: &ViewState) -> Option<ViewState> {
        let deadline = self.resume_deadline()?;
        if now < deadline {
            return None;
        }
        debug!(now = now.0, "resuming rotation after idle");
        Some(self.start(&current.settled()))
    }

    fn start(&mut self, current: &ViewState) -> ViewState {
        let id = TransitionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.steps += 1;
        self.state = AnimatorState::Rotating { pending: id };
        rotate_with(current, &self.config, id)
    }
}
