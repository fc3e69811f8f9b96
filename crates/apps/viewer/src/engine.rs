//! Boundary to the rendering engine.
//!
//! The application submits a [`SceneDescription`] whenever its state changes
//! and polls the engine once per tick for signals. [`HeadlessEngine`] plays
//! the engine's part without a GPU: it animates camera transitions, reports
//! when they complete and replays scripted user input.

use std::collections::VecDeque;

use camera::interaction::Interaction;
use camera::transition::{Interpolator, TransitionId};
use camera::view_state::ViewState;
use foundation::time::Millis;
use tracing::{debug, trace};

use crate::scene::SceneDescription;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineSignal {
    /// The rendering surface finished loading. Sent once.
    Loaded,
    /// The transition with this id ran to completion.
    TransitionEnded(TransitionId),
    /// The user moved the camera; carries the full replacement state.
    ViewStateChanged(ViewState),
    /// Record index under the pointer, `None` when over empty map.
    Picked(Option<usize>),
}

pub trait RenderEngine {
    fn submit(&mut self, scene: &SceneDescription);

    /// Advances the engine clock to `now` and returns what happened.
    fn tick(&mut self, now: Millis) -> Vec<EngineSignal>;
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ScriptedInput {
    Gesture(Interaction),
    Hover(Option<usize>),
}

#[derive(Debug, Clone, Copy)]
struct ActiveTransition {
    id: TransitionId,
    from: ViewState,
    to: ViewState,
    started: Millis,
    duration: Millis,
    interpolator: Interpolator,
}

/// In-process engine used by the CLI and tests.
#[derive(Debug)]
pub struct HeadlessEngine {
    load_at: Millis,
    loaded: bool,
    now: Millis,
    camera: Option<ViewState>,
    active: Option<ActiveTransition>,
    pickable: usize,
    script: VecDeque<(Millis, ScriptedInput)>,
    frames: u64,
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self {
            load_at: Millis::ZERO,
            loaded: false,
            now: Millis::ZERO,
            camera: None,
            active: None,
            pickable: 0,
            script: VecDeque::new(),
            frames: 0,
        }
    }

    /// Delays the `Loaded` signal until the engine clock reaches `at`.
    pub fn with_load_at(mut self, at: Millis) -> Self {
        self.load_at = at;
        self
    }

    /// Queues user input to replay at `at`. Inputs replay in time order;
    /// equal times keep insertion order.
    pub fn script(&mut self, at: Millis, input: ScriptedInput) {
        let pos = self.script.partition_point(|(t, _)| *t <= at);
        self.script.insert(pos, (at, input));
    }

    /// Camera currently on screen, mid-transition if one is running.
    pub fn camera(&self) -> Option<ViewState> {
        self.camera
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Scenes received so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn accept_view(&mut self, target: ViewState) {
        let Some(on_screen) = self.camera else {
            self.camera = Some(target.settled());
            if let Some(t) = target.transition {
                self.start(t.id, target, target, t.duration, t.interpolator);
            }
            return;
        };

        match target.transition {
            Some(t) if self.active.map(|a| a.id) == Some(t.id) => {}
            Some(t) => self.start(t.id, on_screen, target, t.duration, t.interpolator),
            None => {
                if let Some(a) = self.active.take() {
                    debug!(id = a.id.0, "transition superseded");
                }
                self.camera = Some(target);
            }
        }
    }

    fn start(
        &mut self,
        id: TransitionId,
        from: ViewState,
        to: ViewState,
        duration: Millis,
        interpolator: Interpolator,
    ) {
        if let Some(a) = self.active {
            debug!(id = a.id.0, "transition superseded");
        }
        trace!(id = id.0, duration = duration.0, "transition started");
        self.active = Some(ActiveTransition {
            id,
            from: from.settled(),
            to: to.settled(),
            started: self.now,
            duration,
            interpolator,
        });
    }

    fn replay(&mut self, input: ScriptedInput, out: &mut Vec<EngineSignal>) {
        match input {
            ScriptedInput::Gesture(gesture) => {
                let Some(on_screen) = self.camera else {
                    return;
                };
                if let Some(a) = self.active.take() {
                    debug!(id = a.id.0, "transition interrupted by gesture");
                }
                let next = gesture.apply(&on_screen);
                self.camera = Some(next);
                out.push(EngineSignal::ViewStateChanged(next));
            }
            ScriptedInput::Hover(index) => {
                out.push(EngineSignal::Picked(index.filter(|i| *i < self.pickable)));
            }
        }
    }
}

impl RenderEngine for HeadlessEngine {
    fn submit(&mut self, scene: &SceneDescription) {
        self.frames += 1;
        self.pickable = scene.pickable_count();
        self.accept_view(scene.view_state);
    }

    fn tick(&mut self, now: Millis) -> Vec<EngineSignal> {
        self.now = self.now.max(now);
        let mut out = Vec::new();

        if !self.loaded && self.now >= self.load_at {
            self.loaded = true;
            out.push(EngineSignal::Loaded);
        }

        if let Some(a) = self.active {
            let t = Millis::progress(self.now.since(a.started), a.duration);
            self.camera = Some(a.interpolator.interpolate(&a.from, &a.to, t));
            if t >= 1.0 {
                self.active = None;
                out.push(EngineSignal::TransitionEnded(a.id));
            }
        }

        while self.script.front().is_some_and(|(at, _)| *at <= self.now) {
            if let Some((_, input)) = self.script.pop_front() {
                self.replay(input, &mut out);
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::{EngineSignal, HeadlessEngine, RenderEngine, ScriptedInput};
    use crate::scene::SceneDescription;
    use camera::animator::rotate_with;
    use camera::animator::RotationConfig;
    use camera::interaction::Interaction;
    use camera::transition::TransitionId;
    use camera::view_state::ViewState;
    use foundation::time::Millis;

    fn scene(view_state: ViewState) -> SceneDescription {
        SceneDescription {
            map_style: String::new(),
            view_state,
            layers: Vec::new(),
            lighting: None,
        }
    }

    fn start() -> ViewState {
        ViewState::new(-73.99, 40.73, 11.0, 60.0, 0.0)
    }

    #[test]
    fn loads_once() {
        let mut engine = HeadlessEngine::new().with_load_at(Millis(50));
        assert!(engine.tick(Millis(10)).is_empty());
        assert_eq!(engine.tick(Millis(50)), vec![EngineSignal::Loaded]);
        assert!(engine.tick(Millis(60)).is_empty());
    }

    #[test]
    fn transition_runs_to_completion() {
        let mut engine = HeadlessEngine::new();
        engine.submit(&scene(start()));
        engine.tick(Millis(0));

        let step = rotate_with(&start(), &RotationConfig::default(), TransitionId(1));
        engine.submit(&scene(step));
        assert!(engine.tick(Millis(500)).is_empty());
        assert_eq!(engine.camera().map(|c| c.bearing), Some(0.25));

        // Resubmitting the same target does not restart it.
        engine.submit(&scene(step));
        assert_eq!(
            engine.tick(Millis(1000)),
            vec![EngineSignal::TransitionEnded(TransitionId(1))]
        );
        assert_eq!(engine.camera(), Some(step.settled()));
        assert!(!engine.is_animating());
    }

    #[test]
    fn gesture_interrupts_transition() {
        let mut engine = HeadlessEngine::new();
        engine.submit(&scene(start()));
        engine.tick(Millis(0));
        engine.submit(&scene(rotate_with(
            &start(),
            &RotationConfig::default(),
            TransitionId(1),
        )));
        engine.script(
            Millis(400),
            ScriptedInput::Gesture(Interaction::Zoom { delta: 1.0 }),
        );

        let signals = engine.tick(Millis(400));
        let [EngineSignal::ViewStateChanged(v)] = signals.as_slice() else {
            panic!("expected a view state change, got {signals:?}");
        };
        assert_eq!(v.zoom, 12.0);
        assert!(v.transition.is_none());
        assert!(!engine.is_animating());
        assert!(engine.tick(Millis(2000)).is_empty());
    }

    #[test]
    fn hover_outside_scene_picks_nothing() {
        let mut engine = HeadlessEngine::new();
        engine.submit(&scene(start()));
        engine.script(Millis(20), ScriptedInput::Hover(Some(3)));
        engine.script(Millis(10), ScriptedInput::Hover(None));
        engine.tick(Millis(0));
        assert_eq!(
            engine.tick(Millis(30)),
            vec![EngineSignal::Picked(None), EngineSignal::Picked(None)]
        );
    }
}
