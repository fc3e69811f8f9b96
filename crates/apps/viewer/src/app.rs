//! The map session.
//!
//! `Session` owns the single authoritative [`ViewState`] and everything
//! derived from the dataset. It only changes in response to [`AppEvent`]s
//! delivered by the event loop, so updates apply in delivery order with no
//! other writer.

use std::sync::Arc;

use camera::animator::CameraAnimator;
use camera::view_state::ViewState;
use formats::{Dataset, FacilityRecord};
use foundation::time::Millis;
use layers::{ColumnLayerData, ValueEncoder};
use runtime::{Context, EventLoop, Handler, Metrics, TimerId};
use tracing::{debug, info, warn};

use crate::config::{ConfigError, VisualizationConfig};
use crate::engine::{EngineSignal, RenderEngine};
use crate::scene::SceneDescription;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Engine(EngineSignal),
    DatasetLoaded(Arc<Dataset>),
    DatasetFailed(String),
    /// Fires when the idle period after the last interaction ends.
    IdleCheck,
}

pub struct Session {
    config: VisualizationConfig,
    encoder: ValueEncoder,
    view_state: ViewState,
    dataset: Arc<Dataset>,
    layer: ColumnLayerData,
    hovered: Option<usize>,
    tooltip: Option<String>,
    animator: Option<CameraAnimator>,
    idle_timer: Option<TimerId>,
    dirty: bool,
}

impl Session {
    pub fn new(config: VisualizationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let encoder = config.encoder();
        let dataset = Arc::new(Dataset::empty());
        let layer = config.column.build(&dataset, &encoder);
        Ok(Self {
            view_state: config.initial_view.settled(),
            animator: config.rotation.map(CameraAnimator::new),
            encoder,
            dataset,
            layer,
            hovered: None,
            tooltip: None,
            idle_timer: None,
            dirty: true,
            config,
        })
    }

    pub fn config(&self) -> &VisualizationConfig {
        &self.config
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn hovered(&self) -> Option<&FacilityRecord> {
        self.hovered.and_then(|i| self.dataset.get(i))
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    pub fn animator(&self) -> Option<&CameraAnimator> {
        self.animator.as_ref()
    }

    pub fn scene(&self) -> SceneDescription {
        SceneDescription {
            map_style: self.config.map_style.clone(),
            view_state: self.view_state,
            layers: vec![self.layer.clone()],
            lighting: self.config.lighting.clone(),
        }
    }

    /// True once after every change the engine has not seen yet.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn replace_view_state(&mut self, next: ViewState) {
        self.view_state = next;
        self.dirty = true;
    }

    fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.layer = self.config.column.build(&dataset, &self.encoder);
        self.dataset = dataset;
        self.hovered = None;
        self.tooltip = None;
        self.dirty = true;
    }

    fn pick(&mut self, index: Option<usize>) {
        self.hovered = index.filter(|i| *i < self.dataset.len());
        self.tooltip = self.config.tooltip.render(self.hovered());
    }

    fn arm_idle_timer(&mut self, cx: &mut Context<'_, AppEvent>) {
        if let Some(id) = self.idle_timer.take() {
            cx.cancel(id);
        }
        let Some(deadline) = self.animator.as_ref().and_then(CameraAnimator::resume_deadline) else {
            return;
        };
        let delay = deadline.since(cx.now());
        self.idle_timer = Some(cx.schedule_in(delay, AppEvent::IdleCheck));
    }

    fn on_engine(&mut self, signal: EngineSignal, cx: &mut Context<'_, AppEvent>) {
        match signal {
            EngineSignal::Loaded => {
                info!(name = %self.config.name, "map loaded");
                let current = self.view_state;
                if let Some(next) = self.animator.as_mut().and_then(|a| a.on_load(&current)) {
                    cx.metrics().inc("camera.rotation_steps");
                    self.replace_view_state(next);
                }
            }
            EngineSignal::TransitionEnded(id) => {
                let current = self.view_state;
                let next = self
                    .animator
                    .as_mut()
                    .and_then(|a| a.on_transition_end(id, &current));
                if let Some(next) = next {
                    cx.metrics().inc("camera.rotation_steps");
                    self.replace_view_state(next);
                }
            }
            EngineSignal::ViewStateChanged(next) => {
                cx.metrics().inc("camera.interactions");
                self.replace_view_state(next);
                if let Some(animator) = self.animator.as_mut() {
                    animator.on_interaction(cx.now());
                }
                self.arm_idle_timer(cx);
            }
            EngineSignal::Picked(index) => self.pick(index),
        }
    }
}

impl Handler<AppEvent> for Session {
    fn handle(&mut self, event: AppEvent, cx: &mut Context<'_, AppEvent>) {
        match event {
            AppEvent::Engine(signal) => self.on_engine(signal, cx),
            AppEvent::DatasetLoaded(dataset) => {
                debug!(records = dataset.len(), "dataset published");
                cx.metrics().set_gauge("dataset.records", dataset.len() as f64);
                self.set_dataset(dataset);
            }
            AppEvent::DatasetFailed(reason) => {
                cx.metrics().inc("dataset.failures");
                warn!(records = self.dataset.len(), "keeping previous dataset: {reason}");
            }
            AppEvent::IdleCheck => {
                self.idle_timer = None;
                let current = self.view_state;
                let now = cx.now();
                if let Some(next) = self.animator.as_mut().and_then(|a| a.on_idle(now, &current)) {
                    cx.metrics().inc("camera.rotation_steps");
                    self.replace_view_state(next);
                }
            }
        }
    }
}

/// A session wired to a rendering engine on one event loop.
pub struct Simulation<R> {
    events: EventLoop<AppEvent>,
    session: Session,
    engine: R,
}

impl<R: RenderEngine> Simulation<R> {
    pub fn new(session: Session, engine: R, tick: Millis) -> Self {
        Self {
            events: EventLoop::new(tick),
            session,
            engine,
        }
    }

    pub fn post(&mut self, event: AppEvent) {
        self.events.post(event);
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn engine(&self) -> &R {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut R {
        &mut self.engine
    }

    pub fn metrics(&self) -> &Metrics {
        self.events.metrics()
    }

    pub fn now(&self) -> Millis {
        self.events.now()
    }

    /// Delivers pending events without advancing time.
    pub fn settle(&mut self) {
        self.events.run_until_idle(&mut self.session);
        self.flush();
    }

    /// One tick: timers and events, then the engine frame and its signals.
    pub fn step(&mut self) {
        self.events.advance(&mut self.session);
        self.flush();
        for signal in self.engine.tick(self.events.now()) {
            self.events.post(AppEvent::Engine(signal));
        }
        self.settle();
    }

    pub fn run_until(&mut self, until: Millis) {
        self.settle();
        while self.events.now() < until {
            self.step();
        }
    }

    fn flush(&mut self) {
        if self.session.take_dirty() {
            self.engine.submit(&self.session.scene());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppEvent, Session, Simulation};
    use crate::config::{Preset, VisualizationConfig};
    use crate::engine::{EngineSignal, HeadlessEngine, ScriptedInput};
    use camera::animator::{AnimatorState, ResumePolicy, RotationConfig};
    use camera::interaction::Interaction;
    use formats::{Dataset, FacilityRecord};
    use foundation::geo::LonLat;
    use foundation::time::Millis;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn hospitals() -> Arc<Dataset> {
        Arc::new(Dataset::from_records(vec![
            FacilityRecord {
                name: "Bellevue".to_string(),
                address: "462 First Avenue".to_string(),
                ownership: "Government - Local".to_string(),
                readmission_rate: Some(14.5),
                ..FacilityRecord::at(LonLat::new(-73.975, 40.739)).with_value(230.0)
            },
            FacilityRecord::at(LonLat::new(-73.94, 40.79)).with_value(150.0),
        ]))
    }

    fn simulation(config: VisualizationConfig) -> Simulation<HeadlessEngine> {
        let session = Session::new(config).unwrap();
        Simulation::new(session, HeadlessEngine::new(), Millis(100))
    }

    #[test]
    fn rotation_chains_until_stopped() {
        let mut sim = simulation(VisualizationConfig::preset(Preset::RotatingHospitals));
        sim.run_until(Millis(3200));

        // Loaded at 100; steps complete at 1100, 2100 and 3100.
        let session = sim.session();
        assert_eq!(session.view_state().bearing, 2.0);
        assert_eq!(session.animator().map(|a| a.steps()), Some(4));
        assert_eq!(sim.metrics().counter("camera.rotation_steps"), 4);
        assert_eq!(session.view_state().latitude, 40.7368521);
        assert_eq!(session.view_state().pitch, 60.0);
    }

    #[test]
    fn interaction_stops_rotation_for_good() {
        let mut sim = simulation(VisualizationConfig::preset(Preset::RotatingHospitals));
        sim.engine_mut().script(
            Millis(1600),
            ScriptedInput::Gesture(Interaction::Pan {
                dlon_deg: 0.01,
                dlat_deg: 0.0,
            }),
        );
        sim.run_until(Millis(6000));

        let session = sim.session();
        let animator = session.animator().unwrap();
        assert_eq!(animator.steps(), 2);
        assert_eq!(
            animator.state(),
            AnimatorState::Interrupted { since: Millis(1600) }
        );
        assert!(session.view_state().transition.is_none());
        assert!((session.view_state().bearing - 0.75).abs() < 1e-9);
        assert!(!sim.engine().is_animating());
    }

    #[test]
    fn rotation_resumes_after_idle_when_enabled() {
        let config = VisualizationConfig {
            rotation: Some(RotationConfig {
                resume: ResumePolicy::AfterIdle {
                    idle_ms: Millis(2000),
                },
                ..RotationConfig::default()
            }),
            ..VisualizationConfig::preset(Preset::RotatingHospitals)
        };
        let mut sim = simulation(config);
        let orbit = ScriptedInput::Gesture(Interaction::Orbit {
            dbearing_deg: 10.0,
            dpitch_deg: 0.0,
        });
        sim.engine_mut().script(Millis(500), orbit);
        // A second gesture pushes the deadline out.
        sim.engine_mut().script(Millis(1500), orbit);
        sim.run_until(Millis(3400));
        assert_eq!(sim.session().animator().map(|a| a.steps()), Some(1));

        sim.run_until(Millis(3600));
        assert_eq!(sim.session().animator().map(|a| a.steps()), Some(2));
        assert!(sim.session().animator().unwrap().is_rotating());
    }

    #[test]
    fn static_preset_never_moves_the_camera() {
        let mut sim = simulation(VisualizationConfig::preset(Preset::Hexagons));
        sim.run_until(Millis(5000));
        assert_eq!(
            *sim.session().view_state(),
            VisualizationConfig::preset(Preset::Hexagons).initial_view
        );
        assert_eq!(sim.engine().frames(), 1);
    }

    #[test]
    fn hover_renders_tooltip_for_picked_record() {
        let mut sim = simulation(VisualizationConfig::preset(Preset::RotatingHospitals));
        sim.post(AppEvent::DatasetLoaded(hospitals()));
        sim.engine_mut().script(Millis(200), ScriptedInput::Hover(Some(0)));
        sim.run_until(Millis(200));

        let session = sim.session();
        assert_eq!(session.hovered().map(|r| r.name.as_str()), Some("Bellevue"));
        assert_eq!(
            session.tooltip(),
            Some(
                "Name: Bellevue\n\
                 Address: 462 First Avenue\n\
                 Ownership type: Government - Local\n\
                 Median wait time: 230 minutes\n\
                 Readmission rate: 14.5%"
            )
        );

        sim.post(AppEvent::Engine(EngineSignal::Picked(None)));
        sim.settle();
        assert_eq!(sim.session().tooltip(), None);
    }

    #[test]
    fn failed_reload_keeps_columns() {
        let mut sim = simulation(VisualizationConfig::preset(Preset::RotatingHospitals));
        sim.post(AppEvent::DatasetLoaded(hospitals()));
        sim.post(AppEvent::DatasetFailed("connection reset".to_string()));
        sim.settle();

        let scene = sim.session().scene();
        assert_eq!(scene.layers[0].columns.len(), 2);
        assert_eq!(sim.metrics().counter("dataset.failures"), 1);
        assert_eq!(sim.metrics().gauge("dataset.records"), Some(2.0));
    }

    #[test]
    fn out_of_range_pick_clears_hover() {
        let mut sim = simulation(VisualizationConfig::preset(Preset::RotatingHospitals));
        sim.post(AppEvent::DatasetLoaded(hospitals()));
        sim.post(AppEvent::Engine(EngineSignal::Picked(Some(1))));
        sim.settle();
        assert!(sim.session().tooltip().is_some());

        sim.post(AppEvent::Engine(EngineSignal::Picked(Some(9))));
        sim.settle();
        assert_eq!(sim.session().hovered(), None);
        assert_eq!(sim.session().tooltip(), None);
    }
}
