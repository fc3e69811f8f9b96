use std::path::PathBuf;
use std::sync::Arc;

use camera::interaction::Interaction;
use clap::{Parser, Subcommand};
use foundation::time::Millis;
use serde_json::json;
use tracing::{info, warn};
use viewer::app::{AppEvent, Session, Simulation};
use viewer::config::{Preset, VisualizationConfig};
use viewer::engine::{HeadlessEngine, ScriptedInput};
use viewer::fetch::{source_for, DatasetLoader};
use viewer::telemetry;

#[derive(Parser, Debug)]
#[command(author, version, about = "Extruded facility map: scene export and headless camera runs")]
struct Args {
    /// Built-in visualization to start from
    #[arg(long, value_enum, default_value_t = Preset::RotatingHospitals, global = true)]
    preset: Preset,

    /// JSON config file; replaces the preset
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the scene description handed to the rendering engine
    Scene {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run the session against the headless engine and report the camera
    Simulate {
        #[arg(long, default_value_t = 10_000)]
        duration_ms: u64,

        #[arg(long, default_value_t = 16)]
        tick_ms: u64,

        /// Times (ms) at which a user orbits the camera, comma separated
        #[arg(long, value_delimiter = ',')]
        interact_at: Vec<u64>,
    },

    /// Print the hover text of the first records
    Tooltips {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => VisualizationConfig::load(path).await?,
        None => VisualizationConfig::preset(args.preset),
    }
    .with_env_overrides();
    config.validate()?;
    info!(name = %config.name, data = %config.data_url, "starting");

    let mut loader = DatasetLoader::new(source_for(&config.data_url), config.data_format());
    let loaded = loader.load().await;

    let session = Session::new(config)?;
    let mut sim = Simulation::new(session, HeadlessEngine::new(), Millis(16));
    match loaded {
        Ok(dataset) => sim.post(AppEvent::DatasetLoaded(dataset)),
        Err(err) => sim.post(AppEvent::DatasetFailed(err.to_string())),
    }
    sim.settle();

    match args.command {
        Command::Scene { out } => {
            let text = sim.session().scene().to_json_pretty()?;
            match out {
                Some(path) => {
                    tokio::fs::write(&path, text).await?;
                    info!(path = %path.display(), "scene written");
                }
                None => println!("{text}"),
            }
        }
        Command::Simulate {
            duration_ms,
            tick_ms,
            interact_at,
        } => {
            let session = Session::new(sim.session().config().clone())?;
            let mut engine = HeadlessEngine::new();
            for at in interact_at {
                engine.script(
                    Millis(at),
                    ScriptedInput::Gesture(Interaction::Orbit {
                        dbearing_deg: 15.0,
                        dpitch_deg: 0.0,
                    }),
                );
            }
            let mut run = Simulation::new(session, engine, Millis(tick_ms.max(1)));
            run.post(AppEvent::DatasetLoaded(Arc::clone(sim.session().dataset())));
            run.run_until(Millis(duration_ms));

            let counters: serde_json::Map<String, serde_json::Value> = run
                .metrics()
                .snapshot()
                .counters
                .into_iter()
                .map(|(k, v)| (k.to_string(), json!(v)))
                .collect();
            let summary = json!({
                "name": run.session().config().name,
                "elapsedMs": run.now(),
                "rotating": run.session().animator().is_some_and(|a| a.is_rotating()),
                "viewState": run.session().view_state(),
                "counters": counters,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Tooltips { limit } => {
            let session = sim.session();
            let template = &session.config().tooltip;
            let records = session.dataset().records();
            if records.is_empty() {
                warn!("dataset is empty; nothing to show");
            }
            for record in records.iter().take(limit) {
                if let Some(text) = template.render(Some(record)) {
                    println!("{text}\n");
                }
            }
        }
    }

    Ok(())
}
