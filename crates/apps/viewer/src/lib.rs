//! Extruded facility map: configuration, dataset loading, camera session and
//! the boundary to the rendering engine.

pub mod app;
pub mod config;
pub mod engine;
pub mod fetch;
pub mod scene;
pub mod telemetry;
