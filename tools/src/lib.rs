use anyhow::Context;
use drifter_fuzzy::{Controller, ControllerConfig, Variant};
use drifter_simulator::SimulationConfig;
use serde::Serialize;
use std::path::Path;

/// Default `env_logger` filter for a binary: its own logs plus the library
/// crates' at info level.
pub fn log_filter(binary: &str) -> String {
    format!("{binary}=info,drifter_fuzzy=info,drifter_simulator=info")
}

/// Controller from a JSON file when given, otherwise from a built-in variant.
pub fn load_controller(variant: Variant, config: Option<&Path>) -> anyhow::Result<Controller> {
    let config = match config {
        Some(path) => {
            log::info!("Loading controller config {:?}", path);
            ControllerConfig::load(path)?
        }
        None => variant.config(),
    };
    Controller::new(config)
}

pub fn load_sim_config(path: Option<&Path>) -> anyhow::Result<SimulationConfig> {
    match path {
        Some(path) => {
            log::info!("Loading simulation config {:?}", path);
            SimulationConfig::load(path)
        }
        None => Ok(SimulationConfig::default()),
    }
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
    log::info!("Wrote {:?}", path);
    Ok(())
}
