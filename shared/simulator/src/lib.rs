pub mod arena;
pub mod autopilot;
pub mod collision;
pub mod config;
pub mod debug;
pub mod player;
pub mod rng;
pub mod simulation;
pub mod snapshot;
pub mod target;

pub use autopilot::Autopilot;
pub use config::SimulationConfig;
pub use simulation::Simulation;
