use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const TICK_LENGTH: f64 = 1.0 / 60.0;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub min_speed: f64,
    pub max_speed: f64,
    pub width: f64,
    pub height: f64,
    pub drift: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            min_speed: 5.0,
            max_speed: 20.0,
            width: 49.0,
            height: 25.0,
            drift: true,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct TargetConfig {
    pub width: f64,
    pub height: f64,
    /// Distance kept from every arena edge.
    pub margin: f64,
    pub initial_speed: f64,
    pub max_speed: f64,
    /// Bounds in seconds of the interval between direction changes.
    pub change_interval: (f64, f64),
}

impl Default for TargetConfig {
    fn default() -> Self {
        TargetConfig {
            width: 20.0,
            height: 20.0,
            margin: 100.0,
            initial_speed: 10.0,
            max_speed: 7.0,
            change_interval: (0.3, 1.0),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub arena_width: f64,
    pub arena_height: f64,
    pub tick_length: f64,
    pub player: PlayerConfig,
    pub target: TargetConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            arena_width: 1000.0,
            arena_height: 600.0,
            tick_length: TICK_LENGTH,
            player: Default::default(),
            target: Default::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json(json: &str) -> anyhow::Result<SimulationConfig> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<SimulationConfig> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read simulation config {:?}", path))?;
        SimulationConfig::from_json(&json)
            .with_context(|| format!("Failed to parse simulation config {:?}", path))
    }

    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("tick_length", self.tick_length),
            ("player.min_speed", self.player.min_speed),
            ("player.width", self.player.width),
            ("player.height", self.player.height),
            ("target.width", self.target.width),
            ("target.height", self.target.height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                anyhow::bail!("{} must be positive, got {}", name, value);
            }
        }
        if self.player.max_speed.is_nan() || self.player.max_speed < self.player.min_speed {
            anyhow::bail!(
                "player.max_speed {} is below player.min_speed {}",
                self.player.max_speed,
                self.player.min_speed
            );
        }
        let (lo, hi) = self.target.change_interval;
        if lo.is_nan() || hi.is_nan() || lo <= 0.0 || hi < lo {
            anyhow::bail!("Invalid target.change_interval {:?}", (lo, hi));
        }
        if self.target.margin.is_nan()
            || self.target.max_speed.is_nan()
            || self.target.margin < 0.0
            || self.target.max_speed < 0.0
        {
            anyhow::bail!("Target margin and speed must not be negative");
        }
        Ok(())
    }
}
