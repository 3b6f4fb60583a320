use crate::inference::{DegeneratePolicy, Engine, Inference, InferenceError};
use crate::rule::RuleBase;
use crate::table::{self, Variant};
use crate::variable::{Role, Variable};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Discrete steering command.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum Turn {
    Left,
    Hold,
    Right,
}

impl Turn {
    /// Rounds a crisp turn output to the nearest command, ties to even.
    pub fn from_crisp(value: f64) -> Turn {
        let rounded = value.round_ties_even();
        if rounded <= -1.0 {
            Turn::Left
        } else if rounded >= 1.0 {
            Turn::Right
        } else {
            Turn::Hold
        }
    }

    pub fn sign(self) -> i32 {
        match self {
            Turn::Left => -1,
            Turn::Hold => 0,
            Turn::Right => 1,
        }
    }

    pub fn mirrored(self) -> Turn {
        match self {
            Turn::Left => Turn::Right,
            Turn::Hold => Turn::Hold,
            Turn::Right => Turn::Left,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Turn::Left => "left",
            Turn::Hold => "hold",
            Turn::Right => "right",
        }
    }
}

impl From<Turn> for i32 {
    fn from(turn: Turn) -> i32 {
        turn.sign()
    }
}

/// Crisp sensor readings for one tick.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Sample {
    /// Signed angle to the target in degrees, positive to the right.
    pub curve: f64,
    pub wall_distance: f64,
    #[serde(default)]
    pub target_distance: Option<f64>,
}

impl Sample {
    pub fn new(curve: f64, wall_distance: f64) -> Sample {
        Sample {
            curve,
            wall_distance,
            target_distance: None,
        }
    }

    pub fn with_target_distance(self, target_distance: f64) -> Sample {
        Sample {
            target_distance: Some(target_distance),
            ..self
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            table::CURVE => Some(self.curve),
            table::WALL_DISTANCE => Some(self.wall_distance),
            table::TARGET_DISTANCE => self.target_distance,
            _ => None,
        }
    }

    pub fn inputs(&self) -> BTreeMap<String, f64> {
        let mut inputs = BTreeMap::new();
        inputs.insert(table::CURVE.to_string(), self.curve);
        inputs.insert(table::WALL_DISTANCE.to_string(), self.wall_distance);
        if let Some(target_distance) = self.target_distance {
            inputs.insert(table::TARGET_DISTANCE.to_string(), target_distance);
        }
        inputs
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Command {
    pub turn: Turn,
    pub speed_delta: f64,
}

/// Full transient state of one `evaluate` call.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Evaluation {
    pub sample: Sample,
    pub turn: Inference,
    pub speed: Inference,
    pub command: Command,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ControllerConfig {
    pub inputs: Vec<Variable>,
    pub turn: Variable,
    pub speed: Variable,
    pub turn_rules: RuleBase,
    pub speed_rules: RuleBase,
    #[serde(default)]
    pub degenerate: DegeneratePolicy,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        table::canonical()
    }
}

impl ControllerConfig {
    pub fn from_json(json: &str) -> anyhow::Result<ControllerConfig> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<ControllerConfig> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read controller config {:?}", path))?;
        ControllerConfig::from_json(&json)
            .with_context(|| format!("Failed to parse controller config {:?}", path))
    }

    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_policy(self, degenerate: DegeneratePolicy) -> ControllerConfig {
        ControllerConfig { degenerate, ..self }
    }

    fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.inputs
            .iter()
            .chain(std::iter::once(&self.turn))
            .chain(std::iter::once(&self.speed))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for (i, variable) in self.variables().enumerate() {
            variable.validate()?;
            if self.variables().take(i).any(|v| v.name == variable.name) {
                anyhow::bail!("Duplicate variable {:?}", variable.name);
            }
        }
        for input in self.inputs.iter() {
            if input.role != Role::Antecedent {
                anyhow::bail!("Input {:?} is not an antecedent", input.name);
            }
            if Sample::new(0.0, 0.0)
                .with_target_distance(0.0)
                .get(&input.name)
                .is_none()
            {
                anyhow::bail!("Input {:?} has no sensor reading", input.name);
            }
        }
        Ok(())
    }
}

/// Two independent inference engines behind a single `compute` call.
pub struct Controller {
    config: ControllerConfig,
    turn: Engine,
    speed: Engine,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> anyhow::Result<Controller> {
        config.validate()?;
        let turn = Engine::new(
            &config.inputs,
            &config.turn,
            &config.turn_rules,
            config.degenerate,
        )
        .context("Invalid turn rules")?;
        let speed = Engine::new(
            &config.inputs,
            &config.speed,
            &config.speed_rules,
            config.degenerate,
        )
        .context("Invalid speed rules")?;
        log::info!(
            "Controller ready: {} turn rules, {} speed rules, {:?} on zero firing",
            config.turn_rules.len(),
            config.speed_rules.len(),
            config.degenerate
        );
        Ok(Controller {
            config,
            turn,
            speed,
        })
    }

    pub fn from_variant(variant: Variant) -> anyhow::Result<Controller> {
        Controller::new(variant.config())
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn turn_engine(&self) -> &Engine {
        &self.turn
    }

    pub fn speed_engine(&self) -> &Engine {
        &self.speed
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.config.variables().find(|v| v.name == name)
    }

    pub fn needs_target_distance(&self) -> bool {
        self.turn
            .inputs()
            .iter()
            .chain(self.speed.inputs().iter())
            .any(|v| v.name == table::TARGET_DISTANCE)
    }

    pub fn compute(&self, curve: f64, wall_distance: f64) -> Result<Command, InferenceError> {
        self.compute_sample(&Sample::new(curve, wall_distance))
    }

    pub fn compute_sample(&self, sample: &Sample) -> Result<Command, InferenceError> {
        Ok(self.evaluate(sample)?.command)
    }

    pub fn evaluate(&self, sample: &Sample) -> Result<Evaluation, InferenceError> {
        let inputs = sample.inputs();
        let turn = self.turn.infer(&inputs)?;
        let speed = self.speed.infer(&inputs)?;
        let command = Command {
            turn: Turn::from_crisp(turn.crisp),
            speed_delta: speed.crisp,
        };
        log::trace!("{:?} -> {:?}", sample, command);
        Ok(Evaluation {
            sample: *sample,
            turn,
            speed,
            command,
        })
    }
}
