use crate::arena::Arena;
use crate::debug::Line;
use crate::target::TargetMode;
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub tick: u32,
    pub time: f64,
    pub seed: u32,
    pub paused: bool,
    pub arena: Arena,
    pub player: PlayerSnapshot,
    pub target: TargetSnapshot,
    pub captures: u32,
    pub distance_travelled: f64,
    pub debug_lines: Vec<Line>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlayerSnapshot {
    pub position: Point2<f64>,
    pub heading: f64,
    pub visual_heading: f64,
    pub speed: f64,
    pub drift_factor: f64,
    pub braked_hard: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TargetSnapshot {
    pub position: Point2<f64>,
    pub velocity: Vector2<f64>,
    pub mode: TargetMode,
}
