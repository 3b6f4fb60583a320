//! Declarative membership sets and rule tables for the autopilot.
//!
//! Each [`Variant`] is an alternate table over the same variables. The
//! canonical table crosses the six curve sets with the three wall distance
//! sets for both outputs.

use crate::controller::ControllerConfig;
use crate::inference::DegeneratePolicy;
use crate::membership::Shape;
use crate::rule::{Clause, Rule, RuleBase};
use crate::variable::{FuzzySet, Role, Universe, Variable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const CURVE: &str = "curve";
pub const WALL_DISTANCE: &str = "wall_distance";
pub const TARGET_DISTANCE: &str = "target_distance";
pub const TURN: &str = "turn";
pub const SPEED_DELTA: &str = "speed_delta";

/// Upper bound of the distance universes, in world units.
pub const DEFAULT_DISTANCE_MAX: f64 = 1440.0;

const CURVE_LABELS: [&str; 6] = [
    "far_left",
    "mid_left",
    "near_left",
    "near_right",
    "mid_right",
    "far_right",
];
const WALL_LABELS: [&str; 3] = ["near", "medium", "far"];
const TARGET_LABELS: [&str; 2] = ["near", "far"];

// Rows follow CURVE_LABELS, columns follow WALL_LABELS: (turn, speed_delta).
const CANONICAL: [[(&str, &str); 3]; 6] = [
    [
        ("left", "brake_hard"),
        ("left", "brake_medium"),
        ("left", "brake_medium"),
    ],
    [
        ("left", "brake_medium"),
        ("left", "brake_light"),
        ("left", "hold"),
    ],
    [
        ("left", "brake_light"),
        ("left", "accelerate"),
        ("hold", "accelerate"),
    ],
    [
        ("right", "brake_light"),
        ("right", "accelerate"),
        ("hold", "accelerate"),
    ],
    [
        ("right", "brake_medium"),
        ("right", "brake_light"),
        ("right", "hold"),
    ],
    [
        ("right", "brake_hard"),
        ("right", "brake_medium"),
        ("right", "brake_medium"),
    ],
];

const ANGLE_ONLY_TURN: [(&str, &str); 6] = [
    ("far_left", "left"),
    ("mid_left", "left"),
    ("near_left", "hold"),
    ("near_right", "hold"),
    ("mid_right", "right"),
    ("far_right", "right"),
];

// Curve class (both sides) x wall distance x target distance (near, far).
const TARGET_AWARE_SPEED: [([&str; 2], [[&str; 2]; 3]); 3] = [
    (
        ["far_left", "far_right"],
        [
            ["brake_hard", "brake_hard"],
            ["brake_hard", "brake_medium"],
            ["brake_light", "hold"],
        ],
    ),
    (
        ["mid_left", "mid_right"],
        [
            ["brake_hard", "brake_hard"],
            ["brake_light", "brake_medium"],
            ["brake_light", "hold"],
        ],
    ),
    (
        ["near_left", "near_right"],
        [
            ["brake_hard", "brake_hard"],
            ["brake_light", "accelerate"],
            ["brake_light", "accelerate"],
        ],
    ),
];

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Curve x wall distance for both outputs.
    Canonical,
    /// Steering from the curve alone, canonical speed table.
    AngleOnlyTurn,
    /// Canonical steering, braking also weighs the distance to the target.
    TargetAware,
}

impl Variant {
    pub fn all() -> [Variant; 3] {
        [Variant::Canonical, Variant::AngleOnlyTurn, Variant::TargetAware]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Variant::Canonical => "canonical",
            Variant::AngleOnlyTurn => "angle_only_turn",
            Variant::TargetAware => "target_aware",
        }
    }

    pub fn config(&self) -> ControllerConfig {
        match self {
            Variant::Canonical => canonical(),
            Variant::AngleOnlyTurn => ControllerConfig {
                turn_rules: angle_only_turn_rules(),
                ..canonical()
            },
            Variant::TargetAware => {
                let mut config = canonical();
                config.inputs.push(target_distance(DEFAULT_DISTANCE_MAX));
                config.speed_rules = target_aware_speed_rules();
                config
            }
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Variant::all().into_iter().find(|v| v.name() == s) {
            Some(variant) => Ok(variant),
            None => anyhow::bail!("Unknown variant {:?}", s),
        }
    }
}

pub fn canonical() -> ControllerConfig {
    ControllerConfig {
        inputs: vec![curve(), wall_distance(DEFAULT_DISTANCE_MAX)],
        turn: turn(),
        speed: speed_delta(),
        turn_rules: canonical_rules(TURN, |cell| cell.0),
        speed_rules: canonical_rules(SPEED_DELTA, |cell| cell.1),
        degenerate: DegeneratePolicy::default(),
    }
}

pub fn curve() -> Variable {
    variable(
        CURVE,
        Role::Antecedent,
        Universe::new(-180.0, 180.0, 1.0),
        &[
            ("far_left", Shape::trapezoid(-180.0, -180.0, -120.0, -45.0)),
            ("mid_left", Shape::triangle(-120.0, -45.0, -15.0)),
            ("near_left", Shape::triangle(-45.0, -15.0, 0.0)),
            ("near_right", Shape::triangle(0.0, 15.0, 45.0)),
            ("mid_right", Shape::triangle(15.0, 45.0, 120.0)),
            ("far_right", Shape::trapezoid(45.0, 120.0, 180.0, 180.0)),
        ],
    )
}

pub fn wall_distance(max: f64) -> Variable {
    variable(
        WALL_DISTANCE,
        Role::Antecedent,
        Universe::new(0.0, max, 1.0),
        &[
            ("near", Shape::trapezoid(0.0, 0.0, 75.0, 100.0)),
            ("medium", Shape::triangle(75.0, 100.0, 150.0)),
            ("far", Shape::open_right(100.0, 150.0)),
        ],
    )
}

pub fn target_distance(max: f64) -> Variable {
    variable(
        TARGET_DISTANCE,
        Role::Antecedent,
        Universe::new(0.0, max, 1.0),
        &[
            ("near", Shape::trapezoid(0.0, 0.0, 10.0, 30.0)),
            ("far", Shape::open_right(20.0, 50.0)),
        ],
    )
}

pub fn turn() -> Variable {
    variable(
        TURN,
        Role::Consequent,
        Universe::new(-1.0, 1.0, 0.5),
        &[
            ("left", Shape::triangle(-1.0, -1.0, 0.0)),
            ("hold", Shape::triangle(-0.5, 0.0, 0.5)),
            ("right", Shape::triangle(0.0, 1.0, 1.0)),
        ],
    )
}

pub fn speed_delta() -> Variable {
    variable(
        SPEED_DELTA,
        Role::Consequent,
        Universe::new(-2.5, 0.3, 0.01),
        &[
            ("brake_hard", Shape::trapezoid(-2.5, -2.5, -2.0, -1.5)),
            ("brake_medium", Shape::triangle(-2.0, -1.0, 0.0)),
            ("brake_light", Shape::triangle(-0.5, 0.0, 0.1)),
            ("hold", Shape::triangle(0.0, 0.1, 0.2)),
            ("accelerate", Shape::trapezoid(0.1, 0.2, 0.3, 0.3)),
        ],
    )
}

fn variable(name: &str, role: Role, universe: Universe, sets: &[(&str, Shape)]) -> Variable {
    Variable {
        name: name.to_string(),
        role,
        universe,
        sets: sets
            .iter()
            .map(|&(label, shape)| FuzzySet {
                label: label.to_string(),
                shape,
            })
            .collect(),
    }
}

fn canonical_rules(
    output: &str,
    pick: fn((&'static str, &'static str)) -> &'static str,
) -> RuleBase {
    let mut rules = vec![];
    for (curve, row) in CURVE_LABELS.iter().zip(CANONICAL.iter()) {
        for (wall, &cell) in WALL_LABELS.iter().zip(row.iter()) {
            rules.push(Rule::new(
                vec![Clause::new(CURVE, curve), Clause::new(WALL_DISTANCE, wall)],
                pick(cell),
            ));
        }
    }
    RuleBase::new(output, rules)
}

fn angle_only_turn_rules() -> RuleBase {
    RuleBase::new(
        TURN,
        ANGLE_ONLY_TURN
            .iter()
            .map(|&(curve, then)| Rule::new(vec![Clause::new(CURVE, curve)], then))
            .collect(),
    )
}

fn target_aware_speed_rules() -> RuleBase {
    let mut rules = vec![];
    for (sides, grid) in TARGET_AWARE_SPEED.iter() {
        for curve in sides.iter() {
            for (wall, row) in WALL_LABELS.iter().zip(grid.iter()) {
                for (target, &then) in TARGET_LABELS.iter().zip(row.iter()) {
                    rules.push(Rule::new(
                        vec![
                            Clause::new(CURVE, curve),
                            Clause::new(WALL_DISTANCE, wall),
                            Clause::new(TARGET_DISTANCE, target),
                        ],
                        then,
                    ));
                }
            }
        }
    }
    RuleBase::new(SPEED_DELTA, rules)
}
