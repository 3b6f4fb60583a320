use crate::arena::Arena;
use crate::collision::Rect;
use crate::config::PlayerConfig;
use drifter_fuzzy::Turn;
use nalgebra::{vector, Point2};

/// Speed delta below which a speed change counts as a hard brake.
pub const HARD_BRAKE: f64 = -0.7;
/// Drift stops above this speed.
pub const DRIFT_MAX_SPEED: f64 = 7.5;
/// Rotations sharper than this start a drift after a hard brake.
const DRIFT_START_ROTATION: f64 = 3.0;
/// Rotations gentler than this end a drift.
const DRIFT_END_ROTATION: f64 = 4.75;
const DRIFT_GAIN: f64 = 10.0;
/// Per tick change of the drift factor, in degrees.
const DRIFT_RATE: f64 = 2.0;

/// The car. Headings are degrees in `[0, 360)`, clockwise from +x on screen.
#[derive(Clone, Debug)]
pub struct Player {
    pub config: PlayerConfig,
    pub position: Point2<f64>,
    pub heading: f64,
    pub speed: f64,
    pub drift_enabled: bool,
    braked_hard: bool,
    drift_direction: Option<Turn>,
    drift_factor: f64,
    target_drift_factor: f64,
}

impl Player {
    pub fn new(config: PlayerConfig, position: Point2<f64>) -> Player {
        Player {
            config,
            position,
            heading: 0.0,
            speed: 0.0,
            drift_enabled: config.drift,
            braked_hard: false,
            drift_direction: None,
            drift_factor: 0.0,
            target_drift_factor: 0.0,
        }
    }

    /// Degrees turned by one rotation at the current speed. Slower cars turn
    /// sharper.
    pub fn rotation_amount(&self) -> f64 {
        let c = &self.config;
        5.0 * (1.0 - (self.speed - c.min_speed) / c.max_speed).powi(2)
    }

    pub fn rotate(&mut self, turn: Turn) {
        if turn == Turn::Hold {
            return;
        }
        let amount = self.rotation_amount() * turn.sign() as f64;

        if self.drift_enabled {
            if self.braked_hard && amount.abs() > DRIFT_START_ROTATION {
                self.target_drift_factor = amount * DRIFT_GAIN;
                self.drift_direction = Some(turn);
            } else if amount.abs() < DRIFT_END_ROTATION {
                self.target_drift_factor = 0.0;
            }
            if self.drift_direction != Some(turn) {
                self.target_drift_factor = 0.0;
            }
        } else {
            self.target_drift_factor = 0.0;
        }

        self.heading = (self.heading + amount).rem_euclid(360.0);
    }

    pub fn change_speed_by(&mut self, delta: f64) {
        self.braked_hard = delta < HARD_BRAKE;
        self.speed = (self.speed + delta).clamp(self.config.min_speed, self.config.max_speed);
    }

    /// Moves one tick along the heading, keeps the car inside the arena and
    /// eases the drift factor towards its target.
    pub fn update(&mut self, arena: &Arena) {
        let (sin, cos) = self.heading.to_radians().sin_cos();
        self.position = arena.clamp(self.position + vector![cos, sin] * self.speed);

        if self.speed > DRIFT_MAX_SPEED {
            self.target_drift_factor = 0.0;
        }
        if self.target_drift_factor < self.drift_factor {
            self.drift_factor -= DRIFT_RATE;
        } else if self.target_drift_factor > self.drift_factor {
            self.drift_factor += DRIFT_RATE;
        }
    }

    pub fn toggle_drift(&mut self) {
        self.drift_enabled = !self.drift_enabled;
        log::info!(
            "Drift {}",
            if self.drift_enabled { "enabled" } else { "disabled" }
        );
    }

    pub fn braked_hard(&self) -> bool {
        self.braked_hard
    }

    pub fn drift_factor(&self) -> f64 {
        self.drift_factor
    }

    pub fn is_drifting(&self) -> bool {
        self.drift_factor != 0.0
    }

    /// Heading the body is drawn at, including the drift offset.
    pub fn visual_heading(&self) -> f64 {
        (self.heading + self.drift_factor).rem_euclid(360.0)
    }

    /// Signed angle from the heading to `point` in `(-180, 180]`, positive
    /// when the point is to the right.
    pub fn angle_to(&self, point: Point2<f64>) -> f64 {
        let d = point - self.position;
        let bearing = d.y.atan2(d.x).to_degrees().rem_euclid(360.0);
        let difference = (bearing - self.heading + 360.0).rem_euclid(360.0);
        if difference > 180.0 {
            difference - 360.0
        } else {
            difference
        }
    }

    pub fn distance_to(&self, point: Point2<f64>) -> f64 {
        nalgebra::distance(&self.position, &point)
    }

    pub fn bounds(&self) -> Rect {
        Rect::rotated(
            self.position,
            self.config.width,
            self.config.height,
            self.visual_heading(),
        )
    }
}
