use crate::arena::Arena;
use crate::collision::Rect;
use crate::config::TargetConfig;
use nalgebra::{point, vector, Point2, Vector2};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    /// Sits still and respawns elsewhere when the player reaches it.
    Static,
    /// Wanders inside the margin box.
    Moving,
    /// Stays wherever it was last placed.
    Pinned,
}

impl TargetMode {
    pub fn next(self) -> TargetMode {
        match self {
            TargetMode::Static => TargetMode::Moving,
            TargetMode::Moving => TargetMode::Pinned,
            TargetMode::Pinned => TargetMode::Static,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TargetMode::Static => "static",
            TargetMode::Moving => "moving",
            TargetMode::Pinned => "pinned",
        }
    }
}

impl std::str::FromStr for TargetMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(TargetMode::Static),
            "moving" => Ok(TargetMode::Moving),
            "pinned" => Ok(TargetMode::Pinned),
            _ => anyhow::bail!("Unknown target mode {:?}", s),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Target {
    pub config: TargetConfig,
    pub mode: TargetMode,
    pub position: Point2<f64>,
    pub velocity: Vector2<f64>,
    area: Rect,
    next_change: f64,
}

impl Target {
    pub fn new<R: Rng>(config: TargetConfig, arena: &Arena, rng: &mut R) -> Target {
        let s = config.initial_speed;
        let velocity = vector![rng.gen_range(-s..=s), rng.gen_range(-s..=s)];
        let mut target = Target {
            config,
            mode: TargetMode::Static,
            position: arena.center(),
            velocity,
            area: movement_area(&config, arena),
            next_change: 0.0,
        };
        target.respawn(rng);
        target
    }

    /// Box the target center is kept in.
    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.position, self.config.width, self.config.height)
    }

    pub fn cycle_mode(&mut self) {
        self.mode = self.mode.next();
        log::info!("Target mode {}", self.mode.name());
    }

    pub fn set_position(&mut self, position: Point2<f64>) {
        self.position = position;
    }

    pub fn respawn<R: Rng>(&mut self, rng: &mut R) {
        self.position = point![
            rng.gen_range(self.area.min.x..=self.area.max.x),
            rng.gen_range(self.area.min.y..=self.area.max.y)
        ];
    }

    pub fn resize(&mut self, arena: &Arena) {
        self.area = movement_area(&self.config, arena);
        if self.mode != TargetMode::Pinned {
            self.position = self.area.clamp(self.position);
        }
    }

    /// Advances one tick. Returns true when a static target was reached by
    /// `player` and respawned.
    pub fn update<R: Rng>(&mut self, player: &Rect, time: f64, rng: &mut R) -> bool {
        match self.mode {
            TargetMode::Static => {
                if player.intersects(&self.bounds()) {
                    self.respawn(rng);
                    return true;
                }
            }
            TargetMode::Moving => self.wander(time, rng),
            TargetMode::Pinned => {}
        }
        false
    }

    fn wander<R: Rng>(&mut self, time: f64, rng: &mut R) {
        self.position += self.velocity;

        if time >= self.next_change {
            let s = self.config.max_speed;
            self.velocity = vector![rng.gen_range(-s..=s), rng.gen_range(-s..=s)];
            let (lo, hi) = self.config.change_interval;
            self.next_change = time + rng.gen_range(lo..=hi);
        }

        let area = self.area;
        if self.position.x < area.min.x {
            self.velocity.x = self.velocity.x.abs();
        } else if self.position.x > area.max.x {
            self.velocity.x = -self.velocity.x.abs();
        }
        if self.position.y < area.min.y {
            self.velocity.y = self.velocity.y.abs();
        } else if self.position.y > area.max.y {
            self.velocity.y = -self.velocity.y.abs();
        }
        self.position = area.clamp(self.position);
    }
}

/// Arena shrunk by the margin and by half the target size. Never empty: an
/// arena too small for the margin collapses the box to its center line.
fn movement_area(config: &TargetConfig, arena: &Arena) -> Rect {
    let axis = |size: f64, extent: f64| {
        let lo = config.margin + extent / 2.0;
        let hi = size - config.margin - extent / 2.0;
        if hi >= lo {
            (lo, hi)
        } else {
            (size / 2.0, size / 2.0)
        }
    };
    let (x0, x1) = axis(arena.width, config.width);
    let (y0, y1) = axis(arena.height, config.height);
    Rect::new(point![x0, y0], point![x1, y1])
}
