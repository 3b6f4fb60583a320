use crate::arena::Arena;
use crate::config::SimulationConfig;
use crate::debug::{self, Line};
use crate::player::Player;
use crate::rng::{new_rng, SeededRng};
use crate::snapshot::{PlayerSnapshot, Snapshot, TargetSnapshot};
use crate::target::{Target, TargetMode};
use drifter_fuzzy::Turn;
use nalgebra::Point2;

pub struct Simulation {
    config: SimulationConfig,
    arena: Arena,
    player: Player,
    target: Target,
    tick: u32,
    seed: u32,
    paused: bool,
    captures: u32,
    distance_travelled: f64,
    rng: SeededRng,
}

impl Simulation {
    pub fn new(config: SimulationConfig, seed: u32) -> Simulation {
        log::info!("seed {seed}");
        let mut rng = new_rng(seed);
        let arena = Arena::new(config.arena_width, config.arena_height);
        let player = Player::new(config.player, arena.center());
        let target = Target::new(config.target, &arena, &mut rng);
        Simulation {
            config,
            arena,
            player,
            target,
            tick: 0,
            seed,
            paused: false,
            captures: 0,
            distance_travelled: 0.0,
            rng,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn time(&self) -> f64 {
        self.tick as f64 * self.config.tick_length
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn captures(&self) -> u32 {
        self.captures
    }

    pub fn distance_travelled(&self) -> f64 {
        self.distance_travelled
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        if paused != self.paused {
            log::info!("{} at t={:.2}", if paused { "Paused" } else { "Resumed" }, self.time());
        }
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.paused);
    }

    pub fn step(&mut self) {
        if self.paused {
            return;
        }
        let start = self.player.position;
        self.player.update(&self.arena);
        self.distance_travelled += nalgebra::distance(&start, &self.player.position);

        self.tick += 1;
        let time = self.time();
        if self
            .target
            .update(&self.player.bounds(), time, &mut self.rng)
        {
            self.captures += 1;
            log::info!(
                "Target captured at t={:.2} ({} total), next at ({:.0}, {:.0})",
                time,
                self.captures,
                self.target.position.x,
                self.target.position.y
            );
        }
    }

    /// Distance from the car to the arena edge straight ahead.
    pub fn wall_distance(&self) -> f64 {
        self.arena
            .cast_ray(self.player.position, self.player.heading)
            .1
    }

    pub fn angle_to_target(&self) -> f64 {
        self.player.angle_to(self.target.position)
    }

    pub fn target_distance(&self) -> f64 {
        self.player.distance_to(self.target.position)
    }

    pub fn rotate(&mut self, turn: Turn) {
        if self.paused {
            return;
        }
        self.player.rotate(turn);
    }

    pub fn apply_speed_change(&mut self, delta: f64) {
        if self.paused {
            return;
        }
        self.player.change_speed_by(delta);
    }

    pub fn cycle_target_mode(&mut self) {
        self.target.cycle_mode();
    }

    pub fn set_target_mode(&mut self, mode: TargetMode) {
        self.target.mode = mode;
    }

    /// Moves the target without changing its mode.
    pub fn place_target(&mut self, position: Point2<f64>) {
        self.target.set_position(position);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.arena.resize(width, height);
        self.player.position = self.arena.clamp(self.player.position);
        self.target.resize(&self.arena);
    }

    pub fn debug_lines(&self) -> Vec<Line> {
        let (hit, _) = self
            .arena
            .cast_ray(self.player.position, self.player.heading);
        let mut lines = vec![
            debug::segment(self.player.position, hit, debug::RAY_COLOR),
            debug::segment(
                self.player.position,
                self.target.position,
                debug::TARGET_COLOR,
            ),
        ];
        lines.extend(debug::outline(&self.player.bounds(), debug::BOUNDS_COLOR));
        lines.extend(debug::outline(&self.target.bounds(), debug::BOUNDS_COLOR));
        lines.extend(debug::outline(&self.target.area(), debug::AREA_COLOR));
        lines
    }

    pub fn hash(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::Hasher;
        let fixedpoint = |v: f64| (v * 1e9) as i64;
        let mut s = DefaultHasher::new();
        s.write_u32(self.tick);
        s.write_i64(fixedpoint(self.player.position.x));
        s.write_i64(fixedpoint(self.player.position.y));
        s.write_i64(fixedpoint(self.player.heading));
        s.write_i64(fixedpoint(self.player.speed));
        s.write_i64(fixedpoint(self.player.drift_factor()));
        s.write_i64(fixedpoint(self.target.position.x));
        s.write_i64(fixedpoint(self.target.position.y));
        s.write_u32(self.captures);
        s.finish()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            time: self.time(),
            seed: self.seed,
            paused: self.paused,
            arena: self.arena,
            player: PlayerSnapshot {
                position: self.player.position,
                heading: self.player.heading,
                visual_heading: self.player.visual_heading(),
                speed: self.player.speed,
                drift_factor: self.player.drift_factor(),
                braked_hard: self.player.braked_hard(),
            },
            target: TargetSnapshot {
                position: self.target.position,
                velocity: self.target.velocity,
                mode: self.target.mode,
            },
            captures: self.captures,
            distance_travelled: self.distance_travelled,
            debug_lines: self.debug_lines(),
        }
    }
}
