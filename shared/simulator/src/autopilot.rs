use crate::simulation::Simulation;
use drifter_fuzzy::diagnostics::{DiagnosticSink, MembershipSnapshot, NullSink};
use drifter_fuzzy::{Command, Controller, Sample, Turn};

/// Command applied when the controller cannot produce one.
pub const HOLD: Command = Command {
    turn: Turn::Hold,
    speed_delta: 0.0,
};

/// Drives the player of a [`Simulation`] with a fuzzy [`Controller`].
pub struct Autopilot {
    controller: Controller,
    sink: Box<dyn DiagnosticSink>,
    report_requested: bool,
    report_every: Option<u32>,
    ticks: u32,
    errors: u32,
}

impl Autopilot {
    pub fn new(controller: Controller, sink: Box<dyn DiagnosticSink>) -> Autopilot {
        Autopilot {
            controller,
            sink,
            report_requested: false,
            report_every: None,
            ticks: 0,
            errors: 0,
        }
    }

    pub fn without_diagnostics(controller: Controller) -> Autopilot {
        Autopilot::new(controller, Box::new(NullSink))
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Number of ticks where inference failed and the car held course.
    pub fn errors(&self) -> u32 {
        self.errors
    }

    /// Emits to the sink on the next tick.
    pub fn request_report(&mut self) {
        self.report_requested = true;
    }

    /// Emits to the sink every `n` ticks, or never for 0.
    pub fn report_every(&mut self, n: u32) {
        self.report_every = if n == 0 { None } else { Some(n) };
    }

    pub fn sense(&self, sim: &Simulation) -> Sample {
        Sample::new(sim.angle_to_target(), sim.wall_distance())
            .with_target_distance(sim.target_distance())
    }

    /// Reads the sensors, applies the controller's command and steps the
    /// simulation once. Returns the applied command.
    pub fn tick(&mut self, sim: &mut Simulation) -> Command {
        let sample = self.sense(sim);
        let report = self.take_report();

        let command = match self.controller.evaluate(&sample) {
            Ok(evaluation) => {
                if report {
                    let snapshot = MembershipSnapshot::capture(&self.controller, &evaluation);
                    if let Err(e) = self.sink.emit(&sample, &evaluation.command, &snapshot) {
                        log::warn!("Failed to emit diagnostics: {:#}", e);
                    }
                }
                evaluation.command
            }
            Err(e) => {
                self.errors += 1;
                log::warn!("Holding course at t={:.2}: {}", sim.time(), e);
                HOLD
            }
        };
        log::trace!("t={:.2} {:?} -> {:?}", sim.time(), sample, command);

        sim.rotate(command.turn);
        sim.apply_speed_change(command.speed_delta);
        sim.step();
        self.ticks += 1;
        command
    }

    fn take_report(&mut self) -> bool {
        let periodic = match self.report_every {
            Some(n) => self.ticks % n == 0,
            None => false,
        };
        std::mem::take(&mut self.report_requested) || periodic
    }
}
