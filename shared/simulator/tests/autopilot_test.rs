use drifter_fuzzy::diagnostics::{DiagnosticSink, MembershipSnapshot};
use drifter_fuzzy::{
    Command, Controller, ControllerConfig, DegeneratePolicy, Sample, Turn, Variant,
};
use drifter_simulator::autopilot::{Autopilot, HOLD};
use drifter_simulator::simulation::Simulation;
use drifter_simulator::target::TargetMode;
use drifter_simulator::SimulationConfig;
use nalgebra::point;
use std::cell::RefCell;
use std::rc::Rc;
use test_log::test;

fn autopilot() -> Autopilot {
    Autopilot::without_diagnostics(Controller::new(ControllerConfig::default()).unwrap())
}

fn run(seed: u32, mode: TargetMode, ticks: u32) -> Simulation {
    let mut sim = Simulation::new(SimulationConfig::default(), seed);
    sim.set_target_mode(mode);
    let mut autopilot = autopilot();
    for _ in 0..ticks {
        autopilot.tick(&mut sim);
    }
    sim
}

#[derive(Default)]
struct Counter {
    samples: Rc<RefCell<Vec<Sample>>>,
}

impl DiagnosticSink for Counter {
    fn emit(
        &mut self,
        sample: &Sample,
        _command: &Command,
        _snapshot: &MembershipSnapshot,
    ) -> anyhow::Result<()> {
        self.samples.borrow_mut().push(*sample);
        Ok(())
    }
}

struct Failing;

impl DiagnosticSink for Failing {
    fn emit(&mut self, _: &Sample, _: &Command, _: &MembershipSnapshot) -> anyhow::Result<()> {
        anyhow::bail!("disk full")
    }
}

#[test]
fn test_deterministic() {
    for mode in [TargetMode::Static, TargetMode::Moving] {
        let a = run(7, mode, 1000);
        let b = run(7, mode, 1000);
        assert_eq!(a.hash(), b.hash());
        assert_eq!(a.snapshot(), b.snapshot());
    }
    assert_ne!(
        run(7, TargetMode::Moving, 300).hash(),
        run(8, TargetMode::Moving, 300).hash()
    );
}

#[test]
fn test_capture_dead_ahead() {
    let mut sim = Simulation::new(SimulationConfig::default(), 0);
    sim.place_target(point![800.0, 300.0]);
    assert_eq!(sim.angle_to_target(), 0.0);

    let mut autopilot = autopilot();
    let command = autopilot.tick(&mut sim);
    assert_eq!(command.turn, Turn::Hold);
    assert!(command.speed_delta > 0.0);

    while sim.captures() == 0 && sim.tick() < 100 {
        let command = autopilot.tick(&mut sim);
        assert_eq!(command.turn, Turn::Hold);
    }
    assert_eq!(sim.captures(), 1);
    assert_eq!(autopilot.errors(), 0);
}

#[test]
fn test_capture_from_any_side() {
    let placements = [
        point![500.0, 150.0],
        point![500.0, 450.0],
        point![200.0, 300.0],
        point![700.0, 450.0],
        point![300.0, 150.0],
        point![150.0, 500.0],
        point![850.0, 120.0],
    ];
    for p in placements {
        let mut sim = Simulation::new(SimulationConfig::default(), 1);
        sim.place_target(p);
        let mut autopilot = autopilot();
        while sim.captures() == 0 && sim.tick() < 300 {
            autopilot.tick(&mut sim);
        }
        assert_eq!(sim.captures(), 1, "target at {:?}", p);
    }
}

#[test]
fn test_stays_in_arena() {
    for (seed, mode) in [(1, TargetMode::Static), (2, TargetMode::Moving)] {
        let mut sim = Simulation::new(SimulationConfig::default(), seed);
        sim.set_target_mode(mode);
        let mut autopilot = autopilot();
        for _ in 0..3000 {
            autopilot.tick(&mut sim);
            let p = sim.player().position;
            assert!(p.x >= 0.0 && p.x <= 1000.0 && p.y >= 0.0 && p.y <= 600.0);
            assert!(sim.player().speed >= 5.0 && sim.player().speed <= 20.0);
        }
        assert_eq!(autopilot.errors(), 0);
        assert!(sim.distance_travelled() > 3000.0 * 5.0 * 0.5);
    }
}

#[test]
fn test_target_aware_variant() {
    let mut sim = Simulation::new(SimulationConfig::default(), 3);
    let mut autopilot =
        Autopilot::without_diagnostics(Controller::from_variant(Variant::TargetAware).unwrap());
    for _ in 0..500 {
        autopilot.tick(&mut sim);
    }
    assert_eq!(autopilot.errors(), 0);
}

#[test]
fn test_inference_error_holds_course() {
    let config = ControllerConfig::default().with_policy(DegeneratePolicy::Reject);
    let mut autopilot = Autopilot::without_diagnostics(Controller::new(config).unwrap());
    let mut sim = Simulation::new(SimulationConfig::default(), 0);
    sim.place_target(point![800.0, 300.0]);

    let command = autopilot.tick(&mut sim);
    assert_eq!(command, HOLD);
    assert_eq!(autopilot.errors(), 1);
    assert_eq!(sim.player().heading, 0.0);
    assert_eq!(sim.tick(), 1);
}

#[test]
fn test_paused() {
    let mut sim = Simulation::new(SimulationConfig::default(), 0);
    let mut autopilot = autopilot();
    autopilot.tick(&mut sim);
    sim.toggle_pause();
    assert!(sim.is_paused());

    let hash = sim.hash();
    for _ in 0..10 {
        autopilot.tick(&mut sim);
    }
    assert_eq!(sim.hash(), hash);
    assert_eq!(sim.tick(), 1);

    sim.set_paused(false);
    autopilot.tick(&mut sim);
    assert_eq!(sim.tick(), 2);
}

#[test]
fn test_reports() {
    let sink = Counter::default();
    let samples = sink.samples.clone();
    let mut autopilot =
        Autopilot::new(Controller::new(ControllerConfig::default()).unwrap(), Box::new(sink));
    let mut sim = Simulation::new(SimulationConfig::default(), 0);

    for _ in 0..5 {
        autopilot.tick(&mut sim);
    }
    assert!(samples.borrow().is_empty());

    autopilot.request_report();
    autopilot.tick(&mut sim);
    autopilot.tick(&mut sim);
    assert_eq!(samples.borrow().len(), 1);

    autopilot.report_every(10);
    for _ in 0..33 {
        autopilot.tick(&mut sim);
    }
    assert_eq!(samples.borrow().len(), 4);

    autopilot.report_every(0);
    for _ in 0..20 {
        autopilot.tick(&mut sim);
    }
    assert_eq!(samples.borrow().len(), 4);
}

#[test]
fn test_sink_errors_do_not_affect_control() {
    let mut reporting = Autopilot::new(
        Controller::new(ControllerConfig::default()).unwrap(),
        Box::new(Failing),
    );
    reporting.report_every(1);
    let mut quiet = autopilot();

    let mut a = Simulation::new(SimulationConfig::default(), 9);
    let mut b = Simulation::new(SimulationConfig::default(), 9);
    for _ in 0..200 {
        assert_eq!(reporting.tick(&mut a), quiet.tick(&mut b));
    }
    assert_eq!(a.hash(), b.hash());
}

#[test]
fn test_sense() {
    let mut sim = Simulation::new(SimulationConfig::default(), 0);
    sim.place_target(point![500.0, 400.0]);
    let sample = autopilot().sense(&sim);
    assert_eq!(sample.curve, 90.0);
    assert_eq!(sample.wall_distance, 500.0);
    assert_eq!(sample.target_distance, Some(100.0));
}
