use drifter_fuzzy::diagnostics::{
    DiagnosticSink, MembershipSnapshot, MemorySink, NullSink, ReportSink, REPORT_FILE,
};
use drifter_fuzzy::variable::Role;
use drifter_fuzzy::{Controller, ControllerConfig, Sample, Turn};
use std::path::PathBuf;
use test_log::test;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "drifter_fuzzy_{}_{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn snapshot(controller: &Controller, sample: &Sample) -> MembershipSnapshot {
    let evaluation = controller.evaluate(sample).unwrap();
    MembershipSnapshot::capture(controller, &evaluation)
}

#[test]
fn test_snapshot() {
    let controller = Controller::new(ControllerConfig::default()).unwrap();
    let snapshot = snapshot(&controller, &Sample::new(30.0, 90.0));

    let names: Vec<&str> = snapshot.variables.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["curve", "wall_distance", "turn", "speed_delta"]);
    assert_eq!(snapshot.inputs().count(), 2);
    assert_eq!(snapshot.outputs().count(), 2);
    assert!(!snapshot.probed);

    let curve = snapshot.variable("curve").unwrap();
    assert_eq!(curve.role, Role::Antecedent);
    assert_eq!(curve.value, 30.0);
    assert_eq!(curve.degree("near_right"), Some(0.5));
    assert_eq!(curve.degree("mid_right"), Some(0.5));
    assert_eq!(curve.degree("far_left"), Some(0.0));
    assert!(curve.aggregated.is_empty());

    let wall = snapshot.variable("wall_distance").unwrap();
    assert!(wall.degree("near").unwrap() > 0.0);
    assert!(wall.degree("medium").unwrap() > 0.0);
    assert_eq!(wall.degree("far"), Some(0.0));

    let turn = snapshot.variable("turn").unwrap();
    assert_eq!(turn.role, Role::Consequent);
    assert!(turn.degree("right").unwrap() > 0.0);
    assert!(!turn.aggregated.is_empty());
}

#[test]
fn test_probed_snapshot() {
    let controller = Controller::new(ControllerConfig::default()).unwrap();
    let sample = Sample::new(0.0, 1000.0);
    let snapshot = snapshot(&controller, &sample);
    assert!(snapshot.probed);

    let command = controller.compute_sample(&sample).unwrap();
    let text = drifter_fuzzy::report::render_text(&sample, &command, &snapshot);
    assert!(text.contains("neighbours probed"));
    assert!(text.contains("average the neighbour centroids"));
}

#[test]
fn test_memory_sink() {
    let controller = Controller::new(ControllerConfig::default()).unwrap();
    let mut sink = MemorySink::new();
    for curve in [-90.0, 0.0, 90.0] {
        let sample = Sample::new(curve, 400.0);
        let evaluation = controller.evaluate(&sample).unwrap();
        let snapshot = MembershipSnapshot::capture(&controller, &evaluation);
        sink.emit(&sample, &evaluation.command, &snapshot).unwrap();
    }
    assert_eq!(sink.records.len(), 3);
    assert_eq!(sink.records[0].command.turn, Turn::Left);
    assert_eq!(sink.records[1].command.turn, Turn::Hold);
    assert_eq!(sink.records[2].command.turn, Turn::Right);
    assert_eq!(sink.records[2].sample.curve, 90.0);

    let mut null = NullSink;
    let record = &sink.records[0];
    null.emit(&record.sample, &record.command, &record.snapshot)
        .unwrap();
}

#[test]
fn test_report_sink() {
    let controller = Controller::new(ControllerConfig::default()).unwrap();
    let dir = scratch_dir("report");
    let mut sink = ReportSink::new(&dir);

    let sample = Sample::new(-120.0, 60.0);
    let evaluation = controller.evaluate(&sample).unwrap();
    let snapshot = MembershipSnapshot::capture(&controller, &evaluation);
    sink.emit(&sample, &evaluation.command, &snapshot).unwrap();

    let report = std::fs::read_to_string(dir.join(REPORT_FILE)).unwrap();
    assert!(report.contains("curve: -120.00"));
    assert!(report.contains("wall_distance: 60.00"));
    assert!(report.contains("command: turn left"));
    assert!(report.contains("far_left: 1.00"));

    for name in ["curve", "wall_distance", "turn", "speed_delta"] {
        let svg = std::fs::read_to_string(sink.plot_path(name)).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(name));
    }
    let speed = std::fs::read_to_string(sink.plot_path("speed_delta")).unwrap();
    assert!(speed.contains("<polygon"));

    // A second emission overwrites the first.
    let sample = Sample::new(45.0, 500.0);
    let evaluation = controller.evaluate(&sample).unwrap();
    let snapshot = MembershipSnapshot::capture(&controller, &evaluation);
    sink.emit(&sample, &evaluation.command, &snapshot).unwrap();
    let report = std::fs::read_to_string(dir.join(REPORT_FILE)).unwrap();
    assert!(report.contains("curve: 45.00"));
    assert!(!report.contains("curve: -120.00"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_report_sink_bad_dir() {
    let file = scratch_dir("not_a_dir");
    std::fs::write(&file, "x").unwrap();
    let mut sink = ReportSink::new(&file.join("nested"));

    let controller = Controller::new(ControllerConfig::default()).unwrap();
    let sample = Sample::new(10.0, 10.0);
    let evaluation = controller.evaluate(&sample).unwrap();
    let snapshot = MembershipSnapshot::capture(&controller, &evaluation);
    assert!(sink.emit(&sample, &evaluation.command, &snapshot).is_err());

    std::fs::remove_file(&file).unwrap();
}
