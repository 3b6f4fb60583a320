use approx::assert_abs_diff_eq;
use drifter_fuzzy::{
    Controller, ControllerConfig, DegeneratePolicy, InferenceError, Sample, Turn, Variant,
};
use test_log::test;

fn canonical() -> Controller {
    Controller::new(ControllerConfig::default()).unwrap()
}

#[test]
fn test_target_behind_near_wall() {
    let controller = canonical();
    let command = controller.compute(170.0, 50.0).unwrap();
    assert_eq!(command.turn, Turn::Right);
    assert!(command.speed_delta < -1.5, "{}", command.speed_delta);

    let command = controller.compute(-170.0, 50.0).unwrap();
    assert_eq!(command.turn, Turn::Left);
    assert!(command.speed_delta < -1.5, "{}", command.speed_delta);
}

#[test]
fn test_target_ahead_open_road() {
    let controller = canonical();
    let evaluation = controller.evaluate(&Sample::new(0.0, 1000.0)).unwrap();
    assert_eq!(evaluation.command.turn, Turn::Hold);
    assert!(evaluation.command.speed_delta > 0.0);
    assert!(evaluation.speed.probed);
    assert_abs_diff_eq!(evaluation.command.speed_delta, 0.2017, epsilon = 1e-3);

    let command = controller.compute(30.0, 1000.0).unwrap();
    assert_eq!(command.turn, Turn::Hold);
    assert!(command.speed_delta > 0.0);
}

#[test]
fn test_known_outputs() {
    let controller = canonical();
    let cases = [
        (170.0, 50.0, Turn::Right, -2.1111),
        (30.0, 70.0, Turn::Right, -0.8544),
        (0.0, 50.0, Turn::Hold, -0.1934),
        (45.0, 100.0, Turn::Right, -0.1333),
        (120.0, 150.0, Turn::Right, -1.0),
        (90.0, 120.0, Turn::Right, -0.8527),
        (60.0, 1000.0, Turn::Right, -0.7684),
        (20.0, 80.0, Turn::Right, -0.5635),
        (10.0, 1000.0, Turn::Hold, 0.2156),
    ];
    for (curve, wall, turn, speed) in cases {
        let command = controller.compute(curve, wall).unwrap();
        assert_eq!(command.turn, turn, "turn at ({}, {})", curve, wall);
        assert_abs_diff_eq!(command.speed_delta, speed, epsilon = 1e-3);
    }
}

#[test]
fn test_output_ranges() {
    let controller = canonical();
    for curve in (-200..=200).step_by(5) {
        for wall in [-10.0, 0.0, 50.0, 75.0, 90.0, 100.0, 125.0, 150.0, 300.0, 1440.0, 2000.0] {
            let command = controller.compute(curve as f64, wall).unwrap();
            assert!([-1, 0, 1].contains(&command.turn.sign()));
            assert!(
                (-2.5..=0.3).contains(&command.speed_delta),
                "speed {} at ({}, {})",
                command.speed_delta,
                curve,
                wall
            );
        }
    }
}

#[test]
fn test_breakpoints() {
    let controller = canonical();
    for curve in [0.0, 15.0, -15.0, 45.0, -45.0, 120.0, -120.0, 180.0, -180.0] {
        for wall in [75.0, 100.0, 150.0] {
            let command = controller.compute(curve, wall).unwrap();
            assert!(command.speed_delta.is_finite());
            let expected = if curve == 0.0 {
                Turn::Hold
            } else if curve > 0.0 {
                Turn::Right
            } else {
                Turn::Left
            };
            if curve.abs() != 15.0 || wall != 150.0 {
                assert_eq!(command.turn, expected, "turn at ({}, {})", curve, wall);
            } else {
                assert_eq!(command.turn, Turn::Hold, "turn at ({}, {})", curve, wall);
            }
        }
    }
}

#[test]
fn test_mirror_symmetry() {
    let controller = canonical();
    for curve in (1..=180).step_by(7) {
        for wall in [0.0, 60.0, 80.0, 110.0, 140.0, 500.0] {
            let curve = curve as f64;
            let right = controller.evaluate(&Sample::new(curve, wall)).unwrap();
            let left = controller.evaluate(&Sample::new(-curve, wall)).unwrap();
            assert_eq!(left.command.turn, right.command.turn.mirrored());
            assert_abs_diff_eq!(left.turn.crisp, -right.turn.crisp, epsilon = 1e-9);
            assert_abs_diff_eq!(
                left.command.speed_delta,
                right.command.speed_delta,
                epsilon = 1e-9
            );
        }
    }
}

#[test]
fn test_idempotent() {
    let controller = canonical();
    let a = controller.evaluate(&Sample::new(37.5, 123.0)).unwrap();
    let b = controller.evaluate(&Sample::new(37.5, 123.0)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_out_of_range_inputs_are_clamped() {
    let controller = canonical();
    assert_eq!(
        controller.compute(400.0, 5000.0).unwrap(),
        controller.compute(180.0, 1440.0).unwrap()
    );
    assert_eq!(
        controller.compute(-400.0, -30.0).unwrap(),
        controller.compute(-180.0, 0.0).unwrap()
    );
}

#[test]
fn test_non_finite_inputs() {
    let controller = canonical();
    assert!(matches!(
        controller.compute(f64::NAN, 100.0),
        Err(InferenceError::NonFiniteInput { .. })
    ));
    assert!(matches!(
        controller.compute(10.0, f64::INFINITY),
        Err(InferenceError::NonFiniteInput { .. })
    ));
}

#[test]
fn test_reject_policy() {
    let config = ControllerConfig::default().with_policy(DegeneratePolicy::Reject);
    let controller = Controller::new(config).unwrap();
    assert_eq!(
        controller.compute(0.0, 1000.0),
        Err(InferenceError::NoRuleFired {
            output: "turn".to_string()
        })
    );
    assert!(controller.compute(10.0, 1000.0).is_ok());
}

#[test]
fn test_angle_only_turn() {
    let controller = Controller::from_variant(Variant::AngleOnlyTurn).unwrap();
    assert_eq!(controller.turn_engine().inputs().len(), 1);
    for wall in [50.0, 1000.0] {
        assert_eq!(controller.compute(30.0, wall).unwrap().turn, Turn::Hold);
        assert_eq!(controller.compute(90.0, wall).unwrap().turn, Turn::Right);
        assert_eq!(controller.compute(-90.0, wall).unwrap().turn, Turn::Left);
    }
    assert_eq!(controller.compute(0.0, 50.0).unwrap().turn, Turn::Hold);
}

#[test]
fn test_target_aware() {
    let controller = Controller::from_variant(Variant::TargetAware).unwrap();
    assert!(controller.needs_target_distance());
    assert!(!canonical().needs_target_distance());

    assert_eq!(
        controller.compute(10.0, 1000.0),
        Err(InferenceError::MissingInput("target_distance".to_string()))
    );

    let far = controller
        .compute_sample(&Sample::new(10.0, 1000.0).with_target_distance(500.0))
        .unwrap();
    let near = controller
        .compute_sample(&Sample::new(10.0, 1000.0).with_target_distance(5.0))
        .unwrap();
    assert_abs_diff_eq!(far.speed_delta, 0.2156, epsilon = 1e-3);
    assert!(near.speed_delta < 0.0);
    assert_eq!(far.turn, near.turn);
}

#[test]
fn test_json_round_trip() {
    for variant in Variant::all() {
        let config = variant.config();
        let json = config.to_json_pretty().unwrap();
        let back = ControllerConfig::from_json(&json).unwrap();
        assert_eq!(back, config);
        let controller = Controller::new(back).unwrap();
        let original = Controller::new(config).unwrap();
        let sample = Sample::new(-63.0, 88.0).with_target_distance(40.0);
        assert_eq!(
            controller.compute_sample(&sample).unwrap(),
            original.compute_sample(&sample).unwrap()
        );
    }
}

#[test]
fn test_default_policy_in_json() {
    let mut value: serde_json::Value =
        serde_json::from_str(&ControllerConfig::default().to_json_pretty().unwrap()).unwrap();
    value.as_object_mut().unwrap().remove("degenerate");
    let config = ControllerConfig::from_json(&value.to_string()).unwrap();
    assert_eq!(config.degenerate, DegeneratePolicy::Probe);
}

#[test]
fn test_malformed_configs() {
    assert!(ControllerConfig::from_json("{").is_err());
    assert!(ControllerConfig::from_json("{}").is_err());

    let mut config = ControllerConfig::default();
    config.turn_rules.rules[0].then = "spin".to_string();
    assert!(Controller::new(config).is_err());

    let mut config = ControllerConfig::default();
    config.speed_rules.rules[3].when[1].label = "touching".to_string();
    assert!(Controller::new(config).is_err());

    let mut config = ControllerConfig::default();
    config.inputs[1].name = "curve".to_string();
    assert!(Controller::new(config).is_err());

    let mut config = ControllerConfig::default();
    config.inputs[0].name = "heading".to_string();
    assert!(Controller::new(config).is_err());

    let mut config = ControllerConfig::default();
    config.inputs[0].universe.step = 0.0;
    assert!(Controller::new(config).is_err());

    let mut config = ControllerConfig::default();
    config.turn_rules.rules.clear();
    assert!(Controller::new(config).is_err());

    assert!(ControllerConfig::load(std::path::Path::new("/nonexistent/controller.json")).is_err());
}

#[test]
fn test_variable_lookup() {
    let controller = canonical();
    assert!(controller.variable("curve").is_some());
    assert!(controller.variable("speed_delta").is_some());
    assert!(controller.variable("target_distance").is_none());
}
