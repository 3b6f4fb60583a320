use clap::Parser;
use drifter_fuzzy::diagnostics::{DiagnosticSink, MembershipSnapshot, ReportSink, REPORT_FILE};
use drifter_fuzzy::{Sample, Variant};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    about = "Evaluates the controller once and writes the fuzzy report",
    allow_negative_numbers = true
)]
struct Arguments {
    /// Signed angle to the target in degrees, positive to the right.
    #[clap(value_parser)]
    angle: f64,

    /// Distance to the wall ahead.
    #[clap(value_parser)]
    distance: f64,

    #[clap(long, value_parser)]
    target_distance: Option<f64>,

    #[clap(short, long, value_parser, default_value = "canonical")]
    variant: Variant,

    #[clap(long, value_parser)]
    controller_config: Option<PathBuf>,

    #[clap(short, long, value_parser, default_value = ".")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(drifter_tools::log_filter("fuzzy_report")),
    )
    .init();

    let args = Arguments::parse();
    let controller =
        drifter_tools::load_controller(args.variant, args.controller_config.as_deref())?;

    let mut sample = Sample::new(args.angle, args.distance);
    if let Some(target_distance) = args.target_distance {
        sample = sample.with_target_distance(target_distance);
    } else if controller.needs_target_distance() {
        anyhow::bail!("This controller needs --target-distance");
    }

    let evaluation = controller.evaluate(&sample)?;
    let snapshot = MembershipSnapshot::capture(&controller, &evaluation);
    println!(
        "turn: {} ({:.3})",
        evaluation.command.turn.name(),
        evaluation.turn.crisp
    );
    println!("speed delta: {:.3}", evaluation.command.speed_delta);
    if snapshot.probed {
        println!("(no rule fired at the sample, neighbours probed)");
    }

    let mut sink = ReportSink::new(&args.out);
    sink.emit(&sample, &evaluation.command, &snapshot)?;
    log::info!("Wrote {:?}", args.out.join(REPORT_FILE));
    Ok(())
}
