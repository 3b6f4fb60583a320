use clap::Parser;
use drifter_fuzzy::diagnostics::{DiagnosticSink, NullSink, ReportSink};
use drifter_fuzzy::Variant;
use drifter_simulator::target::TargetMode;
use drifter_simulator::{Autopilot, Simulation};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(about = "Runs the fuzzy autopilot headless")]
struct Arguments {
    #[clap(short, long, value_parser, default_value = "0")]
    seed: u32,

    #[clap(short, long, value_parser, default_value = "3600")]
    ticks: u32,

    #[clap(short, long, value_parser, default_value = "static")]
    mode: TargetMode,

    #[clap(short, long, value_parser, default_value = "canonical")]
    variant: Variant,

    #[clap(long, value_parser)]
    controller_config: Option<PathBuf>,

    #[clap(long, value_parser)]
    sim_config: Option<PathBuf>,

    /// Directory for the fuzzy report and plots.
    #[clap(long, value_parser)]
    report_dir: Option<PathBuf>,

    /// Rewrite the report every N ticks. 0 writes it once on the first tick.
    #[clap(long, value_parser, default_value = "0")]
    report_every: u32,

    /// Write the final simulation snapshot to this JSON file.
    #[clap(long, value_parser)]
    snapshot: Option<PathBuf>,

    /// Print the controller config as JSON and exit.
    #[clap(long)]
    dump_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(drifter_tools::log_filter("drift")),
    )
    .init();

    let args = Arguments::parse();
    let controller =
        drifter_tools::load_controller(args.variant, args.controller_config.as_deref())?;
    if args.dump_config {
        println!("{}", controller.config().to_json_pretty()?);
        return Ok(());
    }
    if args.controller_config.is_none() && args.variant != Variant::Canonical {
        log::info!("Using variant {}", args.variant);
    }

    let config = drifter_tools::load_sim_config(args.sim_config.as_deref())?;
    config.validate()?;
    let mut sim = Simulation::new(config, args.seed);
    sim.set_target_mode(args.mode);

    let sink: Box<dyn DiagnosticSink> = match &args.report_dir {
        Some(dir) => Box::new(ReportSink::new(dir)),
        None => Box::new(NullSink),
    };
    let mut autopilot = Autopilot::new(controller, sink);
    if args.report_dir.is_some() {
        autopilot.request_report();
        autopilot.report_every(args.report_every);
    }

    let progress_interval = (10.0 / sim.config().tick_length).round().max(1.0) as u32;
    for _ in 0..args.ticks {
        autopilot.tick(&mut sim);
        if sim.tick() % progress_interval == 0 {
            log::info!(
                "t={:.1}s captures={} speed={:.2} wall={:.0} target={:.0}",
                sim.time(),
                sim.captures(),
                sim.player().speed,
                sim.wall_distance(),
                sim.target_distance()
            );
        }
    }

    let player = sim.player();
    log::info!(
        "Finished {} ticks ({:.1}s): {} captures, travelled {:.0}, {} inference errors",
        sim.tick(),
        sim.time(),
        sim.captures(),
        sim.distance_travelled(),
        autopilot.errors()
    );
    log::info!(
        "Final position ({:.1}, {:.1}) heading {:.1} speed {:.2}, hash {}",
        player.position.x,
        player.position.y,
        player.heading,
        player.speed,
        sim.hash()
    );

    if let Some(path) = &args.snapshot {
        drifter_tools::write_json(path, &sim.snapshot())?;
    }
    Ok(())
}
