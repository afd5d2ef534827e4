//! Headless three-body runner
//!
//! Loads a scenario (or the built-in default), advances it frame by frame and
//! prints the per-frame output: time, step size, error and body states.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use threebody::{Acceptance, Frame, ScenarioConfig, Simulation, SystemState};

#[derive(Parser, Debug)]
#[command(version, about = "Integrate the planar three-body problem with adaptive RKF45")]
struct Args {
    /// Scenario YAML file; the built-in scenario is used when omitted
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Number of frames (accepted steps) to run
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Print every N-th frame
    #[arg(short, long, default_value_t = 60)]
    every: u64,
}

fn load_scenario(path: Option<&PathBuf>) -> Result<ScenarioConfig> {
    match path {
        Some(path) => ScenarioConfig::from_yaml_file(path)
            .with_context(|| format!("loading {}", path.display())),
        None => Ok(ScenarioConfig::default()),
    }
}

fn print_frame(index: u64, frame: &Frame) {
    let marker = match frame.acceptance {
        Acceptance::WithinTolerance => "",
        Acceptance::Forced => " (forced)",
    };
    println!(
        "frame {index:>6}  t = {:>10.3} s  dt = {:.3e} s  err = {:.3e}  proposed = {:.3e}{marker}",
        frame.time, frame.step_size, frame.error, frame.proposed_step_size
    );
    for (i, b) in frame.bodies.iter().enumerate() {
        println!(
            "    body {i}: x = ({:>12.4}, {:>12.4})  v = ({:>10.5}, {:>10.5})  a = ({:>10.6}, {:>10.6})",
            b.x.x, b.x.y, b.v.x, b.v.y, b.a.x, b.a.y
        );
    }
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let args = Args::parse();
    let scenario = load_scenario(args.scenario.as_ref())?;
    let mut sim = Simulation::from_scenario(&scenario).context("invalid scenario")?;

    let e0 = sim.total_energy();
    let p0 = sim.total_momentum();
    let every = args.every.max(1);

    for index in 1..=args.frames {
        let frame = sim.tick();
        if index % every == 0 || index == args.frames {
            print_frame(index, &frame);
        }
        if !SystemState::from_bodies(&frame.bodies).is_finite() {
            tracing::warn!(frame = index, t = frame.time, "state became non-finite, stopping");
            break;
        }
    }

    let stats = sim.stats();
    tracing::info!(
        t = sim.time(),
        accepted = stats.accepted_steps,
        rejected = stats.rejected_steps,
        forced = stats.forced_steps,
        fn_evals = stats.fn_evals,
        "run finished"
    );
    tracing::info!(
        energy_drift = (sim.total_energy() - e0) / e0.abs(),
        momentum_drift = (sim.total_momentum() - p0).norm(),
        "conserved quantities"
    );

    Ok(())
}
