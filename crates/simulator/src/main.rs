//! Command-line entry point for the particle simulation.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use rand::Rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orchestrator::{SimulationConfig, SnapshotWriter};

#[derive(Parser, Debug)]
#[command(
    name = "simulator",
    about = "Short-range N-body simulation with strip domain decomposition"
)]
struct Args {
    /// Number of particles
    #[arg(short = 'n', long = "num-parts", default_value_t = 1000)]
    num_parts: usize,

    /// Particle initialization seed (0 = derive from entropy)
    #[arg(short = 's', long, default_value_t = 0)]
    seed: u64,

    /// Snapshot output file name (no snapshots when omitted)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Number of compute units (subdomain strips / worker threads)
    #[arg(short = 'p', long, default_value_t = 1)]
    units: usize,

    /// JSON configuration file; overrides the flags above
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simulator=info,orchestrator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig {
            num_parts: args.num_parts,
            seed: args.seed,
            num_units: args.units,
            nsteps: kernel::constants::NSTEPS,
            savefreq: kernel::constants::SAVEFREQ,
            output: args.output.as_ref().map(|p| p.display().to_string()),
        },
    };

    if config.seed == 0 {
        config.seed = rand::rng().random();
        tracing::info!("seed 0 requested, using entropy seed {}", config.seed);
    }
    config.validate()?;

    let size = config.box_size();
    let mut writer = match &config.output {
        Some(path) => Some(SnapshotWriter::create(path)?),
        None => None,
    };

    let start = Instant::now();
    let result = orchestrator::run(&config, |_, gathered| {
        if let Some(w) = writer.as_mut() {
            w.write_frame(gathered, size)?;
        }
        Ok(())
    })?;
    let seconds = start.elapsed().as_secs_f64();

    if let Some(w) = writer.as_mut() {
        w.flush()?;
    }

    println!(
        "Simulation Time = {} seconds for {} particles.",
        seconds, config.num_parts
    );
    tracing::info!(
        "{} steps complete ({:.4}s simulated)",
        result.steps,
        result.sim_time
    );

    Ok(())
}
