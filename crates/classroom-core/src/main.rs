//! Classroom Simulation
//!
//! Runs a seeded classroom for a number of ticks, optionally writing the
//! agent record stream and a final state dump.

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use classroom_core::config::DEFAULT_TUNING_PATH;
use classroom_core::{default_config_toml, Classroom, Config, JsonlSink, LogSink, NullSink, SimError};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "classroom_sim")]
#[command(about = "Simulates students choosing between studying, chatting and quarrelling")]
struct Args {
    /// Tuning file (TOML). Falls back to classroom.toml, then built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Number of students
    #[arg(long)]
    agents: Option<u32>,

    /// Write agent records as JSON lines
    #[arg(long)]
    log: Option<PathBuf>,

    /// Write the final classroom state as JSON
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Print the default tuning file and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = Args::parse();
    if args.print_default_config {
        print!("{}", default_config_toml());
        return;
    }

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), SimError> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading tuning from {}", path.display());
            Config::load(path)?
        }
        None if Path::new(DEFAULT_TUNING_PATH).exists() => {
            info!("Loading tuning from {}", DEFAULT_TUNING_PATH);
            Config::load(DEFAULT_TUNING_PATH)?
        }
        None => Config::default(),
    };
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(ticks) = args.ticks {
        config.simulation.ticks = ticks;
    }
    if let Some(agents) = args.agents {
        config.simulation.agents = agents;
    }

    info!(
        "Seed {}, {} students, {} ticks",
        config.simulation.seed, config.simulation.agents, config.simulation.ticks
    );

    let ticks = config.simulation.ticks;
    let mut classroom = Classroom::from_config(config)?;

    let mut sink: Box<dyn LogSink> = match &args.log {
        Some(path) => Box::new(JsonlSink::create(path)?),
        None => Box::new(NullSink::new()),
    };
    classroom.run(ticks, sink.as_mut())?;

    for agent in classroom.agents() {
        info!("{}", agent.status());
    }

    if let Some(path) = &args.snapshot {
        let json = serde_json::to_string_pretty(&classroom.snapshot())?;
        if let Err(e) = fs::write(path, json) {
            warn!("Could not write snapshot to {}: {}", path.display(), e);
            return Err(e.into());
        }
        info!("Wrote snapshot to {}", path.display());
    }

    Ok(())
}
