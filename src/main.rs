use std::{fs, io, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use lifers::{life, pattern, Pos, Sim, SparseWorld, View, World};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Plaintext pattern file seeding the grid ('#' = alive, '.' = dead,
    /// '!' starts a comment line); starts empty when omitted
    pattern: Option<PathBuf>,

    /// Milliseconds between generations
    #[arg(short, long, default_value_t = 200)]
    interval: u64,

    /// Run this many generations without the TUI and print the result
    #[arg(short, long)]
    steps: Option<u64>,

    /// Append logs to this file (the TUI otherwise swallows them)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;

    let actives = match &args.pattern {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading pattern file {}", path.display()))?;
            pattern::parse(&content).context("parsing pattern file")?
        }
        None => vec![],
    };

    if let Some(steps) = args.steps {
        return run_headless(actives, steps);
    }

    let simulation = Sim::spawn(actives, Duration::from_millis(args.interval));
    let view = View::spawn::<SparseWorld>(simulation.handle());

    simulation.join();
    view.join();
    Ok(())
}

fn init_tracing(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match (&args.log_file, args.steps) {
        (Some(path), _) => {
            let file = fs::File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .init();
        }
        (None, Some(_)) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
        // interactive mode owns the terminal, logs stay off
        (None, None) => (),
    }
    Ok(())
}

fn run_headless(actives: Vec<Pos>, steps: u64) -> Result<()> {
    let mut world: SparseWorld = actives.into_iter().collect();
    let mut generation = 0;

    while generation < steps {
        world = life::step(&world);
        generation += 1;
        debug!(generation, alive = world.len(), "advanced");
        if world.is_empty() {
            info!(generation, "grid went inactive");
            break;
        }
    }

    info!(generation, alive = world.len(), "finished");
    print!("{}", pattern::render(&world));
    Ok(())
}
