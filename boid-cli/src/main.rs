use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use boid_cli::{build_flock, load_config, load_script, run, RunOutput};
use boid_core::FlockConfig;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless boid flocking simulation", long_about = None)]
struct Args {
    /// World width
    #[arg(long, default_value_t = 900.0)]
    width: f32,

    /// World height
    #[arg(long, default_value_t = 570.0)]
    height: f32,

    /// Number of boids
    #[arg(short, long, default_value_t = 200)]
    boids: usize,

    /// RNG seed; omit for a different run every time
    #[arg(short, long)]
    seed: Option<u64>,

    /// Frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// JSON file with flock parameters (missing fields use defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON array of scheduled events, e.g. [{"frame": 30, "type": "explode"}]
    #[arg(short, long)]
    events: Option<PathBuf>,

    /// Write the final summary and snapshot here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Wrap boids around the world edges instead of steering off the walls
    #[arg(short, long)]
    wrap_around: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("Boid simulation starting...");
    log::info!("World: {}x{}, {} boids", args.width, args.height, args.boids);

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => FlockConfig::default(),
    };
    if args.wrap_around {
        config.wrap_around = true;
    }

    let script = match &args.events {
        Some(path) => load_script(path)?,
        None => Vec::new(),
    };

    let mut flock = build_flock(args.width, args.height, args.boids, config, args.seed)
        .context("Failed to initialize flock")?;

    let summary = run(&mut flock, args.frames, args.dt, &script).context("Simulation error")?;
    let output = RunOutput::new(summary, &flock);
    let json = serde_json::to_string_pretty(&output)?;

    match &args.output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Snapshot written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
