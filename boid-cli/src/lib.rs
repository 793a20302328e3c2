//! Headless runner: builds a flock, replays a scripted event list while
//! stepping a fixed number of frames, and reports where everything ended up.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use boid_core::{Flock, FlockConfig, Vector2D, World};
use boid_shared::{
    parse_script, EventOutcome, FrameSnapshot, Position, ScheduledEvent, StatusResponse,
};
use serde::Serialize;

/// Loads a (possibly partial) JSON config; missing fields keep their defaults.
pub fn load_config(path: &Path) -> Result<FlockConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = serde_json::from_str::<FlockConfig>(&text)
        .with_context(|| format!("Invalid config JSON in {}", path.display()))?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

pub fn load_script(path: &Path) -> Result<Vec<ScheduledEvent>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read event script {}", path.display()))?;
    let events = parse_script(&text)
        .with_context(|| format!("Invalid event script in {}", path.display()))?;
    log::info!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

pub fn build_flock(
    width: f32,
    height: f32,
    count: usize,
    config: FlockConfig,
    seed: Option<u64>,
) -> Result<Flock> {
    let world = World::new(width, height).context("Invalid world size")?;
    let flock = match seed {
        Some(seed) => Flock::with_seed(world, count, config, seed),
        None => {
            let mut flock = Flock::new(world, count);
            flock.config = config;
            flock
        }
    };
    Ok(flock)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub events_applied: usize,
    pub events_rejected: usize,
    pub events_skipped: usize,
    pub centroid: Position,
    pub mean_speed: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    pub summary: RunSummary,
    pub status: StatusResponse,
    pub snapshot: FrameSnapshot,
}

impl RunOutput {
    pub fn new(summary: RunSummary, flock: &Flock) -> Self {
        Self {
            summary,
            status: StatusResponse::from(flock),
            snapshot: FrameSnapshot::from(flock),
        }
    }
}

/// Steps `frames` frames of `dt` seconds. Each scheduled event is applied
/// right before the run's frame with that index (counted from zero for this
/// call, independent of `step` events inside the script). Events that fail
/// are logged and counted, and the run carries on. `script` must be sorted by
/// frame (as [`parse_script`] returns it).
pub fn run(
    flock: &mut Flock,
    frames: u64,
    dt: f32,
    script: &[ScheduledEvent],
) -> Result<RunSummary> {
    let mut pending = script.iter().peekable();
    let mut applied = 0;
    let mut rejected = 0;

    for frame in 0..frames {
        while let Some(scheduled) = pending.next_if(|e| e.frame <= frame) {
            match scheduled.event.apply(flock) {
                Ok(EventOutcome::Placed(id)) => {
                    log::debug!("frame {}: {:?} -> marker {}", frame, scheduled.event, id);
                    applied += 1;
                }
                Ok(EventOutcome::Applied) => {
                    log::debug!("frame {}: {:?}", frame, scheduled.event);
                    applied += 1;
                }
                Err(e) => {
                    log::warn!("frame {}: rejected {:?}: {}", frame, scheduled.event, e);
                    rejected += 1;
                }
            }
        }

        flock
            .step(dt)
            .with_context(|| format!("Failed to step frame {}", frame))?;
    }

    let skipped = pending.count();
    if skipped > 0 {
        log::warn!("{} events scheduled after the last frame were skipped", skipped);
    }

    let summary = summarize(flock, frames, applied, rejected, skipped);
    log::info!(
        "Ran {} frames: centroid ({:.1}, {:.1}), mean speed {:.1}",
        summary.frames,
        summary.centroid.x,
        summary.centroid.y,
        summary.mean_speed
    );
    Ok(summary)
}

fn summarize(
    flock: &Flock,
    frames: u64,
    events_applied: usize,
    events_rejected: usize,
    events_skipped: usize,
) -> RunSummary {
    let boids = flock.boids();
    let (centroid, mean_speed) = if boids.is_empty() {
        (Position::new(0.0, 0.0), 0.0)
    } else {
        let n = boids.len() as f32;
        let sum = boids.iter().map(|b| b.position).sum::<Vector2D>();
        let speed: f32 = boids.iter().map(|b| b.velocity.magnitude()).sum();
        (Position::from(sum / n), speed / n)
    };

    RunSummary {
        frames,
        events_applied,
        events_rejected,
        events_skipped,
        centroid,
        mean_speed,
    }
}
