#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Skyfall Defence session and
//! prints a run summary.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use skyfall_defence_core::Event;
use skyfall_defence_session::{GameSession, SessionConfig};
use skyfall_defence_world::query;

// Frames must stay under the session's catch-up clamp or simulated time
// falls behind wall time.
const FRAME: Duration = Duration::from_millis(16);

/// Runs a deterministic, headless defense session.
#[derive(Debug, Parser)]
#[command(name = "skyfall-defence")]
struct Args {
    /// Seed for every derived random stream.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Playfield width in world units.
    #[arg(long, default_value_t = 800.0)]
    width: f32,
    /// Playfield height in world units.
    #[arg(long, default_value_t = 600.0)]
    height: f32,
    /// Simulated time to run, in seconds.
    #[arg(long, default_value_t = 120)]
    duration_secs: u64,
    /// Optional TOML configuration file; overrides the flags above.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct RunTally {
    spawned: u64,
    destroyed: u64,
    exited: u64,
    fired: u64,
    detonated: u64,
    city_hits: u64,
}

impl RunTally {
    fn record(&mut self, event: &Event) {
        match event {
            Event::AsteroidSpawned { .. } => self.spawned += 1,
            Event::AsteroidDestroyed { .. } => self.destroyed += 1,
            Event::AsteroidExited { .. } => self.exited += 1,
            Event::ProjectileFired { .. } => self.fired += 1,
            Event::ProjectileDetonated { .. } => self.detonated += 1,
            Event::CityHit { .. } => self.city_hits += 1,
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read configuration from {}", path.display()))?;
            SessionConfig::from_toml_str(&contents)
                .with_context(|| format!("invalid configuration in {}", path.display()))?
        }
        None => SessionConfig {
            seed: args.seed,
            width: args.width,
            height: args.height,
        },
    };

    let mut session = GameSession::new(config);
    let mut tally = RunTally::default();
    let total = Duration::from_secs(args.duration_secs);
    let mut simulated = Duration::ZERO;

    while simulated < total && !session.is_game_over() {
        for event in session.advance(FRAME) {
            tally.record(event);
        }
        simulated += FRAME;
    }

    let city = query::city(session.world());
    println!("simulated {:.1}s", simulated.as_secs_f64());
    println!(
        "asteroids: {} spawned, {} destroyed, {} exited",
        tally.spawned, tally.destroyed, tally.exited
    );
    println!(
        "projectiles: {} fired, {} detonated",
        tally.fired, tally.detonated
    );
    println!(
        "city: {} hits taken, {}/{} structure remaining",
        tally.city_hits, city.health, city.max_health
    );
    if session.is_game_over() {
        println!("city destroyed, final score {}", session.score());
    } else {
        println!("city survived, score {}", session.score());
    }
    Ok(())
}
