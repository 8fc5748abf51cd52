#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session orchestration: the fixed-timestep loop that wires the pure
//! systems to the authoritative world.
//!
//! A session drains wall-clock frame time in fixed simulation ticks. Each
//! tick the world advances first, then every system observes the fresh
//! state and responds with commands, which the world applies before the
//! next tick begins. Entities spawned by those commands therefore never
//! participate in the tick that created them.

use std::time::Duration;

use serde::Deserialize;
use sha2::{Digest, Sha256};
use skyfall_defence_core::{Command, Event, UpgradeKind};
use skyfall_defence_system_fire_control::FireControl;
use skyfall_defence_system_guidance::Guidance;
use skyfall_defence_system_spawning::{Config as SpawningConfig, Spawning};
use skyfall_defence_world::{apply, query, World};
use thiserror::Error;

/// Fixed simulation step, a 60 Hz baseline.
pub const FIXED_TICK: Duration = Duration::from_micros(16_667);

/// Upper bound on a single frame's contribution to the accumulator; a
/// stalled host catches up with at most two ticks instead of spiralling.
pub const MAX_FRAME_TIME: Duration = Duration::from_micros(33_334);

const SPAWN_STREAM_LABEL: &str = "spawn-stream";

/// Errors raised while loading a session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("failed to parse session configuration")]
    Parse(#[from] toml::de::Error),
    /// The playfield dimensions are degenerate.
    #[error("playfield dimensions must be positive, got {width}x{height}")]
    InvalidDimensions {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
}

/// Session configuration, loadable from a TOML document.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seed from which every per-system random stream is derived.
    pub seed: u64,
    /// Playfield width in world units.
    pub width: f32,
    /// Playfield height in world units.
    pub height: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 800.0,
            height: 600.0,
        }
    }
}

impl SessionConfig {
    /// Parses a configuration from TOML text and validates it.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        if config.width <= 0.0 || config.height <= 0.0 {
            return Err(ConfigError::InvalidDimensions {
                width: config.width,
                height: config.height,
            });
        }
        Ok(config)
    }
}

/// One running game: world, systems and the frame-time accumulator.
#[derive(Debug)]
pub struct GameSession {
    config: SessionConfig,
    world: World,
    spawning: Spawning,
    fire_control: FireControl,
    guidance: Guidance,
    accumulator: Duration,
    paused: bool,
    frame_events: Vec<Event>,
    tick_events: Vec<Event>,
    commands: Vec<Command>,
}

impl GameSession {
    /// Creates a session and configures the playfield from `config`.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let mut session = Self {
            config,
            world: World::new(),
            spawning: Spawning::new(SpawningConfig::new(derive_stream_seed(
                config.seed,
                SPAWN_STREAM_LABEL,
            ))),
            fire_control: FireControl::new(),
            guidance: Guidance::new(),
            accumulator: Duration::ZERO,
            paused: false,
            frame_events: Vec::new(),
            tick_events: Vec::new(),
            commands: Vec::new(),
        };
        session.reset_world();
        session
    }

    fn reset_world(&mut self) {
        self.frame_events.clear();
        apply(
            &mut self.world,
            Command::ConfigurePlayfield {
                width: self.config.width,
                height: self.config.height,
            },
            &mut self.frame_events,
        );
    }

    /// Discards all entities and system state and starts the session over
    /// with the same configuration.
    pub fn restart(&mut self) {
        self.spawning = Spawning::new(SpawningConfig::new(derive_stream_seed(
            self.config.seed,
            SPAWN_STREAM_LABEL,
        )));
        self.fire_control = FireControl::new();
        self.guidance = Guidance::new();
        self.accumulator = Duration::ZERO;
        self.paused = false;
        self.reset_world();
    }

    /// Feeds one frame of wall-clock time into the accumulator and drains
    /// it in fixed ticks, returning the events of every tick that ran.
    ///
    /// While paused or after the city is destroyed no ticks are applied.
    pub fn advance(&mut self, frame: Duration) -> &[Event] {
        self.frame_events.clear();
        if self.paused || self.is_game_over() {
            return &self.frame_events;
        }
        self.accumulator = self.accumulator.saturating_add(frame.min(MAX_FRAME_TIME));
        while self.accumulator >= FIXED_TICK {
            self.accumulator -= FIXED_TICK;
            self.step();
            if self.is_game_over() {
                break;
            }
        }
        &self.frame_events
    }

    fn step(&mut self) {
        self.tick_events.clear();
        apply(
            &mut self.world,
            Command::Tick { dt: FIXED_TICK },
            &mut self.tick_events,
        );

        let playfield = query::playfield(&self.world);
        let score = query::score(&self.world);
        let asteroids = query::asteroid_view(&self.world);
        let projectiles = query::projectile_view(&self.world);
        let city = query::city(&self.world);

        self.commands.clear();
        self.spawning
            .handle(&self.tick_events, playfield, score, &mut self.commands);
        self.fire_control.handle(
            &self.tick_events,
            &asteroids,
            &city,
            playfield,
            &mut self.commands,
        );
        self.guidance.handle(
            &self.tick_events,
            &asteroids,
            &projectiles,
            &city,
            playfield,
            &mut self.commands,
        );
        for command in self.commands.drain(..) {
            apply(&mut self.world, command, &mut self.tick_events);
        }

        self.frame_events.append(&mut self.tick_events);
    }

    /// Purchases a defense upgrade; applied immediately, outside the tick
    /// cadence.
    pub fn apply_upgrade(&mut self, kind: UpgradeKind) {
        apply(
            &mut self.world,
            Command::ApplyUpgrade { kind },
            &mut self.frame_events,
        );
    }

    /// Stops draining the accumulator without losing session state.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes a paused session.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether the session is currently paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the defended city has been destroyed.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        query::is_city_destroyed(&self.world)
    }

    /// Cumulative score of the running session.
    #[must_use]
    pub fn score(&self) -> u32 {
        query::score(&self.world)
    }

    /// Read-only access to the underlying world for rendering queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }
}

/// Derives an independent seed for a named random stream, so adding new
/// streams never perturbs existing ones.
fn derive_stream_seed(global_seed: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use skyfall_defence_core::{
        AsteroidId, AsteroidKind, AsteroidSpec, Command, Event, UpgradeKind, Vec2,
    };
    use skyfall_defence_world::{apply, query};

    use crate::{ConfigError, GameSession, SessionConfig};

    fn session() -> GameSession {
        GameSession::new(SessionConfig {
            seed: 42,
            width: 800.0,
            height: 600.0,
        })
    }

    fn inject_asteroid(session: &mut GameSession, spec: AsteroidSpec) {
        let mut events = Vec::new();
        apply(&mut session.world, Command::SpawnAsteroid { spec }, &mut events);
    }

    #[test]
    fn config_parses_from_toml() {
        let config =
            SessionConfig::from_toml_str("seed = 5\nwidth = 1024.0\nheight = 768.0").expect("parse");
        assert_eq!(config.seed, 5);
        assert!((config.width - 1024.0).abs() < f32::EPSILON);

        let defaults = SessionConfig::from_toml_str("").expect("empty document uses defaults");
        assert_eq!(defaults.seed, 0);
    }

    #[test]
    fn config_rejects_bad_documents_and_degenerate_dimensions() {
        assert!(matches!(
            SessionConfig::from_toml_str("seed = \"many\""),
            Err(ConfigError::Parse(_)),
        ));
        assert!(matches!(
            SessionConfig::from_toml_str("width = -4.0"),
            Err(ConfigError::InvalidDimensions { .. }),
        ));
    }

    #[test]
    fn a_stalled_frame_is_clamped_before_accumulation() {
        let mut game = session();
        let events = game.advance(Duration::from_secs(30));
        let ticks = events
            .iter()
            .filter(|event| matches!(event, Event::TimeAdvanced { .. }))
            .count();
        // The clamp admits exactly two fixed ticks per frame.
        assert_eq!(ticks, 2);
    }

    #[test]
    fn pausing_stops_ticks_without_losing_state() {
        let mut game = session();
        let _ = game.advance(Duration::from_secs(3));
        let score_before = game.score();

        game.pause();
        assert!(game.advance(Duration::from_secs(5)).is_empty());
        assert_eq!(game.score(), score_before);

        game.resume();
        assert!(!game.advance(Duration::from_millis(100)).is_empty());
    }

    #[test]
    fn upgrades_apply_outside_the_tick_cadence() {
        let mut game = session();
        game.apply_upgrade(UpgradeKind::FireRate);
        assert_eq!(query::city(game.world()).upgrades.fire_rate, 1);
    }

    #[test]
    fn restart_discards_the_previous_run() {
        let mut game = session();
        let city_position = query::city(game.world()).position;
        inject_asteroid(
            &mut game,
            AsteroidSpec {
                kind: AsteroidKind::Giant,
                position: city_position,
                velocity: Vec2::ZERO,
                size: 50.0,
                health: 6,
                damage: 20,
                points: 100,
            },
        );
        let _ = game.advance(Duration::from_millis(100));
        assert!(game.is_game_over());

        game.restart();
        assert!(!game.is_game_over());
        assert_eq!(game.score(), 0);
        assert!(query::asteroid_view(game.world()).is_empty());
    }

    #[test]
    fn defense_intercepts_a_giant_on_a_vertical_collision_course() {
        let mut game = session();
        inject_asteroid(
            &mut game,
            AsteroidSpec {
                kind: AsteroidKind::Giant,
                position: Vec2::new(400.0, 100.0),
                velocity: Vec2::new(0.0, 30.0),
                size: 50.0,
                health: 6,
                damage: 5,
                points: 100,
            },
        );
        let giant = AsteroidId::new(0);

        let mut saw_lock = false;
        let mut struck_giant = false;
        let mut city_was_hit = false;
        for _ in 0..450 {
            let events: Vec<Event> = game.advance(Duration::from_millis(17)).to_vec();
            for event in &events {
                if matches!(event, Event::ProjectileDetonated { struck: Some(id), .. } if *id == giant)
                {
                    struck_giant = true;
                }
                if matches!(event, Event::CityHit { asteroid, .. } if *asteroid == giant) {
                    city_was_hit = true;
                }
            }
            // A body this large is struck by direct overlap before the
            // terminal radius, so lock-on is the observable approach marker.
            if query::projectile_view(game.world())
                .iter()
                .any(|projectile| projectile.is_locked)
            {
                saw_lock = true;
            }
            if struck_giant && saw_lock {
                break;
            }
        }

        assert!(saw_lock, "no projectile achieved lock-on");
        assert!(struck_giant, "the giant was never hit");
        assert!(!city_was_hit, "the giant reached the city before intercept");
    }
}
