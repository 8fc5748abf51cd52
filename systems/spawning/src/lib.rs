#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting asteroid spawn
//! commands.
//!
//! The spawner owns all random state used for spawns: the weighted kind
//! draw, stat jitter and entry trajectory. It resolves every roll into a
//! fully-specified [`AsteroidSpec`] so the world applies spawns without
//! consuming randomness of its own.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use skyfall_defence_core::{
    AsteroidKind, AsteroidSpec, Command, DifficultyScaling, Event, Playfield, Vec2,
};

const BASE_SPAWN_INTERVAL_MS: f32 = 2000.0;
const MIN_SPAWN_INTERVAL_MS: f32 = 500.0;
const SPEED_UP_SCORE_DIVISOR: f32 = 200.0;
const SPEED_UP_CAP: f32 = 3.0;

const DRIFT_LIMIT: f32 = 15.0;
const STAT_JITTER: (f32, f32) = (0.8, 1.2);
const CHAOS_CHANCE: f64 = 0.1;
const CHAOS_ROTATION: f32 = 0.3;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that deterministically emits asteroid spawn commands.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
    accumulator: Duration,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            accumulator: Duration::ZERO,
        }
    }

    /// Consumes events and immutable context to emit spawn commands.
    ///
    /// The spawn cadence tightens as `score` rises, down to a fixed floor.
    pub fn handle(
        &mut self,
        events: &[Event],
        playfield: Playfield,
        score: u32,
        out: &mut Vec<Command>,
    ) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }
        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        let interval = spawn_interval(score);
        while self.accumulator >= interval {
            self.accumulator -= interval;
            let spec = self.draw(playfield, score);
            out.push(Command::SpawnAsteroid { spec });
        }
    }

    fn draw(&mut self, playfield: Playfield, score: u32) -> AsteroidSpec {
        let kind = self.draw_kind();
        let stats = kind.base_stats();
        let scaling = DifficultyScaling::for_score(score);

        let size = self.rng.gen_range(stats.size_range.0..=stats.size_range.1);
        let entry_x = if playfield.width() > size * 2.0 {
            self.rng.gen_range(size..=(playfield.width() - size))
        } else {
            playfield.width() * 0.5
        };
        let speed_jitter = self.rng.gen_range(STAT_JITTER.0..=STAT_JITTER.1);
        let fall_speed = self.rng.gen_range(stats.speed_range.0..=stats.speed_range.1)
            * speed_jitter
            * scaling.speed_scale;
        let drift = self.rng.gen_range(-DRIFT_LIMIT..=DRIFT_LIMIT);
        let damage_jitter = self.rng.gen_range(STAT_JITTER.0..=STAT_JITTER.1);

        let health = (((stats.health as f32) * scaling.health_scale).floor() as u32).max(1);
        // Jitter and difficulty scaling floor separately.
        let jittered = (((stats.damage as f32) * damage_jitter).floor() as u32).max(1);
        let damage = (((jittered as f32) * scaling.damage_scale).floor() as u32).max(1);

        let mut velocity = Vec2::new(drift, fall_speed);
        // Occasional chaotic entry angle.
        if self.rng.gen_bool(CHAOS_CHANCE) {
            velocity = velocity.rotated(self.rng.gen_range(-CHAOS_ROTATION..=CHAOS_ROTATION));
        }

        AsteroidSpec {
            kind,
            // Entry point sits just above the visible field so the asteroid
            // falls into view.
            position: Vec2::new(entry_x, -size),
            velocity,
            size,
            health,
            damage,
            points: stats.points,
        }
    }

    fn draw_kind(&mut self) -> AsteroidKind {
        let total: u32 = AsteroidKind::ALL
            .iter()
            .map(|kind| kind.spawn_weight())
            .sum();
        let mut pick = self.rng.gen_range(0..total);
        for kind in AsteroidKind::ALL {
            let weight = kind.spawn_weight();
            if pick < weight {
                return kind;
            }
            pick -= weight;
        }
        AsteroidKind::Small
    }
}

/// Spawn cadence shrinks hyperbolically with score, saturating at a
/// quarter of the base interval.
fn spawn_interval(score: u32) -> Duration {
    let speed_up = (score as f32 / SPEED_UP_SCORE_DIVISOR).min(SPEED_UP_CAP);
    let interval_ms = (BASE_SPAWN_INTERVAL_MS / (1.0 + speed_up)).max(MIN_SPAWN_INTERVAL_MS);
    Duration::from_secs_f32(interval_ms / 1000.0)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use skyfall_defence_core::{AsteroidKind, Command, Event, Playfield};

    use crate::{spawn_interval, Config, Spawning};

    const FIELD: Playfield = Playfield::new(800.0, 600.0);

    fn advance(ms: u64) -> Vec<Event> {
        vec![Event::TimeAdvanced {
            dt: Duration::from_millis(ms),
        }]
    }

    #[test]
    fn cadence_tightens_with_score_down_to_the_floor() {
        assert_eq!(spawn_interval(0), Duration::from_millis(2000));
        assert_eq!(spawn_interval(200), Duration::from_millis(1000));
        assert_eq!(spawn_interval(600), Duration::from_millis(500));
        // The speed-up factor saturates, so the floor holds from there on.
        assert_eq!(spawn_interval(50_000), Duration::from_millis(500));
    }

    #[test]
    fn identical_seeds_produce_identical_spawn_streams() {
        let mut left = Spawning::new(Config::new(7));
        let mut right = Spawning::new(Config::new(7));
        let mut left_out = Vec::new();
        let mut right_out = Vec::new();
        for _ in 0..8 {
            left.handle(&advance(2000), FIELD, 0, &mut left_out);
            right.handle(&advance(2000), FIELD, 0, &mut right_out);
        }
        assert!(!left_out.is_empty());
        assert_eq!(left_out, right_out);
    }

    #[test]
    fn no_spawn_before_the_interval_elapses() {
        let mut spawning = Spawning::new(Config::new(1));
        let mut out = Vec::new();
        spawning.handle(&advance(1999), FIELD, 0, &mut out);
        assert!(out.is_empty());
        spawning.handle(&advance(1), FIELD, 0, &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn spawns_enter_above_the_field_within_horizontal_bounds() {
        let mut spawning = Spawning::new(Config::new(11));
        let mut out = Vec::new();
        for _ in 0..50 {
            spawning.handle(&advance(2000), FIELD, 0, &mut out);
        }
        for command in &out {
            let Command::SpawnAsteroid { spec } = command else {
                panic!("unexpected command");
            };
            assert!(spec.position.y < 0.0);
            assert!(spec.position.x >= spec.size);
            assert!(spec.position.x <= FIELD.width() - spec.size);
            assert!(spec.velocity.y > 0.0);
            assert!(spec.health >= 1);
            assert!(spec.damage >= 1);
        }
    }

    #[test]
    fn spawn_rolls_cover_the_jittered_envelope() {
        let mut spawning = Spawning::new(Config::new(9));
        let mut out = Vec::new();
        for _ in 0..1000 {
            spawning.handle(&advance(2000), FIELD, 0, &mut out);
        }
        // At score zero a Small's fall speed tops out at 50 · 0.7 = 35
        // before jitter; with maximum drift that bounds the unjittered
        // magnitude at 38.1, so anything past it took the speed roll.
        assert!(out.iter().any(|command| matches!(
            command,
            Command::SpawnAsteroid { spec }
                if spec.kind == AsteroidKind::Small && spec.velocity.magnitude() > 38.5
        )));
        assert!(out.iter().any(|command| matches!(
            command,
            Command::SpawnAsteroid { spec } if spec.velocity.x.abs() > 10.0
        )));
    }

    #[test]
    fn every_kind_eventually_appears_in_the_roulette() {
        let mut spawning = Spawning::new(Config::new(3));
        let mut out = Vec::new();
        for _ in 0..400 {
            spawning.handle(&advance(2000), FIELD, 0, &mut out);
        }
        for kind in AsteroidKind::ALL {
            assert!(
                out.iter().any(|command| matches!(
                    command,
                    Command::SpawnAsteroid { spec } if spec.kind == kind
                )),
                "kind {kind:?} never drawn",
            );
        }
    }
}
