#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides when the city defense fires and where the
//! volley is pointed.
//!
//! Fire control keeps a single coarse threat pick, refreshed on a fixed
//! cadence, and launches a volley whenever the defense cooldown has
//! recharged. Fine-grained per-projectile targeting happens later in the
//! guidance system; the coarse pick only shapes the launch heading.

use std::time::Duration;

use skyfall_defence_core::{
    AsteroidId, AsteroidSnapshot, AsteroidView, CitySnapshot, Command, Event, Playfield, Vec2,
};

const RETARGET_INTERVAL: Duration = Duration::from_millis(100);
const ON_SCREEN_MARGIN: f32 = 50.0;

const DISTANCE_WEIGHT: f32 = 0.5;
const SPEED_WEIGHT: f32 = 0.3;
const DAMAGE_WEIGHT: f32 = 0.2;
const DISTANCE_HORIZON: f32 = 1000.0;
const SPEED_NORMALIZER: f32 = 100.0;
const DAMAGE_NORMALIZER: f32 = 5.0;

const FIRE_RATE_STEP: f32 = 0.15;
const FIRE_RATE_FLOOR: f32 = 0.2;
const VOLLEY_SPREAD: f32 = std::f32::consts::PI / 12.0;

/// Pure system that emits [`Command::FireProjectile`] volleys.
#[derive(Debug, Default)]
pub struct FireControl {
    retarget_accumulator: Duration,
    coarse_target: Option<AsteroidId>,
}

impl FireControl {
    /// Creates a new fire control system with no target history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes events and immutable views to emit firing commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        asteroids: &AsteroidView,
        city: &CitySnapshot,
        playfield: Playfield,
        out: &mut Vec<Command>,
    ) {
        if city.is_destroyed {
            self.coarse_target = None;
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }
        self.retarget_accumulator = self.retarget_accumulator.saturating_add(accumulated);

        let due = self.retarget_accumulator >= RETARGET_INTERVAL;
        let stale = self
            .coarse_target
            .map_or(true, |id| asteroids.get(id).is_none());
        if due || stale {
            self.coarse_target = select_target(asteroids, city, playfield);
            if due {
                self.retarget_accumulator = Duration::ZERO;
            }
        }

        if self.coarse_target.is_none() || city.fire_cooldown < effective_interval(city) {
            return;
        }

        // Volleys launch straight up with a symmetric fan; projectiles run
        // their own acquisition, so the coarse pick only gates the trigger.
        let heading = Vec2::new(0.0, -1.0);
        let volley = 1 + city.upgrades.multi_shot;
        let damage = city.projectile_damage + city.upgrades.damage;
        for shot in 0..volley {
            let offset = if volley > 1 {
                let step = VOLLEY_SPREAD / (volley - 1) as f32;
                (shot as f32 - (volley - 1) as f32 / 2.0) * step
            } else {
                0.0
            };
            out.push(Command::FireProjectile {
                heading: heading.rotated(offset),
                damage,
            });
        }
    }
}

/// Coarse composite threat used only to gate and aim the launcher; nearer,
/// faster and heavier asteroids score higher.
fn threat_score(asteroid: &AsteroidSnapshot, city: &CitySnapshot) -> f32 {
    let distance = asteroid.position.distance_to(city.position);
    DISTANCE_WEIGHT * ((DISTANCE_HORIZON - distance).max(0.0) / DISTANCE_HORIZON)
        + SPEED_WEIGHT * (asteroid.velocity.magnitude() / SPEED_NORMALIZER)
        + DAMAGE_WEIGHT * (asteroid.damage as f32 / DAMAGE_NORMALIZER)
}

fn select_target(
    asteroids: &AsteroidView,
    city: &CitySnapshot,
    playfield: Playfield,
) -> Option<AsteroidId> {
    let mut best: Option<(AsteroidId, f32)> = None;
    for asteroid in asteroids.iter() {
        if !playfield.contains_with_margin(asteroid.position, ON_SCREEN_MARGIN) {
            continue;
        }
        let score = threat_score(asteroid, city);
        // Strict improvement keeps the lowest id on ties; the view iterates
        // in id order.
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((asteroid.id, score));
        }
    }
    best.map(|(id, _)| id)
}

fn effective_interval(city: &CitySnapshot) -> Duration {
    let factor = (1.0 - FIRE_RATE_STEP * city.upgrades.fire_rate as f32).max(FIRE_RATE_FLOOR);
    city.base_fire_interval.mul_f32(factor)
}
