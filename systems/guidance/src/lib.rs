#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-projectile guidance: target acquisition, steering and the proximity
//! fuze.
//!
//! Every projectile decides for itself. Each tick the system scores every
//! eligible asteroid against each projectile's behavioural profile, keeps
//! the current target unless a candidate strictly beats it, and steers the
//! projectile toward a bounded intercept prediction under a hard per-tick
//! turn clamp. Deconfliction is emergent: a candidate already covered by
//! other projectiles is penalized in proportion to the profile's spread
//! factor, so low-spread profiles cluster on the worst threat while
//! high-spread profiles disperse, with no central allocator involved.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use skyfall_defence_core::{
    AsteroidId, AsteroidSnapshot, AsteroidView, CitySnapshot, Command, Event, GuidancePhase,
    Playfield, ProfileWeights, ProjectileId, ProjectileSnapshot, ProjectileView, Vec2,
};

const LAUNCH_DURATION: Duration = Duration::from_millis(150);
const TERMINAL_DISTANCE: f32 = 40.0;
const TERMINAL_SEEKING_FACTOR: f32 = 2.0;
const TERMINAL_SEEKING_CAP: f32 = 0.015;
const TERMINAL_TURN_FACTOR: f32 = 1.5;
const TERMINAL_TURN_CAP: f32 = 0.12;

const ON_SCREEN_MARGIN: f32 = 50.0;
const BELOW_FIELD_MARGIN: f32 = 25.0;
const COLLISION_BUFFER: f32 = 15.0;

const COLLISION_BASE_BONUS: f32 = 50_000.0;
const COLLISION_TIME_HORIZON_MS: f32 = 10_000.0;
const COLLISION_DAMAGE_BONUS: f32 = 1_000.0;
const COLLISION_SIZE_NORM: f32 = 35.0;
const COLLISION_SIZE_BONUS: f32 = 2_000.0;
const OVERRIDE_COLLISION_WEIGHT: f32 = 2.5;
const CITY_DIRECTION_SCALE: f32 = 1_000.0;
const CITY_APPROACH_BLEND: f32 = 0.7;
const CITY_PROXIMITY_BLEND: f32 = 0.3;
const INTERCEPT_SCALE: f32 = 500.0;
const INTERCEPT_HORIZON: f32 = 3.0;
const INTERCEPT_FLOOR: f32 = 0.1;
const PROXIMITY_SCALE: f32 = 300.0;
const ALIGNMENT_SCALE: f32 = 200.0;
const THREAT_RANGE: f32 = 500.0;
const THREAT_RANGE_SCALE: f32 = 40.0;
const THREAT_SPEED_NORM: f32 = 100.0;
const THREAT_SPEED_SCALE: f32 = 30.0;
const THREAT_SIZE_NORM: f32 = 50.0;
const THREAT_SIZE_SCALE: f32 = 20.0;
const THREAT_DAMAGE_SCALE: f32 = 10.0;
const TIE_BREAK_MODULUS: f32 = 100.0;
const TIE_BREAK_SCALE: f32 = 10.0;
const TIE_BREAK_SPREAD_THRESHOLD: f32 = 1.5;

const PREDICTION_LEAD_CAP: f32 = 1.0;
const BASELINE_TICK_MS: f32 = 16.67;

const LOCK_RANGE_FACTOR: f32 = 0.7;
const LOCK_ALIGNMENT: f32 = 0.8;

/// Pure system that emits target, steering and detonation commands for
/// every live projectile.
#[derive(Debug, Default)]
pub struct Guidance {
    ages: HashMap<ProjectileId, Duration>,
    target_counts: HashMap<AsteroidId, u32>,
    live_scratch: HashSet<ProjectileId>,
}

impl Guidance {
    /// Creates a new guidance system with empty per-projectile history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes events and immutable views to emit guidance commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        asteroids: &AsteroidView,
        projectiles: &ProjectileView,
        city: &CitySnapshot,
        playfield: Playfield,
        out: &mut Vec<Command>,
    ) {
        let mut dt = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt: advanced } = event {
                dt = dt.saturating_add(*advanced);
            }
        }
        if dt.is_zero() {
            return;
        }

        self.live_scratch.clear();
        for projectile in projectiles.iter() {
            let _ = self.live_scratch.insert(projectile.id);
        }
        let live = std::mem::take(&mut self.live_scratch);
        self.ages.retain(|id, _| live.contains(id));
        self.live_scratch = live;

        self.target_counts.clear();
        for projectile in projectiles.iter() {
            if let Some(target) = projectile.target {
                *self.target_counts.entry(target).or_insert(0) += 1;
            }
        }

        for projectile in projectiles.iter() {
            let age = {
                let entry = self.ages.entry(projectile.id).or_insert(Duration::ZERO);
                *entry = entry.saturating_add(dt);
                *entry
            };
            self.guide_one(projectile, age, dt, asteroids, city, playfield, out);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn guide_one(
        &self,
        projectile: &ProjectileSnapshot,
        age: Duration,
        dt: Duration,
        asteroids: &AsteroidView,
        city: &CitySnapshot,
        playfield: Playfield,
        out: &mut Vec<Command>,
    ) {
        let current = projectile
            .target
            .and_then(|id| asteroids.get(id))
            .filter(|target| target_is_valid(target, playfield));
        let chosen = self.acquire(projectile, current, asteroids, city, playfield);

        let chosen_id = chosen.map(|target| target.id);
        if chosen_id != projectile.target {
            out.push(Command::AssignTarget {
                projectile: projectile.id,
                target: chosen_id,
            });
        }

        // The fuze is live in every phase, launch included.
        if let Some(target) = chosen {
            if projectile.position.distance_to(target.position) <= projectile.proximity_detonation {
                out.push(Command::DetonateProjectile {
                    projectile: projectile.id,
                });
                return;
            }
        }

        let mut phase = projectile.phase;
        if phase == GuidancePhase::Launch && age >= LAUNCH_DURATION {
            phase = GuidancePhase::Seeking;
        }
        if phase == GuidancePhase::Launch {
            return;
        }

        let mut velocity = projectile.velocity;
        let mut locked = false;
        if let Some(target) = chosen {
            let distance = projectile.position.distance_to(target.position);
            if distance <= TERMINAL_DISTANCE {
                phase = GuidancePhase::Terminal;
            }
            velocity = steer(projectile, target, phase, dt);
            let to_target = (target.position - projectile.position).normalized();
            locked = distance <= projectile.lock_on_distance * LOCK_RANGE_FACTOR
                && projectile.velocity.normalized().dot(to_target) >= LOCK_ALIGNMENT;
        }

        out.push(Command::SteerProjectile {
            projectile: projectile.id,
            velocity,
            phase,
            locked,
        });
    }

    /// Keeps the current target unless a candidate strictly beats its score.
    fn acquire<'a>(
        &self,
        projectile: &ProjectileSnapshot,
        current: Option<&'a AsteroidSnapshot>,
        asteroids: &'a AsteroidView,
        city: &CitySnapshot,
        playfield: Playfield,
    ) -> Option<&'a AsteroidSnapshot> {
        let weights = projectile.profile.weights();
        let mut best = current.map(|target| {
            (
                target,
                self.score_candidate(projectile, &weights, target, city, playfield),
            )
        });
        for candidate in asteroids.iter() {
            if Some(candidate.id) == current.map(|target| target.id) {
                continue;
            }
            if !target_is_valid(candidate, playfield)
                || !playfield.contains_with_margin(candidate.position, ON_SCREEN_MARGIN)
            {
                continue;
            }
            let score = self.score_candidate(projectile, &weights, candidate, city, playfield);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((candidate, score));
            }
        }
        best.map(|(target, _)| target)
    }

    fn score_candidate(
        &self,
        projectile: &ProjectileSnapshot,
        weights: &ProfileWeights,
        candidate: &AsteroidSnapshot,
        city: &CitySnapshot,
        playfield: Playfield,
    ) -> f32 {
        let collision = collision_course(candidate, city);
        let mut score = 0.0;
        if let Some(course) = collision {
            let impact_ms = course.time_to_impact * 1000.0;
            let time_bonus = (COLLISION_TIME_HORIZON_MS - impact_ms).max(0.0);
            let damage_bonus = candidate.damage as f32 * COLLISION_DAMAGE_BONUS;
            let size_bonus = candidate.size / COLLISION_SIZE_NORM * COLLISION_SIZE_BONUS;
            score = (COLLISION_BASE_BONUS + time_bonus + damage_bonus + size_bonus)
                * weights.collision_threat;
        }

        // Profiles with a dominant collision weight commit to a confirmed
        // collision course and skip the secondary terms.
        if collision.is_none() || weights.collision_threat < OVERRIDE_COLLISION_WEIGHT {
            let distance = projectile.position.distance_to(candidate.position);

            let to_city = city.position - candidate.position;
            let distance_to_city = to_city.magnitude();
            let city_factor = if distance_to_city <= f32::EPSILON {
                1.0
            } else {
                let approach = candidate.velocity.normalized().dot(to_city.normalized());
                if approach > 0.0 {
                    let diagonal = playfield.width().hypot(playfield.height());
                    approach * CITY_APPROACH_BLEND
                        + (1.0 - distance_to_city / diagonal).max(0.0) * CITY_PROXIMITY_BLEND
                } else {
                    0.0
                }
            };
            score += city_factor * CITY_DIRECTION_SCALE * weights.city_proximity;

            let closing_speed = projectile.speed - candidate.velocity.magnitude();
            let feasibility = if closing_speed <= 0.0 {
                INTERCEPT_FLOOR
            } else {
                ((INTERCEPT_HORIZON - distance / closing_speed) / INTERCEPT_HORIZON)
                    .clamp(0.0, 1.0)
            };
            score += feasibility * INTERCEPT_SCALE * weights.intercept;

            score += ((projectile.lock_on_distance - distance) / projectile.lock_on_distance)
                .max(0.0)
                * PROXIMITY_SCALE
                * weights.distance;

            let to_candidate = (candidate.position - projectile.position).normalized();
            let alignment = projectile.velocity.normalized().dot(to_candidate).max(0.0);
            score += alignment * ALIGNMENT_SCALE * weights.alignment;

            let range_pressure =
                ((THREAT_RANGE - distance) / THREAT_RANGE).max(0.0) * THREAT_RANGE_SCALE;
            let speed_pressure =
                candidate.velocity.magnitude() / THREAT_SPEED_NORM * THREAT_SPEED_SCALE;
            let size_pressure = candidate.size / THREAT_SIZE_NORM * THREAT_SIZE_SCALE;
            let damage_pressure = candidate.damage as f32 * THREAT_DAMAGE_SCALE;
            score += (range_pressure + speed_pressure + size_pressure + damage_pressure)
                * weights.general_threat;
        }

        let others = self.other_pursuers(projectile, candidate.id);
        score *= deconfliction_penalty(others, weights.spread_factor);

        if weights.spread_factor >= TIE_BREAK_SPREAD_THRESHOLD {
            score += tie_break(projectile.id, candidate.position);
        }
        score
    }

    fn other_pursuers(&self, projectile: &ProjectileSnapshot, candidate: AsteroidId) -> u32 {
        let total = self.target_counts.get(&candidate).copied().unwrap_or(0);
        if projectile.target == Some(candidate) {
            total.saturating_sub(1)
        } else {
            total
        }
    }
}

/// Outcome of projecting an asteroid's straight-line path down to the
/// city's vertical level.
#[derive(Clone, Copy, Debug, PartialEq)]
struct CollisionCourse {
    time_to_impact: f32,
}

/// Reports a genuine collision course, or `None` for asteroids moving away
/// from or parallel to the city.
fn collision_course(asteroid: &AsteroidSnapshot, city: &CitySnapshot) -> Option<CollisionCourse> {
    if asteroid.velocity.y <= 0.0 {
        return None;
    }
    let time_to_impact = (city.position.y - asteroid.position.y) / asteroid.velocity.y;
    if time_to_impact <= 0.0 {
        return None;
    }
    let lateral =
        (asteroid.position.x + asteroid.velocity.x * time_to_impact - city.position.x).abs();
    if lateral <= city.size + asteroid.size + COLLISION_BUFFER {
        Some(CollisionCourse { time_to_impact })
    } else {
        None
    }
}

fn deconfliction_penalty(others: u32, spread_factor: f32) -> f32 {
    1.0 / (1.0 + others as f32 * spread_factor)
}

/// Deterministic per-projectile jitter used to break score ties in
/// high-spread profiles without shared random state.
fn tie_break(projectile: ProjectileId, target_position: Vec2) -> f32 {
    (projectile.get() as f32 * 17.0 + target_position.x * 13.0).rem_euclid(TIE_BREAK_MODULUS)
        * TIE_BREAK_SCALE
}

fn target_is_valid(target: &AsteroidSnapshot, playfield: Playfield) -> bool {
    target.position.y <= playfield.height() + BELOW_FIELD_MARGIN
}

/// Applies the bounded-lead guidance law and the per-tick turn clamp,
/// returning the projectile's new velocity.
fn steer(
    projectile: &ProjectileSnapshot,
    target: &AsteroidSnapshot,
    phase: GuidancePhase,
    dt: Duration,
) -> Vec2 {
    let (seeking_power, max_turn_rate) = if phase == GuidancePhase::Terminal {
        (
            (projectile.seeking_power * TERMINAL_SEEKING_FACTOR).min(TERMINAL_SEEKING_CAP),
            (projectile.max_turn_rate * TERMINAL_TURN_FACTOR).min(TERMINAL_TURN_CAP),
        )
    } else {
        (projectile.seeking_power, projectile.max_turn_rate)
    };

    let distance = projectile.position.distance_to(target.position);
    let lead = (distance / projectile.speed * projectile.prediction_time).min(PREDICTION_LEAD_CAP);
    let predicted = target.position + target.velocity * lead;

    let desired = (predicted - projectile.position).normalized() * projectile.speed;
    let raw = projectile.velocity + (desired - projectile.velocity) * seeking_power;

    let current_dir = projectile.velocity.normalized();
    let raw_dir = raw.normalized();
    if current_dir == Vec2::ZERO || raw_dir == Vec2::ZERO {
        return projectile.velocity;
    }

    let angle = current_dir.dot(raw_dir).clamp(-1.0, 1.0).acos();
    let turn_budget = max_turn_rate * (dt.as_secs_f32() * 1000.0 / BASELINE_TICK_MS);
    let applied = angle.min(turn_budget);
    let direction = if current_dir.cross(raw_dir) >= 0.0 {
        1.0
    } else {
        -1.0
    };
    projectile.velocity.rotated(direction * applied)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use skyfall_defence_core::{
        AsteroidId, AsteroidKind, AsteroidSnapshot, AsteroidView, CitySnapshot, Command, Event,
        GuidancePhase, GuidanceProfile, Playfield, ProjectileId, ProjectileSnapshot,
        ProjectileView, UpgradeLevels, Vec2,
    };

    use crate::{collision_course, deconfliction_penalty, Guidance};

    const FIELD: Playfield = Playfield::new(800.0, 600.0);

    fn city() -> CitySnapshot {
        CitySnapshot {
            position: Vec2::new(400.0, 540.0),
            size: 40.0,
            health: 10,
            max_health: 10,
            shield_health: 5.0,
            max_shield_health: 5.0,
            is_destroyed: false,
            fire_cooldown: Duration::ZERO,
            base_fire_interval: Duration::from_millis(800),
            projectile_damage: 1,
            projectile_speed: 200.0,
            upgrades: UpgradeLevels::default(),
        }
    }

    fn asteroid(id: u32, position: Vec2, velocity: Vec2) -> AsteroidSnapshot {
        AsteroidSnapshot {
            id: AsteroidId::new(id),
            kind: AsteroidKind::Medium,
            position,
            velocity,
            size: 18.0,
            health: 2,
            max_health: 2,
            damage: 2,
            points: 20,
        }
    }

    fn projectile(
        id: u32,
        position: Vec2,
        velocity: Vec2,
        target: Option<AsteroidId>,
        phase: GuidancePhase,
    ) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: ProjectileId::new(id),
            profile: GuidanceProfile::Guardian,
            position,
            velocity,
            target,
            phase,
            life: Duration::from_millis(4000),
            speed: 200.0,
            size: 3.0,
            damage: 1,
            seeking_power: 0.015,
            max_turn_rate: 0.11,
            prediction_time: 1.1,
            lock_on_distance: 500.0,
            proximity_detonation: 20.0,
            is_locked: false,
        }
    }

    fn advance(ms: u64) -> Vec<Event> {
        vec![Event::TimeAdvanced {
            dt: Duration::from_millis(ms),
        }]
    }

    #[test]
    fn collision_course_requires_downward_convergence() {
        let target = city();
        let falling = asteroid(0, Vec2::new(400.0, 100.0), Vec2::new(0.0, 40.0));
        assert!(collision_course(&falling, &target).is_some());

        let rising = asteroid(1, Vec2::new(400.0, 100.0), Vec2::new(0.0, -40.0));
        assert!(collision_course(&rising, &target).is_none());

        let wide = asteroid(2, Vec2::new(50.0, 100.0), Vec2::new(0.0, 40.0));
        assert!(collision_course(&wide, &target).is_none());
    }

    #[test]
    fn sideways_drift_onto_the_city_still_counts_as_a_collision_course() {
        let target = city();
        // Drifts from the left edge onto the city by the time it descends.
        let drifting = asteroid(0, Vec2::new(100.0, 140.0), Vec2::new(30.0, 40.0));
        assert!(collision_course(&drifting, &target).is_some());
    }

    #[test]
    fn deconfliction_strictly_reduces_contested_scores() {
        let alone = deconfliction_penalty(0, 1.6);
        let contested = deconfliction_penalty(1, 1.6);
        let crowded = deconfliction_penalty(3, 1.6);
        assert!((alone - 1.0).abs() < f32::EPSILON);
        assert!(contested < alone);
        assert!(crowded < contested);
    }

    #[test]
    fn launch_phase_acquires_a_target_but_does_not_steer() {
        let mut guidance = Guidance::new();
        let asteroids =
            AsteroidView::from_snapshots(vec![asteroid(0, Vec2::new(400.0, 100.0), Vec2::new(0.0, 40.0))]);
        let projectiles = ProjectileView::from_snapshots(vec![projectile(
            0,
            Vec2::new(400.0, 540.0),
            Vec2::new(0.0, -200.0),
            None,
            GuidancePhase::Launch,
        )]);
        let mut out = Vec::new();
        guidance.handle(&advance(16), &asteroids, &projectiles, &city(), FIELD, &mut out);

        assert!(out.iter().any(|command| matches!(
            command,
            Command::AssignTarget {
                target: Some(id),
                ..
            } if *id == AsteroidId::new(0)
        )));
        assert!(!out
            .iter()
            .any(|command| matches!(command, Command::SteerProjectile { .. })));
    }

    #[test]
    fn seeking_begins_once_the_launch_window_elapses() {
        let mut guidance = Guidance::new();
        let asteroids =
            AsteroidView::from_snapshots(vec![asteroid(0, Vec2::new(400.0, 100.0), Vec2::new(0.0, 40.0))]);
        let projectiles = ProjectileView::from_snapshots(vec![projectile(
            0,
            Vec2::new(400.0, 500.0),
            Vec2::new(0.0, -200.0),
            Some(AsteroidId::new(0)),
            GuidancePhase::Launch,
        )]);

        let mut out = Vec::new();
        for _ in 0..12 {
            out.clear();
            guidance.handle(&advance(16), &asteroids, &projectiles, &city(), FIELD, &mut out);
        }
        assert!(out.iter().any(|command| matches!(
            command,
            Command::SteerProjectile {
                phase: GuidancePhase::Seeking,
                ..
            }
        )));
    }

    #[test]
    fn terminal_phase_is_entered_inside_the_terminal_radius() {
        let mut guidance = Guidance::new();
        // 35 units out: inside the 40-unit terminal radius, outside the fuze.
        let asteroids =
            AsteroidView::from_snapshots(vec![asteroid(0, Vec2::new(400.0, 265.0), Vec2::new(0.0, 40.0))]);
        let projectiles = ProjectileView::from_snapshots(vec![projectile(
            0,
            Vec2::new(400.0, 300.0),
            Vec2::new(0.0, -200.0),
            Some(AsteroidId::new(0)),
            GuidancePhase::Seeking,
        )]);
        let mut out = Vec::new();
        guidance.handle(&advance(16), &asteroids, &projectiles, &city(), FIELD, &mut out);

        assert!(out.iter().any(|command| matches!(
            command,
            Command::SteerProjectile {
                phase: GuidancePhase::Terminal,
                ..
            }
        )));
    }

    #[test]
    fn steering_respects_the_per_tick_turn_clamp() {
        let mut guidance = Guidance::new();
        let asteroids =
            AsteroidView::from_snapshots(vec![asteroid(0, Vec2::new(700.0, 380.0), Vec2::new(0.0, 5.0))]);
        let projectiles = ProjectileView::from_snapshots(vec![projectile(
            0,
            Vec2::new(400.0, 400.0),
            Vec2::new(0.0, -200.0),
            Some(AsteroidId::new(0)),
            GuidancePhase::Seeking,
        )]);
        let mut out = Vec::new();
        guidance.handle(&advance(16), &asteroids, &projectiles, &city(), FIELD, &mut out);

        let velocity = out
            .iter()
            .find_map(|command| match command {
                Command::SteerProjectile { velocity, .. } => Some(*velocity),
                _ => None,
            })
            .expect("steering command emitted");
        assert!((velocity.magnitude() - 200.0).abs() < 0.1);

        let old_dir = Vec2::new(0.0, -1.0);
        let turned = old_dir.dot(velocity.normalized()).clamp(-1.0, 1.0).acos();
        let budget = 0.11 * (16.0 / 16.67) + 1e-4;
        assert!(turned > 0.0);
        assert!(turned <= budget);
    }

    #[test]
    fn proximity_fuze_emits_a_detonation_command() {
        let mut guidance = Guidance::new();
        let asteroids =
            AsteroidView::from_snapshots(vec![asteroid(0, Vec2::new(400.0, 285.0), Vec2::new(0.0, 40.0))]);
        let projectiles = ProjectileView::from_snapshots(vec![projectile(
            0,
            Vec2::new(400.0, 300.0),
            Vec2::new(0.0, -200.0),
            Some(AsteroidId::new(0)),
            GuidancePhase::Terminal,
        )]);
        let mut out = Vec::new();
        guidance.handle(&advance(16), &asteroids, &projectiles, &city(), FIELD, &mut out);

        assert!(out.iter().any(|command| matches!(
            command,
            Command::DetonateProjectile { .. }
        )));
        assert!(!out
            .iter()
            .any(|command| matches!(command, Command::SteerProjectile { .. })));
    }

    #[test]
    fn proximity_fuze_is_live_during_the_launch_window() {
        let mut guidance = Guidance::new();
        let asteroids =
            AsteroidView::from_snapshots(vec![asteroid(0, Vec2::new(400.0, 528.0), Vec2::new(0.0, 40.0))]);
        let projectiles = ProjectileView::from_snapshots(vec![projectile(
            0,
            Vec2::new(400.0, 540.0),
            Vec2::new(0.0, -200.0),
            Some(AsteroidId::new(0)),
            GuidancePhase::Launch,
        )]);
        let mut out = Vec::new();
        guidance.handle(&advance(16), &asteroids, &projectiles, &city(), FIELD, &mut out);

        assert!(out.iter().any(|command| matches!(
            command,
            Command::DetonateProjectile { .. }
        )));
        assert!(!out
            .iter()
            .any(|command| matches!(command, Command::SteerProjectile { .. })));
    }

    #[test]
    fn tie_break_jitter_is_deterministic_and_bounded() {
        let position = Vec2::new(123.0, 456.0);
        let first = crate::tie_break(ProjectileId::new(3), position);
        let second = crate::tie_break(ProjectileId::new(3), position);
        assert_eq!(first, second);
        // (3 * 17 + 123 * 13) % 100 = 50, scaled by 10.
        assert!((first - 500.0).abs() < f32::EPSILON);
        for raw in 0..20 {
            let jitter = crate::tie_break(ProjectileId::new(raw), position);
            assert!((0.0..1000.0).contains(&jitter));
        }
    }

    #[test]
    fn lock_on_requires_range_and_alignment() {
        let mut guidance = Guidance::new();
        let asteroids =
            AsteroidView::from_snapshots(vec![asteroid(0, Vec2::new(400.0, 200.0), Vec2::new(0.0, 10.0))]);
        // Directly ahead and inside 70% of lock-on range.
        let projectiles = ProjectileView::from_snapshots(vec![projectile(
            0,
            Vec2::new(400.0, 500.0),
            Vec2::new(0.0, -200.0),
            Some(AsteroidId::new(0)),
            GuidancePhase::Seeking,
        )]);
        let mut out = Vec::new();
        guidance.handle(&advance(16), &asteroids, &projectiles, &city(), FIELD, &mut out);

        assert!(out.iter().any(|command| matches!(
            command,
            Command::SteerProjectile { locked: true, .. }
        )));
    }

    #[test]
    fn acquisition_prefers_the_collision_course_threat() {
        let mut guidance = Guidance::new();
        let asteroids = AsteroidView::from_snapshots(vec![
            // Harmless drift across the top of the field.
            asteroid(0, Vec2::new(100.0, 80.0), Vec2::new(25.0, -2.0)),
            // Falling straight onto the city.
            asteroid(1, Vec2::new(400.0, 120.0), Vec2::new(0.0, 45.0)),
        ]);
        let projectiles = ProjectileView::from_snapshots(vec![projectile(
            0,
            Vec2::new(400.0, 540.0),
            Vec2::new(0.0, -200.0),
            None,
            GuidancePhase::Launch,
        )]);
        let mut out = Vec::new();
        guidance.handle(&advance(16), &asteroids, &projectiles, &city(), FIELD, &mut out);

        assert!(out.iter().any(|command| matches!(
            command,
            Command::AssignTarget {
                target: Some(id),
                ..
            } if *id == AsteroidId::new(1)
        )));
    }

    #[test]
    fn deconfliction_splits_projectiles_across_equivalent_threats() {
        let mut guidance = Guidance::new();
        // Two symmetric collision-course threats either side of the city.
        let asteroids = AsteroidView::from_snapshots(vec![
            asteroid(0, Vec2::new(360.0, 100.0), Vec2::new(0.0, 40.0)),
            asteroid(1, Vec2::new(440.0, 100.0), Vec2::new(0.0, 40.0)),
        ]);
        let mut covered = projectile(
            6,
            Vec2::new(400.0, 500.0),
            Vec2::new(0.0, -200.0),
            Some(AsteroidId::new(0)),
            GuidancePhase::Seeking,
        );
        covered.profile = GuidanceProfile::Strategic;
        let mut newcomer = projectile(
            16,
            Vec2::new(400.0, 500.0),
            Vec2::new(0.0, -200.0),
            None,
            GuidancePhase::Seeking,
        );
        newcomer.profile = GuidanceProfile::Strategic;
        let projectiles = ProjectileView::from_snapshots(vec![covered, newcomer]);

        let mut out = Vec::new();
        guidance.handle(&advance(16), &asteroids, &projectiles, &city(), FIELD, &mut out);

        // The uncommitted projectile avoids the already-covered threat.
        assert!(out.iter().any(|command| matches!(
            command,
            Command::AssignTarget {
                projectile,
                target: Some(id),
            } if *projectile == ProjectileId::new(16) && *id == AsteroidId::new(1)
        )));
    }

    #[test]
    fn a_reasonable_target_is_not_churned() {
        let mut guidance = Guidance::new();
        let asteroids = AsteroidView::from_snapshots(vec![
            asteroid(0, Vec2::new(400.0, 120.0), Vec2::new(0.0, 45.0)),
            asteroid(1, Vec2::new(150.0, 90.0), Vec2::new(20.0, -3.0)),
        ]);
        let projectiles = ProjectileView::from_snapshots(vec![projectile(
            0,
            Vec2::new(400.0, 500.0),
            Vec2::new(0.0, -200.0),
            Some(AsteroidId::new(0)),
            GuidancePhase::Seeking,
        )]);
        let mut out = Vec::new();
        guidance.handle(&advance(16), &asteroids, &projectiles, &city(), FIELD, &mut out);

        assert!(!out
            .iter()
            .any(|command| matches!(command, Command::AssignTarget { .. })));
    }

    #[test]
    fn a_vanished_target_is_cleared_when_nothing_else_is_eligible() {
        let mut guidance = Guidance::new();
        let asteroids = AsteroidView::from_snapshots(vec![]);
        let projectiles = ProjectileView::from_snapshots(vec![projectile(
            0,
            Vec2::new(400.0, 500.0),
            Vec2::new(0.0, -200.0),
            Some(AsteroidId::new(9)),
            GuidancePhase::Seeking,
        )]);
        let mut out = Vec::new();
        guidance.handle(&advance(16), &asteroids, &projectiles, &city(), FIELD, &mut out);

        assert!(out.iter().any(|command| matches!(
            command,
            Command::AssignTarget { target: None, .. }
        )));
    }
}
