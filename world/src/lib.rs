#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Skyfall Defence.
//!
//! The world owns every mutable gameplay entity: the defended city, live
//! asteroids, in-flight projectiles and cosmetic particles. All mutation
//! flows through [`apply`]; systems observe the world through the read-only
//! [`query`] module and never touch state directly. A tick runs integration,
//! collision resolution and end-of-tick compaction in a fixed order so that
//! identical command streams always reproduce identical worlds.

use std::time::Duration;

use skyfall_defence_core::{
    AsteroidId, AsteroidKind, AsteroidSpec, Command, DifficultyScaling, Event, GuidancePhase,
    GuidanceProfile, Playfield, ProjectileId, UpgradeKind, UpgradeLevels, Vec2,
};

mod grid;
mod particles;

pub use particles::{Particle, ParticleKind};

use grid::SpatialGrid;

const DEFAULT_FIELD_WIDTH: f32 = 800.0;
const DEFAULT_FIELD_HEIGHT: f32 = 600.0;

const CITY_SIZE: f32 = 40.0;
const CITY_MAX_HEALTH: u32 = 10;
const CITY_BOTTOM_OFFSET: f32 = 60.0;
const REPAIR_AMOUNT: u32 = 3;

const SHIELD_CAPACITY: f32 = 5.0;
const SHIELD_REGEN_PER_SECOND: f32 = 1.0;
const SHIELD_REGEN_DELAY: Duration = Duration::from_millis(3000);

const BASE_FIRE_INTERVAL: Duration = Duration::from_millis(800);

const PROJECTILE_SPEED: f32 = 200.0;
const PROJECTILE_SIZE: f32 = 3.0;
const PROJECTILE_DAMAGE: u32 = 1;
const PROJECTILE_LIFETIME: Duration = Duration::from_millis(4000);
const PROJECTILE_EXIT_MARGIN: f32 = 50.0;
const SEEKING_POWER: f32 = 0.015;
const MAX_TURN_RATE: f32 = 0.11;
const PREDICTION_TIME: f32 = 1.1;
const LOCK_ON_DISTANCE: f32 = 500.0;
const PROXIMITY_DETONATION: f32 = 20.0;

// Fuze commands are computed from the previous tick's snapshot, so the
// blast keeps a little extra reach beyond the trigger radius.
const BLAST_REACH: f32 = 1.5;

const ASTEROID_GRAVITY: f32 = 5.0;
const ASTEROID_DRAG: f32 = 0.999;
const ASTEROID_EXIT_MARGIN: f32 = 100.0;
const MAX_ASTEROID_RADIUS: f32 = 50.0;
const KNOCKBACK_IMPULSE: f32 = 10.0;

const GRID_CELL_SIZE: f32 = 50.0;

const FRAGMENT_MIN: u32 = 2;
const FRAGMENT_MAX: u32 = 4;
const FRAGMENT_OFFSET: f32 = 10.0;
const FRAGMENT_SPEED_MIN: f32 = 20.0;
const FRAGMENT_SPEED_MAX: f32 = 40.0;
const FRAGMENT_INHERITED_FALL: f32 = 0.5;

const SCATTER_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

const MAX_PARTICLES: usize = 512;
const EXPLOSION_PARTICLES: u32 = 12;
const SHIELD_PARTICLES: u32 = 8;
const DEBRIS_PARTICLES: u32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AsteroidFate {
    Killed,
    Exited,
    Impacted,
}

#[derive(Debug)]
struct Asteroid {
    id: AsteroidId,
    kind: AsteroidKind,
    position: Vec2,
    velocity: Vec2,
    size: f32,
    health: u32,
    max_health: u32,
    damage: u32,
    points: u32,
    // Cumulative score at construction; fragments inherit this so their
    // difficulty scaling matches the parent's.
    spawn_score: u32,
    fate: Option<AsteroidFate>,
}

#[derive(Debug)]
struct Projectile {
    id: ProjectileId,
    profile: GuidanceProfile,
    position: Vec2,
    velocity: Vec2,
    target: Option<AsteroidId>,
    phase: GuidancePhase,
    life: Duration,
    damage: u32,
    is_locked: bool,
    exploded: bool,
    remove: bool,
}

#[derive(Debug)]
struct City {
    position: Vec2,
    size: f32,
    health: u32,
    max_health: u32,
    shield_health: f32,
    shield_regen_delay: Duration,
    is_destroyed: bool,
    fire_cooldown: Duration,
    upgrades: UpgradeLevels,
}

impl City {
    fn new(position: Vec2) -> Self {
        Self {
            position,
            size: CITY_SIZE,
            health: CITY_MAX_HEALTH,
            max_health: CITY_MAX_HEALTH,
            shield_health: SHIELD_CAPACITY,
            shield_regen_delay: Duration::ZERO,
            is_destroyed: false,
            // Starts fully charged so the defense can fire immediately.
            fire_cooldown: BASE_FIRE_INTERVAL,
            upgrades: UpgradeLevels::default(),
        }
    }
}

/// Authoritative simulation state.
#[derive(Debug)]
pub struct World {
    playfield: Playfield,
    city: City,
    asteroids: Vec<Asteroid>,
    projectiles: Vec<Projectile>,
    particles: Vec<Particle>,
    grid: SpatialGrid,
    nearby_scratch: Vec<AsteroidId>,
    score: u32,
    next_asteroid_id: u32,
    next_projectile_id: u32,
    rng_state: u64,
}

impl World {
    /// Creates a world with the default playfield dimensions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            playfield: Playfield::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT),
            city: City::new(city_position(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT)),
            asteroids: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            grid: SpatialGrid::new(GRID_CELL_SIZE),
            nearby_scratch: Vec::new(),
            score: 0,
            next_asteroid_id: 0,
            next_projectile_id: 0,
            rng_state: SCATTER_SEED,
        }
    }

    fn random_unit(&mut self) -> f32 {
        self.rng_state = next_random(self.rng_state);
        ((self.rng_state >> 40) as f32) / ((1u64 << 24) as f32)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn city_position(width: f32, height: f32) -> Vec2 {
    Vec2::new(width * 0.5, height - CITY_BOTTOM_OFFSET)
}

/// Executes a command against the world, appending resulting events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigurePlayfield { width, height } => configure_playfield(world, width, height),
        Command::Tick { dt } => step(world, dt, out_events),
        Command::SpawnAsteroid { spec } => {
            let spawn_score = world.score;
            spawn_asteroid(world, spec, spawn_score, out_events);
        }
        Command::FireProjectile { heading, damage } => {
            fire_projectile(world, heading, damage, out_events);
        }
        Command::SteerProjectile {
            projectile,
            velocity,
            phase,
            locked,
        } => steer_projectile(world, projectile, velocity, phase, locked),
        Command::AssignTarget { projectile, target } => assign_target(world, projectile, target),
        Command::DetonateProjectile { projectile } => {
            detonate_projectile(world, projectile, out_events);
        }
        Command::ApplyUpgrade { kind } => apply_upgrade(world, kind, out_events),
    }
}

fn configure_playfield(world: &mut World, width: f32, height: f32) {
    let width = width.max(1.0);
    let height = height.max(1.0);
    world.playfield = Playfield::new(width, height);
    world.city = City::new(city_position(width, height));
    world.asteroids.clear();
    world.projectiles.clear();
    world.particles.clear();
    world.grid.clear();
    world.score = 0;
    world.next_asteroid_id = 0;
    world.next_projectile_id = 0;
    world.rng_state = SCATTER_SEED;
}

fn step(world: &mut World, dt: Duration, out_events: &mut Vec<Event>) {
    out_events.push(Event::TimeAdvanced { dt });
    if world.city.is_destroyed {
        return;
    }
    let seconds = dt.as_secs_f32();
    let playfield = world.playfield;

    for asteroid in &mut world.asteroids {
        if asteroid.fate.is_some() {
            continue;
        }
        asteroid.position += asteroid.velocity * seconds;
        asteroid.velocity.y += ASTEROID_GRAVITY * seconds;
        asteroid.velocity = asteroid.velocity * ASTEROID_DRAG;
        if asteroid.position.y > playfield.height() + ASTEROID_EXIT_MARGIN {
            asteroid.fate = Some(AsteroidFate::Exited);
        }
    }

    let mut expired_bursts: Vec<Vec2> = Vec::new();
    for projectile in &mut world.projectiles {
        if projectile.remove {
            continue;
        }
        // Flight speed is constant; renormalize to cancel drift from
        // steering arithmetic.
        let direction = projectile.velocity.normalized();
        if direction != Vec2::ZERO {
            projectile.velocity = direction * PROJECTILE_SPEED;
        }
        projectile.position += projectile.velocity * seconds;
        projectile.life = projectile.life.saturating_sub(dt);
        if projectile.life.is_zero() {
            projectile.exploded = true;
            projectile.remove = true;
            expired_bursts.push(projectile.position);
            out_events.push(Event::ProjectileExpired {
                projectile: projectile.id,
            });
        } else if !playfield.contains_with_margin(projectile.position, PROJECTILE_EXIT_MARGIN) {
            projectile.remove = true;
            out_events.push(Event::ProjectileExited {
                projectile: projectile.id,
            });
        }
    }

    world.particles.retain_mut(|particle| particle.advance(dt));

    // A spent munition detonates where its clock runs out.
    for position in expired_bursts {
        spawn_burst(world, ParticleKind::Explosion, position, EXPLOSION_PARTICLES);
    }

    world.grid.clear();
    for asteroid in &world.asteroids {
        if asteroid.fate.is_none() {
            world.grid.insert(asteroid.id, asteroid.position);
        }
    }

    resolve_projectile_hits(world, out_events);
    resolve_city_impacts(world, out_events);

    if !world.city.is_destroyed {
        if world.city.shield_regen_delay.is_zero() {
            world.city.shield_health =
                (world.city.shield_health + SHIELD_REGEN_PER_SECOND * seconds).min(SHIELD_CAPACITY);
        } else {
            world.city.shield_regen_delay = world.city.shield_regen_delay.saturating_sub(dt);
        }
        world.city.fire_cooldown += dt;
    }

    compact(world, out_events);
}

fn resolve_projectile_hits(world: &mut World, out_events: &mut Vec<Event>) {
    let mut nearby = std::mem::take(&mut world.nearby_scratch);
    for projectile_index in 0..world.projectiles.len() {
        {
            let projectile = &world.projectiles[projectile_index];
            if projectile.remove || projectile.exploded {
                continue;
            }
        }
        let position = world.projectiles[projectile_index].position;
        world
            .grid
            .nearby(position, MAX_ASTEROID_RADIUS + PROJECTILE_SIZE, &mut nearby);

        let mut best: Option<(usize, f32)> = None;
        for id in &nearby {
            let Some(asteroid_index) = asteroid_index(&world.asteroids, *id) else {
                continue;
            };
            let asteroid = &world.asteroids[asteroid_index];
            if asteroid.fate.is_some() {
                continue;
            }
            let distance = asteroid.position.distance_to(position);
            if distance <= asteroid.size + PROJECTILE_SIZE
                && best.map_or(true, |(_, best_distance)| distance < best_distance)
            {
                best = Some((asteroid_index, distance));
            }
        }
        let Some((asteroid_index, _)) = best else {
            continue;
        };

        let damage = world.projectiles[projectile_index].damage;
        let struck = damage_asteroid(&mut world.asteroids[asteroid_index], damage, position);
        let projectile = &mut world.projectiles[projectile_index];
        projectile.exploded = true;
        projectile.remove = true;
        let projectile_id = projectile.id;
        out_events.push(Event::ProjectileDetonated {
            projectile: projectile_id,
            struck: Some(struck),
        });
        spawn_burst(world, ParticleKind::Explosion, position, EXPLOSION_PARTICLES);
    }
    world.nearby_scratch = nearby;
}

fn resolve_city_impacts(world: &mut World, out_events: &mut Vec<Event>) {
    let city_position = world.city.position;
    let city_size = world.city.size;
    for asteroid_index in 0..world.asteroids.len() {
        let (position, size, damage, id) = {
            let asteroid = &world.asteroids[asteroid_index];
            if asteroid.fate.is_some() {
                continue;
            }
            (
                asteroid.position,
                asteroid.size,
                asteroid.damage,
                asteroid.id,
            )
        };
        if position.distance_to(city_position) > size + city_size {
            continue;
        }
        world.asteroids[asteroid_index].fate = Some(AsteroidFate::Impacted);

        let damage_f = damage as f32;
        let (shield_absorbed, structural_damage) = if damage_f <= world.city.shield_health {
            world.city.shield_health -= damage_f;
            (damage, 0)
        } else {
            let overflow = damage_f - world.city.shield_health;
            world.city.shield_health = 0.0;
            let structural = (overflow.ceil() as u32).min(damage);
            (damage - structural, structural)
        };
        world.city.shield_regen_delay = SHIELD_REGEN_DELAY;
        world.city.health = world.city.health.saturating_sub(structural_damage);
        out_events.push(Event::CityHit {
            asteroid: id,
            shield_absorbed,
            structural_damage,
        });

        let kind = if structural_damage == 0 {
            ParticleKind::ShieldImpact
        } else {
            ParticleKind::Explosion
        };
        let count = if structural_damage == 0 {
            SHIELD_PARTICLES
        } else {
            EXPLOSION_PARTICLES
        };
        spawn_burst(world, kind, position, count);

        if world.city.health == 0 && !world.city.is_destroyed {
            world.city.is_destroyed = true;
            out_events.push(Event::CityDestroyed {
                final_score: world.score,
            });
        }
    }
}

fn compact(world: &mut World, out_events: &mut Vec<Event>) {
    let mut pending_fragments: Vec<(AsteroidSpec, u32)> = Vec::new();
    let drained = std::mem::take(&mut world.asteroids);
    let mut retained = Vec::with_capacity(drained.len());
    for asteroid in drained {
        match asteroid.fate {
            None => retained.push(asteroid),
            Some(AsteroidFate::Killed) => {
                world.score += asteroid.points;
                let before = pending_fragments.len();
                collect_fragments(world, &asteroid, &mut pending_fragments);
                let fragments = (pending_fragments.len() - before) as u32;
                out_events.push(Event::AsteroidDestroyed {
                    asteroid: asteroid.id,
                    points: asteroid.points,
                    fragments,
                });
                spawn_burst(world, ParticleKind::Debris, asteroid.position, DEBRIS_PARTICLES);
            }
            Some(AsteroidFate::Exited) => out_events.push(Event::AsteroidExited {
                asteroid: asteroid.id,
            }),
            Some(AsteroidFate::Impacted) => {}
        }
    }
    world.asteroids = retained;
    // Fragments are appended after the survivors so identifier order, and
    // with it binary-search lookup, is preserved.
    for (spec, spawn_score) in pending_fragments {
        spawn_asteroid(world, spec, spawn_score, out_events);
    }
    world.projectiles.retain(|projectile| !projectile.remove);
}

fn collect_fragments(world: &mut World, parent: &Asteroid, out: &mut Vec<(AsteroidSpec, u32)>) {
    let Some(kind) = parent.kind.fragment_kind(parent.size) else {
        return;
    };
    let count = (FRAGMENT_MIN + (world.random_unit() * 3.0) as u32).min(FRAGMENT_MAX);
    // Fragments scale against the score the parent was built under, not
    // the score at break-up.
    let scaling = DifficultyScaling::for_score(parent.spawn_score);
    let stats = kind.base_stats();
    for _ in 0..count {
        let angle = world.random_unit() * std::f32::consts::TAU;
        let scatter_speed = lerp(FRAGMENT_SPEED_MIN, FRAGMENT_SPEED_MAX, world.random_unit());
        let size = lerp(stats.size_range.0, stats.size_range.1, world.random_unit());
        let jitter = 0.8 + world.random_unit() * 0.4;
        let health = (((stats.health as f32) * scaling.health_scale).floor() as u32).max(1);
        let jittered = (((stats.damage as f32) * jitter).floor() as u32).max(1);
        let damage = (((jittered as f32) * scaling.damage_scale).floor() as u32).max(1);
        out.push((
            AsteroidSpec {
                kind,
                position: parent.position + Vec2::from_angle(angle, FRAGMENT_OFFSET),
                velocity: Vec2::from_angle(angle, scatter_speed)
                    + Vec2::new(0.0, parent.velocity.y * FRAGMENT_INHERITED_FALL),
                size,
                health,
                damage,
                points: stats.points,
            },
            parent.spawn_score,
        ));
    }
}

fn spawn_asteroid(
    world: &mut World,
    spec: AsteroidSpec,
    spawn_score: u32,
    out_events: &mut Vec<Event>,
) {
    let id = AsteroidId::new(world.next_asteroid_id);
    world.next_asteroid_id += 1;
    world.asteroids.push(Asteroid {
        id,
        kind: spec.kind,
        position: spec.position,
        velocity: spec.velocity,
        size: spec.size,
        health: spec.health.max(1),
        max_health: spec.health.max(1),
        damage: spec.damage,
        points: spec.points,
        spawn_score,
        fate: None,
    });
    out_events.push(Event::AsteroidSpawned {
        asteroid: id,
        kind: spec.kind,
    });
}

fn fire_projectile(world: &mut World, heading: Vec2, damage: u32, out_events: &mut Vec<Event>) {
    if world.city.is_destroyed {
        return;
    }
    let id = ProjectileId::new(world.next_projectile_id);
    world.next_projectile_id += 1;
    let profile = GuidanceProfile::for_projectile(id);
    let direction = heading.normalized();
    let direction = if direction == Vec2::ZERO {
        Vec2::new(0.0, -1.0)
    } else {
        direction
    };
    world.city.fire_cooldown = Duration::ZERO;
    world.projectiles.push(Projectile {
        id,
        profile,
        position: world.city.position,
        velocity: direction * PROJECTILE_SPEED,
        target: None,
        phase: GuidancePhase::Launch,
        life: PROJECTILE_LIFETIME,
        damage: damage.max(1),
        is_locked: false,
        exploded: false,
        remove: false,
    });
    out_events.push(Event::ProjectileFired {
        projectile: id,
        profile,
    });
}

fn steer_projectile(
    world: &mut World,
    id: ProjectileId,
    velocity: Vec2,
    phase: GuidancePhase,
    locked: bool,
) {
    let Some(index) = projectile_index(&world.projectiles, id) else {
        return;
    };
    let projectile = &mut world.projectiles[index];
    if projectile.exploded || projectile.remove {
        return;
    }
    let direction = velocity.normalized();
    if direction != Vec2::ZERO {
        projectile.velocity = direction * PROJECTILE_SPEED;
    }
    // Phases only ever advance; stale commands cannot drag a projectile
    // back out of its terminal approach.
    if phase.rank() >= projectile.phase.rank() {
        projectile.phase = phase;
    }
    projectile.is_locked = locked;
}

fn assign_target(world: &mut World, id: ProjectileId, target: Option<AsteroidId>) {
    let resolved = target.filter(|asteroid| {
        asteroid_index(&world.asteroids, *asteroid)
            .map_or(false, |index| world.asteroids[index].fate.is_none())
    });
    let Some(index) = projectile_index(&world.projectiles, id) else {
        return;
    };
    let projectile = &mut world.projectiles[index];
    if projectile.exploded || projectile.remove {
        return;
    }
    projectile.target = resolved;
}

fn detonate_projectile(world: &mut World, id: ProjectileId, out_events: &mut Vec<Event>) {
    let Some(index) = projectile_index(&world.projectiles, id) else {
        return;
    };
    {
        let projectile = &world.projectiles[index];
        if projectile.exploded || projectile.remove {
            return;
        }
    }
    let position = world.projectiles[index].position;
    let damage = world.projectiles[index].damage;
    let target = world.projectiles[index].target;

    let struck = target
        .and_then(|asteroid| asteroid_index(&world.asteroids, asteroid))
        .filter(|&asteroid_index| {
            let asteroid = &world.asteroids[asteroid_index];
            asteroid.fate.is_none()
                && asteroid.position.distance_to(position)
                    <= PROXIMITY_DETONATION * BLAST_REACH + asteroid.size
        })
        .map(|asteroid_index| damage_asteroid(&mut world.asteroids[asteroid_index], damage, position));

    let projectile = &mut world.projectiles[index];
    projectile.exploded = true;
    projectile.remove = true;
    out_events.push(Event::ProjectileDetonated {
        projectile: id,
        struck,
    });
    spawn_burst(world, ParticleKind::Explosion, position, EXPLOSION_PARTICLES);
}

fn apply_upgrade(world: &mut World, kind: UpgradeKind, out_events: &mut Vec<Event>) {
    if world.city.is_destroyed {
        return;
    }
    let level = match kind {
        UpgradeKind::FireRate => {
            world.city.upgrades.fire_rate += 1;
            world.city.upgrades.fire_rate
        }
        UpgradeKind::Damage => {
            world.city.upgrades.damage += 1;
            world.city.upgrades.damage
        }
        UpgradeKind::MultiShot => {
            world.city.upgrades.multi_shot += 1;
            world.city.upgrades.multi_shot
        }
        UpgradeKind::Repair => {
            world.city.health = (world.city.health + REPAIR_AMOUNT).min(world.city.max_health);
            0
        }
    };
    out_events.push(Event::UpgradeApplied { kind, level });
}

fn damage_asteroid(asteroid: &mut Asteroid, damage: u32, impact: Vec2) -> AsteroidId {
    asteroid.health = asteroid.health.saturating_sub(damage);
    let push = (asteroid.position - impact).normalized();
    asteroid.velocity += push * KNOCKBACK_IMPULSE;
    if asteroid.health == 0 {
        asteroid.fate = Some(AsteroidFate::Killed);
    }
    asteroid.id
}

fn spawn_burst(world: &mut World, kind: ParticleKind, position: Vec2, count: u32) {
    if world.particles.len() >= MAX_PARTICLES {
        return;
    }
    let (speed_range, life_ms, size_range) = match kind {
        ParticleKind::Explosion => ((30.0, 90.0), 450, (1.5, 3.5)),
        ParticleKind::ShieldImpact => ((15.0, 40.0), 350, (1.0, 2.5)),
        ParticleKind::Debris => ((10.0, 30.0), 700, (1.0, 3.0)),
    };
    for _ in 0..count {
        let angle = world.random_unit() * std::f32::consts::TAU;
        let speed = lerp(speed_range.0, speed_range.1, world.random_unit());
        let size = lerp(size_range.0, size_range.1, world.random_unit());
        world.particles.push(Particle::new(
            kind,
            position,
            Vec2::from_angle(angle, speed),
            Duration::from_millis(life_ms),
            size,
        ));
    }
}

fn asteroid_index(asteroids: &[Asteroid], id: AsteroidId) -> Option<usize> {
    asteroids
        .binary_search_by_key(&id, |asteroid| asteroid.id)
        .ok()
}

fn projectile_index(projectiles: &[Projectile], id: ProjectileId) -> Option<usize> {
    projectiles
        .binary_search_by_key(&id, |projectile| projectile.id)
        .ok()
}

fn lerp(low: f32, high: f32, t: f32) -> f32 {
    low + (high - low) * t
}

fn next_random(state: u64) -> u64 {
    state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1)
}

/// Read-only access to world state for systems and adapters.
pub mod query {
    use skyfall_defence_core::{
        AsteroidSnapshot, AsteroidView, CitySnapshot, Playfield, ProjectileSnapshot,
        ProjectileView,
    };

    use crate::{
        Particle, World, BASE_FIRE_INTERVAL, LOCK_ON_DISTANCE, MAX_TURN_RATE, PREDICTION_TIME,
        PROJECTILE_DAMAGE, PROJECTILE_SIZE, PROJECTILE_SPEED, PROXIMITY_DETONATION, SEEKING_POWER,
        SHIELD_CAPACITY,
    };

    /// Current playfield dimensions.
    #[must_use]
    pub fn playfield(world: &World) -> Playfield {
        world.playfield
    }

    /// Cumulative score awarded for destroyed asteroids.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Whether the city has been destroyed.
    #[must_use]
    pub fn is_city_destroyed(world: &World) -> bool {
        world.city.is_destroyed
    }

    /// Captures a deterministic snapshot of every live asteroid.
    #[must_use]
    pub fn asteroid_view(world: &World) -> AsteroidView {
        let snapshots = world
            .asteroids
            .iter()
            .filter(|asteroid| asteroid.fate.is_none())
            .map(|asteroid| AsteroidSnapshot {
                id: asteroid.id,
                kind: asteroid.kind,
                position: asteroid.position,
                velocity: asteroid.velocity,
                size: asteroid.size,
                health: asteroid.health,
                max_health: asteroid.max_health,
                damage: asteroid.damage,
                points: asteroid.points,
            })
            .collect();
        AsteroidView::from_snapshots(snapshots)
    }

    /// Captures a deterministic snapshot of every live projectile.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        let snapshots = world
            .projectiles
            .iter()
            .filter(|projectile| !projectile.remove && !projectile.exploded)
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                profile: projectile.profile,
                position: projectile.position,
                velocity: projectile.velocity,
                target: projectile.target,
                phase: projectile.phase,
                life: projectile.life,
                speed: PROJECTILE_SPEED,
                size: PROJECTILE_SIZE,
                damage: projectile.damage,
                seeking_power: SEEKING_POWER,
                max_turn_rate: MAX_TURN_RATE,
                prediction_time: PREDICTION_TIME,
                lock_on_distance: LOCK_ON_DISTANCE,
                proximity_detonation: PROXIMITY_DETONATION,
                is_locked: projectile.is_locked,
            })
            .collect();
        ProjectileView::from_snapshots(snapshots)
    }

    /// Captures the city and its defense controller.
    #[must_use]
    pub fn city(world: &World) -> CitySnapshot {
        CitySnapshot {
            position: world.city.position,
            size: world.city.size,
            health: world.city.health,
            max_health: world.city.max_health,
            shield_health: world.city.shield_health,
            max_shield_health: SHIELD_CAPACITY,
            is_destroyed: world.city.is_destroyed,
            fire_cooldown: world.city.fire_cooldown,
            base_fire_interval: BASE_FIRE_INTERVAL,
            projectile_damage: PROJECTILE_DAMAGE,
            projectile_speed: PROJECTILE_SPEED,
            upgrades: world.city.upgrades,
        }
    }

    /// Live cosmetic particles, in spawn order.
    #[must_use]
    pub fn particles(world: &World) -> &[Particle] {
        &world.particles
    }
}
