#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Skyfall Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems observe immutable
//! snapshots of the world, respond with [`Command`] batches describing the
//! mutations they want, and the world executes those commands via its
//! `apply` entry point while broadcasting [`Event`] values describing what
//! actually happened. No system mutates shared state directly.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod profile;
mod vec2;

pub use profile::{GuidanceProfile, ProfileWeights};
pub use vec2::Vec2;

/// Unique identifier assigned to an asteroid by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AsteroidId(u32);

impl AsteroidId {
    /// Creates an asteroid identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile by the world.
///
/// Identifiers increase monotonically; the guidance bucket for a projectile
/// is derived from this value (see [`GuidanceProfile::for_projectile`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Threat classes an asteroid can spawn as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidKind {
    /// Common rubble; fast to kill, cheap in points.
    Small,
    /// Mid-weight rock.
    Medium,
    /// Heavy rock that splits when destroyed.
    Large,
    /// Low-mass, high-velocity threat; never splits.
    Fast,
    /// Slow but durable plated rock.
    Armored,
    /// Rare siege rock with the highest damage and points.
    Giant,
}

/// Base stat table entry for an [`AsteroidKind`] before jitter and
/// difficulty scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KindStats {
    /// Inclusive radius range in world units.
    pub size_range: (f32, f32),
    /// Hit points before scaling.
    pub health: u32,
    /// Damage dealt to the city on impact before scaling.
    pub damage: u32,
    /// Inclusive downward speed range in world units per second.
    pub speed_range: (f32, f32),
    /// Score awarded on destruction.
    pub points: u32,
}

impl AsteroidKind {
    /// Every kind in roulette order.
    pub const ALL: [Self; 6] = [
        Self::Small,
        Self::Medium,
        Self::Large,
        Self::Fast,
        Self::Armored,
        Self::Giant,
    ];

    /// Roulette weight used by the spawner's cumulative-weight draw.
    #[must_use]
    pub const fn spawn_weight(self) -> u32 {
        match self {
            Self::Small => 40,
            Self::Medium => 30,
            Self::Large => 20,
            Self::Fast => 15,
            Self::Armored => 10,
            Self::Giant => 3,
        }
    }

    /// Base stats for the kind before jitter and difficulty scaling.
    #[must_use]
    pub const fn base_stats(self) -> KindStats {
        match self {
            Self::Small => KindStats {
                size_range: (8.0, 15.0),
                health: 1,
                damage: 1,
                speed_range: (30.0, 50.0),
                points: 10,
            },
            Self::Medium => KindStats {
                size_range: (15.0, 25.0),
                health: 2,
                damage: 2,
                speed_range: (25.0, 40.0),
                points: 20,
            },
            Self::Large => KindStats {
                size_range: (25.0, 35.0),
                health: 3,
                damage: 3,
                speed_range: (20.0, 35.0),
                points: 40,
            },
            Self::Fast => KindStats {
                size_range: (10.0, 18.0),
                health: 1,
                damage: 2,
                speed_range: (60.0, 90.0),
                points: 30,
            },
            Self::Armored => KindStats {
                size_range: (18.0, 28.0),
                health: 4,
                damage: 2,
                speed_range: (15.0, 25.0),
                points: 50,
            },
            Self::Giant => KindStats {
                size_range: (35.0, 50.0),
                health: 6,
                damage: 5,
                speed_range: (10.0, 20.0),
                points: 100,
            },
        }
    }

    /// Kind assigned to fragments of a destroyed asteroid of this size.
    ///
    /// Asteroids with a radius of at most 20 units, and every `Fast`
    /// asteroid, never fragment.
    #[must_use]
    pub fn fragment_kind(self, size: f32) -> Option<Self> {
        if self == Self::Fast || size <= 20.0 {
            return None;
        }
        if size > 35.0 {
            Some(Self::Medium)
        } else {
            Some(Self::Small)
        }
    }
}

/// Stat multipliers derived from the cumulative score at construction time.
///
/// Scaling is applied exactly once, when an asteroid is built; it is never
/// re-applied to live asteroids as the score continues to rise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyScaling {
    /// Multiplier on impact damage, clamped to `0.5..=1.5`.
    pub damage_scale: f32,
    /// Multiplier on downward speed, clamped to `0.7..=1.3`.
    pub speed_scale: f32,
    /// Multiplier on hit points, clamped to `0.8..=1.2`.
    pub health_scale: f32,
}

impl DifficultyScaling {
    /// Computes the multipliers for the provided cumulative score.
    #[must_use]
    pub fn for_score(score: u32) -> Self {
        let score = score as f32;
        Self {
            damage_scale: (0.5 + score / 500.0).clamp(0.5, 1.5),
            speed_scale: (0.7 + (score / 1000.0) * 0.6).clamp(0.7, 1.3),
            health_scale: (0.8 + (score / 1250.0) * 0.4).clamp(0.8, 1.2),
        }
    }
}

/// Fully-resolved construction payload for one asteroid.
///
/// The spawner performs the weighted kind draw, jitter and difficulty
/// scaling so that the world stays free of random state for spawns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AsteroidSpec {
    /// Kind the asteroid was drawn as.
    pub kind: AsteroidKind,
    /// Initial position.
    pub position: Vec2,
    /// Initial velocity.
    pub velocity: Vec2,
    /// Collision radius in world units.
    pub size: f32,
    /// Scaled hit points.
    pub health: u32,
    /// Scaled impact damage.
    pub damage: u32,
    /// Score awarded on destruction.
    pub points: u32,
}

/// Guidance intensity phases of a projectile, ordered and one-way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuidancePhase {
    /// Short boost on the initial heading; acquisition runs, steering does
    /// not.
    Launch,
    /// Normal proportional-navigation guidance.
    Seeking,
    /// Final approach with boosted gains; never reverts.
    Terminal,
}

impl GuidancePhase {
    /// Monotonic rank used to reject backwards phase transitions.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Launch => 0,
            Self::Seeking => 1,
            Self::Terminal => 2,
        }
    }
}

/// Upgrade kinds purchasable through the defense controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// Shortens the effective fire interval with diminishing returns.
    FireRate,
    /// Adds one point of projectile damage per level.
    Damage,
    /// Adds one projectile to every volley per level.
    MultiShot,
    /// Restores city structure; not a counter, applied immediately.
    Repair,
}

/// Current upgrade counters of the defense controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpgradeLevels {
    /// Purchased fire-rate levels.
    pub fire_rate: u32,
    /// Purchased damage levels.
    pub damage: u32,
    /// Purchased multi-shot levels.
    pub multi_shot: u32,
}

/// Rectangular playfield the simulation runs inside.
///
/// The origin sits in the top-left corner; `y` grows downward toward the
/// city, matching the screen-space convention of the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playfield {
    width: f32,
    height: f32,
}

impl Playfield {
    /// Creates a playfield with the provided dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Playfield width in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Playfield height in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Reports whether a point lies inside the field extended by `margin`
    /// on every side.
    #[must_use]
    pub fn contains_with_margin(&self, point: Vec2, margin: f32) -> bool {
        point.x >= -margin
            && point.x <= self.width + margin
            && point.y >= -margin
            && point.y <= self.height + margin
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Configures the playfield dimensions and repositions the city.
    ConfigurePlayfield {
        /// Field width in world units.
        width: f32,
        /// Field height in world units.
        height: f32,
    },
    /// Advances the simulation by one fixed step: integration, collision
    /// resolution and end-of-tick compaction.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Inserts a freshly-drawn asteroid into the world.
    SpawnAsteroid {
        /// Fully-resolved construction payload.
        spec: AsteroidSpec,
    },
    /// Launches one projectile from the city along the provided heading.
    FireProjectile {
        /// Unit launch heading; the world scales it to projectile speed.
        heading: Vec2,
        /// Damage carried by the projectile, upgrades included.
        damage: u32,
    },
    /// Applies a guidance system steering decision to a projectile.
    SteerProjectile {
        /// Projectile being steered.
        projectile: ProjectileId,
        /// New velocity, already turn-rate clamped by the guidance system.
        velocity: Vec2,
        /// Phase the projectile should be in after this tick.
        phase: GuidancePhase,
        /// Whether the cosmetic lock-on indicator is active.
        locked: bool,
    },
    /// Reassigns (or clears) a projectile's target.
    AssignTarget {
        /// Projectile whose target changes.
        projectile: ProjectileId,
        /// Newly selected asteroid, if any.
        target: Option<AsteroidId>,
    },
    /// Detonates a projectile's proximity fuze next to its target.
    DetonateProjectile {
        /// Projectile to detonate.
        projectile: ProjectileId,
    },
    /// Applies a purchased defense upgrade.
    ApplyUpgrade {
        /// Upgrade being purchased.
        kind: UpgradeKind,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an asteroid entered the world.
    AsteroidSpawned {
        /// Identifier assigned by the world.
        asteroid: AsteroidId,
        /// Kind the asteroid was drawn as.
        kind: AsteroidKind,
    },
    /// Reports that an asteroid was destroyed by weapons fire.
    AsteroidDestroyed {
        /// Identifier of the destroyed asteroid.
        asteroid: AsteroidId,
        /// Score awarded for the kill.
        points: u32,
        /// Number of fragments spawned by the break-up.
        fragments: u32,
    },
    /// Reports that an asteroid left the playfield without being killed.
    AsteroidExited {
        /// Identifier of the departed asteroid.
        asteroid: AsteroidId,
    },
    /// Reports an asteroid impact against the city.
    CityHit {
        /// Asteroid that struck the city.
        asteroid: AsteroidId,
        /// Damage soaked by the shield.
        shield_absorbed: u32,
        /// Damage that reached the structure.
        structural_damage: u32,
    },
    /// Announces that the city reached zero health; emitted exactly once.
    CityDestroyed {
        /// Score at the moment of destruction.
        final_score: u32,
    },
    /// Confirms that a projectile launched from the city.
    ProjectileFired {
        /// Identifier assigned by the world.
        projectile: ProjectileId,
        /// Behavioural bucket derived from the identifier.
        profile: GuidanceProfile,
    },
    /// Reports a projectile detonation.
    ProjectileDetonated {
        /// Identifier of the detonated projectile.
        projectile: ProjectileId,
        /// Asteroid damaged by the blast, if any.
        struck: Option<AsteroidId>,
    },
    /// Reports that a projectile ran out its lifetime without detonating
    /// near anything.
    ProjectileExpired {
        /// Identifier of the expired projectile.
        projectile: ProjectileId,
    },
    /// Reports that a projectile left the playfield.
    ProjectileExited {
        /// Identifier of the departed projectile.
        projectile: ProjectileId,
    },
    /// Confirms that a defense upgrade was applied.
    UpgradeApplied {
        /// Upgrade that was purchased.
        kind: UpgradeKind,
        /// Counter value after application; zero for [`UpgradeKind::Repair`].
        level: u32,
    },
}

/// Immutable representation of a single asteroid used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AsteroidSnapshot {
    /// Identifier assigned by the world.
    pub id: AsteroidId,
    /// Kind the asteroid was drawn as.
    pub kind: AsteroidKind,
    /// Current position.
    pub position: Vec2,
    /// Current velocity.
    pub velocity: Vec2,
    /// Collision radius.
    pub size: f32,
    /// Remaining hit points.
    pub health: u32,
    /// Hit points at construction.
    pub max_health: u32,
    /// Impact damage against the city.
    pub damage: u32,
    /// Score awarded on destruction.
    pub points: u32,
}

/// Read-only snapshot describing all live asteroids.
#[derive(Clone, Debug, Default)]
pub struct AsteroidView {
    snapshots: Vec<AsteroidSnapshot>,
}

impl AsteroidView {
    /// Creates a new view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AsteroidSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &AsteroidSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a snapshot by identifier.
    #[must_use]
    pub fn get(&self, id: AsteroidId) -> Option<&AsteroidSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of live asteroids captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AsteroidSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier assigned by the world.
    pub id: ProjectileId,
    /// Behavioural bucket derived from the identifier.
    pub profile: GuidanceProfile,
    /// Current position.
    pub position: Vec2,
    /// Current velocity; magnitude always equals `speed`.
    pub velocity: Vec2,
    /// Currently tracked asteroid, if any.
    pub target: Option<AsteroidId>,
    /// Current guidance phase.
    pub phase: GuidancePhase,
    /// Remaining lifetime.
    pub life: Duration,
    /// Constant flight speed in world units per second.
    pub speed: f32,
    /// Collision radius.
    pub size: f32,
    /// Damage delivered on detonation.
    pub damage: u32,
    /// Steering gain; boosted in the terminal phase.
    pub seeking_power: f32,
    /// Per-tick turn clamp in radians at the 60 Hz baseline; boosted in
    /// the terminal phase.
    pub max_turn_rate: f32,
    /// Lead-prediction gain applied to the bounded intercept extrapolation.
    pub prediction_time: f32,
    /// Radius of the proximity scoring term and the lock-on indicator.
    pub lock_on_distance: f32,
    /// Proximity fuze radius.
    pub proximity_detonation: f32,
    /// Cosmetic lock-on indicator.
    pub is_locked: bool,
}

/// Read-only snapshot describing all live projectiles.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of live projectiles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the city and its defense controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CitySnapshot {
    /// City centre position.
    pub position: Vec2,
    /// Collision radius of the defended structure.
    pub size: f32,
    /// Remaining structural health.
    pub health: u32,
    /// Structural health at construction.
    pub max_health: u32,
    /// Remaining shield charge.
    pub shield_health: f32,
    /// Shield capacity.
    pub max_shield_health: f32,
    /// Whether the city has been destroyed.
    pub is_destroyed: bool,
    /// Time elapsed since the defense controller last fired.
    pub fire_cooldown: Duration,
    /// Base fire interval before upgrades.
    pub base_fire_interval: Duration,
    /// Base projectile damage before upgrades.
    pub projectile_damage: u32,
    /// Constant projectile flight speed.
    pub projectile_speed: f32,
    /// Purchased upgrade counters.
    pub upgrades: UpgradeLevels,
}
