//! Fixed behavioural profiles that partition projectiles into ten targeting
//! buckets.
//!
//! A projectile's bucket is derived once, at construction, from its
//! identifier. The mapping is a fixed multiplicative hash so the partition
//! is stable across runs without any shared random state. Each profile
//! carries a named record of scoring weights; together the ten profiles
//! produce layered threat coverage from a swarm of independently-deciding
//! munitions without a central allocator.

use serde::{Deserialize, Serialize};

use crate::ProjectileId;

/// Knuth multiplicative hash constant used to derive the bucket index.
const BUCKET_HASH_PRIME: u64 = 2_654_435_761;

/// Behavioural profile assigned to a projectile for its entire lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuidanceProfile {
    /// City protector; overwhelming collision-course priority, clusters on
    /// critical threats.
    Guardian,
    /// Close-range specialist chasing nearby, catchable targets.
    Hunter,
    /// Long-range specialist; ignores proximity, prefers targets its
    /// heading lines up with, spreads widely.
    Sniper,
    /// Weighs intercept feasibility above raw threat.
    Interceptor,
    /// Clusters on the highest composite threat.
    ThreatAnalyst,
    /// Close-combat profile; heavily distance-driven, can cluster.
    ProximityFighter,
    /// Balanced scoring with a city-defence bias.
    Strategic,
    /// Focuses on high-value threats, clusters.
    Aggressive,
    /// Seeks well-aligned kills others miss, spreads.
    Opportunist,
    /// Cleanup crew; disperses hardest onto neglected targets.
    LastResort,
}

/// Scoring weight record attached to each [`GuidanceProfile`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileWeights {
    /// Multiplier on the collision-course bonus block.
    pub collision_threat: f32,
    /// Multiplier on the alignment-with-city-direction term.
    pub city_proximity: f32,
    /// Multiplier on the intercept-feasibility term.
    pub intercept: f32,
    /// Multiplier on the raw proximity term.
    pub distance: f32,
    /// Multiplier on the own-heading alignment term.
    pub alignment: f32,
    /// Multiplier on the generic size/speed/damage composite.
    pub general_threat: f32,
    /// Deconfliction strength; higher values disperse harder away from
    /// targets other projectiles already cover.
    pub spread_factor: f32,
}

impl GuidanceProfile {
    /// Every profile in bucket order.
    pub const ALL: [Self; 10] = [
        Self::Guardian,
        Self::Hunter,
        Self::Sniper,
        Self::Interceptor,
        Self::ThreatAnalyst,
        Self::ProximityFighter,
        Self::Strategic,
        Self::Aggressive,
        Self::Opportunist,
        Self::LastResort,
    ];

    /// Derives the stable profile for a projectile identifier.
    #[must_use]
    pub fn for_projectile(id: ProjectileId) -> Self {
        let bucket = (u64::from(id.get()) * BUCKET_HASH_PRIME) % Self::ALL.len() as u64;
        Self::ALL[bucket as usize]
    }

    /// Fixed scoring weights for the profile.
    #[must_use]
    pub const fn weights(self) -> ProfileWeights {
        match self {
            Self::Guardian => ProfileWeights {
                collision_threat: 3.0,
                city_proximity: 2.0,
                intercept: 1.0,
                distance: 1.0,
                alignment: 1.0,
                general_threat: 1.0,
                spread_factor: 0.5,
            },
            Self::Hunter => ProfileWeights {
                collision_threat: 1.0,
                city_proximity: 1.0,
                intercept: 2.0,
                distance: 3.0,
                alignment: 1.0,
                general_threat: 1.0,
                spread_factor: 1.0,
            },
            Self::Sniper => ProfileWeights {
                collision_threat: 1.0,
                city_proximity: 1.0,
                intercept: 1.0,
                distance: 0.5,
                alignment: 2.0,
                general_threat: 1.0,
                spread_factor: 2.0,
            },
            Self::Interceptor => ProfileWeights {
                collision_threat: 1.0,
                city_proximity: 1.0,
                intercept: 3.0,
                distance: 1.0,
                alignment: 2.0,
                general_threat: 1.0,
                spread_factor: 1.0,
            },
            Self::ThreatAnalyst => ProfileWeights {
                collision_threat: 1.0,
                city_proximity: 1.0,
                intercept: 1.0,
                distance: 1.0,
                alignment: 1.0,
                general_threat: 3.0,
                spread_factor: 0.3,
            },
            Self::ProximityFighter => ProfileWeights {
                collision_threat: 1.0,
                city_proximity: 1.0,
                intercept: 1.5,
                distance: 4.0,
                alignment: 1.0,
                general_threat: 1.0,
                spread_factor: 0.5,
            },
            Self::Strategic => ProfileWeights {
                collision_threat: 1.5,
                city_proximity: 1.5,
                intercept: 1.0,
                distance: 1.0,
                alignment: 1.0,
                general_threat: 1.0,
                spread_factor: 1.0,
            },
            Self::Aggressive => ProfileWeights {
                collision_threat: 1.5,
                city_proximity: 1.0,
                intercept: 1.0,
                distance: 1.0,
                alignment: 1.0,
                general_threat: 2.0,
                spread_factor: 0.3,
            },
            Self::Opportunist => ProfileWeights {
                collision_threat: 1.0,
                city_proximity: 1.0,
                intercept: 1.5,
                distance: 0.7,
                alignment: 3.0,
                general_threat: 1.0,
                spread_factor: 1.5,
            },
            Self::LastResort => ProfileWeights {
                collision_threat: 1.0,
                city_proximity: 1.0,
                intercept: 1.0,
                distance: 1.0,
                alignment: 1.0,
                general_threat: 1.2,
                spread_factor: 2.0,
            },
        }
    }
}
