//! Cosmetic particle effects carried alongside the simulation state.
//!
//! Particles never influence gameplay; the world spawns them at impact
//! sites and renderers read them through [`crate::query::particles`].

use std::time::Duration;

use skyfall_defence_core::Vec2;

const PARTICLE_DRAG: f32 = 0.98;

/// Visual category of a particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    /// Fiery burst left by a detonation or asteroid break-up.
    Explosion,
    /// Ripple emitted when the shield soaks an impact.
    ShieldImpact,
    /// Slow tumbling rubble shed by a destroyed asteroid.
    Debris,
}

/// One short-lived cosmetic particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Visual category.
    pub kind: ParticleKind,
    /// Current position.
    pub position: Vec2,
    /// Current velocity.
    pub velocity: Vec2,
    /// Remaining lifetime.
    pub life: Duration,
    /// Lifetime at spawn, kept so renderers can fade the particle out.
    pub max_life: Duration,
    /// Render radius in world units.
    pub size: f32,
}

impl Particle {
    pub(crate) fn new(
        kind: ParticleKind,
        position: Vec2,
        velocity: Vec2,
        life: Duration,
        size: f32,
    ) -> Self {
        Self {
            kind,
            position,
            velocity,
            life,
            max_life: life,
            size,
        }
    }

    /// Advances the particle by `dt` and reports whether it is still alive.
    pub(crate) fn advance(&mut self, dt: Duration) -> bool {
        let seconds = dt.as_secs_f32();
        self.position += self.velocity * seconds;
        self.velocity = self.velocity * PARTICLE_DRAG;
        self.life = self.life.saturating_sub(dt);
        !self.life.is_zero()
    }
}
