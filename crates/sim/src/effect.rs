use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use skirmish_common::{EffectConfig, frame_decay};

use crate::vehicle::FireEvent;

/// One particle slot. Position is relative to the burst origin.
///
/// Scale and opacity are shared by every particle of a kind and depend only on
/// burst age: see [`EffectSimulator::fire_scale`], [`EffectSimulator::fire_opacity`],
/// [`EffectSimulator::smoke_scale`] and [`EffectSimulator::smoke_opacity`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub offset: Vec3,
    pub velocity: Vec3,
    /// Cleared once the particle can no longer be seen; the slot stays allocated.
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstStatus {
    Alive,
    /// Crossed the age limit on this step. Reported exactly once.
    Expired,
    /// Already reported expired; stepping is a no-op.
    Spent,
}

/// A muzzle flash: fixed fire and smoke particle sets around one origin.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectBurst {
    pub origin: Vec3,
    /// Seconds since spawn.
    pub age: f32,
    fire: Box<[Particle]>,
    smoke: Box<[Particle]>,
    expired: bool,
}

impl EffectBurst {
    pub fn fire_particles(&self) -> &[Particle] {
        &self.fire
    }

    pub fn smoke_particles(&self) -> &[Particle] {
        &self.smoke
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }
}

/// Spawns and advances muzzle-flash bursts.
#[derive(Debug, Clone)]
pub struct EffectSimulator {
    config: EffectConfig,
    reference_rate: f32,
}

impl EffectSimulator {
    pub fn new(config: &EffectConfig, reference_rate: f32) -> Self {
        Self {
            config: config.clone(),
            reference_rate,
        }
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// Scatter a new burst at the muzzle of `fire`, oriented along its direction.
    pub fn spawn<R: Rng + ?Sized>(&self, rng: &mut R, fire: &FireEvent) -> EffectBurst {
        let forward = fire.direction.try_normalize().unwrap_or(Vec3::Z);
        let side = forward
            .cross(Vec3::Y)
            .try_normalize()
            .unwrap_or(Vec3::X);
        let up = side.cross(forward);

        let radius = self.config.spawn_radius;
        let scatter = |rng: &mut R| {
            let angle: f32 = rng.random_range(0.0..std::f32::consts::TAU);
            let r: f32 = rng.random_range(0.0..=radius);
            let outward = side * angle.cos() + up * angle.sin();
            (outward * r, outward)
        };

        let fire_particles: Vec<Particle> = (0..self.config.fire_count)
            .map(|_| {
                let (offset, outward) = scatter(rng);
                let velocity = forward * rng.random_range(2.0f32..4.0)
                    + up * rng.random_range(0.5f32..1.5)
                    + outward * rng.random_range(0.5f32..1.5);
                Particle {
                    offset,
                    velocity,
                    active: true,
                }
            })
            .collect();

        let smoke_particles: Vec<Particle> = (0..self.config.smoke_count)
            .map(|_| {
                let (offset, outward) = scatter(rng);
                let velocity = up * rng.random_range(0.8f32..1.6)
                    + side * rng.random_range(-1.0f32..1.0)
                    + forward * rng.random_range(0.2f32..1.0)
                    + outward * rng.random_range(0.0f32..0.6);
                Particle {
                    offset,
                    velocity,
                    active: true,
                }
            })
            .collect();

        EffectBurst {
            origin: fire.muzzle,
            age: 0.0,
            fire: fire_particles.into_boxed_slice(),
            smoke: smoke_particles.into_boxed_slice(),
            expired: false,
        }
    }

    pub fn step(&self, burst: &mut EffectBurst, dt: f32) -> BurstStatus {
        if burst.expired {
            return BurstStatus::Spent;
        }
        burst.age += dt;

        let fire_keep = frame_decay(self.config.fire_drag, dt, self.reference_rate);
        let smoke_keep = frame_decay(self.config.smoke_drag, dt, self.reference_rate);
        let fire_visible = self.fire_scale(burst.age) > 0.0;

        for p in burst.fire.iter_mut().filter(|p| p.active) {
            p.offset += p.velocity * dt;
            p.velocity *= fire_keep;
            p.active = fire_visible;
        }
        for p in burst.smoke.iter_mut().filter(|p| p.active) {
            p.offset += p.velocity * dt;
            p.velocity *= smoke_keep;
        }

        if burst.age > self.config.max_age {
            burst.expired = true;
            for p in burst.smoke.iter_mut() {
                p.active = false;
            }
            return BurstStatus::Expired;
        }
        BurstStatus::Alive
    }

    /// Fire particle scale: shrinks linearly to zero over `fire_fade` seconds.
    pub fn fire_scale(&self, age: f32) -> f32 {
        (1.0 - age / self.config.fire_fade).max(0.0)
    }

    pub fn fire_opacity(&self, age: f32) -> f32 {
        self.fire_scale(age)
    }

    /// Smoke particle scale: grows for the life of the burst.
    pub fn smoke_scale(&self, age: f32) -> f32 {
        1.0 + 2.0 * age
    }

    /// Smoke opacity: fades linearly from 0.6 to zero at the burst's age limit.
    pub fn smoke_opacity(&self, age: f32) -> f32 {
        0.6 * (1.0 - age / self.config.max_age).max(0.0)
    }
}
