//! Simulation components: vehicle control, ballistic projectiles, particle
//! bursts and the follow camera.
//!
//! Every component is a plain struct advanced by an explicit `update` / `step`
//! call with the current [`skirmish_common::TickContext`] or `dt`. None of them
//! owns the entity registry; they report expiry and the caller removes.
//!
//! # Invariants
//! - Vehicle position stays inside the arena on X and Z.
//! - Trail length never exceeds its capacity.
//! - Burst particle counts are fixed at spawn.

pub mod camera;
pub mod effect;
pub mod projectile;
pub mod trail;
pub mod vehicle;

pub use camera::CameraRig;
pub use effect::{BurstStatus, EffectBurst, EffectSimulator, Particle};
pub use projectile::{ExpireReason, Projectile, ProjectileSimulator, ProjectileStatus};
pub use trail::TrailBuffer;
pub use vehicle::{FireEvent, Vehicle, VehicleController};

pub fn crate_info() -> &'static str {
    "skirmish-sim v0.1.0"
}
