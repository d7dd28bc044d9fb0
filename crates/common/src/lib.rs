//! Shared types, the per-tick context and the simulation configuration tree.
//!
//! # Invariants
//! - Entity identifiers are allocated monotonically and never reused.
//! - All timing is expressed in accumulated simulation seconds, never wall-clock.

pub mod config;
pub mod types;

pub use config::{
    ArenaConfig, CameraConfig, ConfigError, EffectConfig, ProjectileConfig, SimConfig,
    VehicleConfig,
};
pub use types::{Aabb, EntityId, TickContext, Transform};

/// Blend factor for one tick of length `dt`, given a factor tuned per reference frame.
///
/// At exactly one reference frame (`dt * rate == 1`) this returns `factor` unchanged.
pub fn frame_blend(factor: f32, dt: f32, reference_rate: f32) -> f32 {
    let frames = (dt * reference_rate).max(0.0);
    1.0 - (1.0 - factor.clamp(0.0, 1.0)).powf(frames)
}

/// Per-tick retention factor (`drag` per reference frame) scaled to a tick of length `dt`.
pub fn frame_decay(drag: f32, dt: f32, reference_rate: f32) -> f32 {
    drag.clamp(0.0, 1.0).powf((dt * reference_rate).max(0.0))
}
