//! Scene kernel: one mounted scene and its fixed per-tick update order.
//!
//! # Invariants
//! - Each tick runs input → vehicle → fire dispatch → projectiles → effects → camera.
//! - The registry is the only owner of projectiles and bursts; expiries are
//!   queued during the pass and applied before the tick returns.
//! - Given the same seed, model and input timeline, two scenes produce identical states.

pub mod entity;
pub mod scene;

pub use entity::{EntityKind, SceneEntity};
pub use scene::{Scene, SceneEvent};

pub fn crate_info() -> &'static str {
    "skirmish-kernel v0.1.0"
}
