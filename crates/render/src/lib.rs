//! Rendering adapter: renderer-agnostic draw list and a debug text renderer.
//!
//! # Invariants
//! - Renderers read scene state; they never mutate it.
//! - Everything a renderer needs per frame is in the [`DrawList`].

mod draw;
mod renderer;

pub use draw::{CameraView, DrawList, ParticleDraw, ParticleKind, ProjectileDraw};
pub use renderer::{DebugTextRenderer, DrawListRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "skirmish-render v0.1.0"
}
