//! Keyboard input: canonical key symbols, held / just-pressed state, listener lifetime.
//!
//! # Invariants
//! - Raw key names are normalized once, at the edge; the simulation only sees [`Key`].
//! - Unrecognized keys are ignored without error.
//! - A just-pressed edge is reported at most once per physical press.

pub mod key;
pub mod state;
pub mod subscription;

pub use key::{Key, KeyEvent};
pub use state::InputState;
pub use subscription::Subscription;

pub fn crate_info() -> &'static str {
    "skirmish-input v0.1.0"
}
