//! Entity registry: the sole owner of live transient entities.
//!
//! Entries are stored in a BTreeMap keyed by monotonically allocated ids, so
//! iteration order equals insertion order and is deterministic across runs.
//!
//! # Invariants
//! - Identifiers are never reused.
//! - Removal is idempotent: removing an unknown id is a no-op.
//! - Removals requested while the registry is being walked take effect only
//!   when [`EntityRegistry::apply_pending`] runs.

mod registry;

pub use registry::{EntityRegistry, RegistryEvent};

pub fn crate_info() -> &'static str {
    "skirmish-ecs v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("ecs"));
    }
}
