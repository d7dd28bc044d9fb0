use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

use skirmish_common::EntityId;

/// Events produced by registry mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    Added(EntityId),
    Removed(EntityId),
}

/// Append / remove collection keyed by monotonic identifiers.
#[derive(Debug, Clone)]
pub struct EntityRegistry<T> {
    entries: BTreeMap<EntityId, T>,
    next_id: u64,
    pending_removals: BTreeSet<EntityId>,
    events: Vec<RegistryEvent>,
}

impl<T> Default for EntityRegistry<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 1,
            pending_removals: BTreeSet::new(),
            events: Vec::new(),
        }
    }
}

impl<T> EntityRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry under a fresh identifier.
    pub fn add(&mut self, entity: T) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, entity);
        self.events.push(RegistryEvent::Added(id));
        id
    }

    /// Remove an entry now. Unknown ids are ignored.
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        self.pending_removals.remove(&id);
        let removed = self.entries.remove(&id);
        if removed.is_some() {
            self.events.push(RegistryEvent::Removed(id));
        }
        removed
    }

    /// Queue a removal for the next [`apply_pending`](Self::apply_pending).
    ///
    /// Returns `false` if the id is unknown or already queued.
    pub fn request_removal(&mut self, id: EntityId) -> bool {
        if !self.entries.contains_key(&id) {
            return false;
        }
        self.pending_removals.insert(id)
    }

    pub fn is_pending_removal(&self, id: EntityId) -> bool {
        self.pending_removals.contains(&id)
    }

    /// Apply queued removals. Returns the removed ids in id order.
    pub fn apply_pending(&mut self) -> Vec<EntityId> {
        let pending = std::mem::take(&mut self.pending_removals);
        let mut removed = Vec::with_capacity(pending.len());
        for id in pending {
            if self.remove(id).is_some() {
                removed.push(id);
            }
        }
        if !removed.is_empty() {
            tracing::trace!(count = removed.len(), live = self.entries.len(), "applied removals");
        }
        removed
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.entries.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifier the next [`add`](Self::add) will hand out.
    pub fn next_id(&self) -> EntityId {
        EntityId(self.next_id)
    }

    /// Entries in id (= insertion) order.
    pub fn iter(&self) -> btree_map::Iter<'_, EntityId, T> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, EntityId, T> {
        self.entries.iter_mut()
    }

    /// Ids of the current entries; mutations after the call do not affect it.
    pub fn snapshot_ids(&self) -> Vec<EntityId> {
        self.entries.keys().copied().collect()
    }

    /// Drop every entry without recording per-entry events (scene teardown).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.pending_removals.clear();
    }

    /// Drain and return all pending registry events.
    pub fn drain_events(&mut self) -> Vec<RegistryEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only access to pending events.
    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }
}

impl<'a, T> IntoIterator for &'a EntityRegistry<T> {
    type Item = (&'a EntityId, &'a T);
    type IntoIter = btree_map::Iter<'a, EntityId, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic() {
        let mut reg = EntityRegistry::new();
        let a = reg.add("a");
        let b = reg.add("b");
        reg.remove(a);
        let c = reg.add("c");
        assert!(a < b && b < c);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut reg = EntityRegistry::new();
        let a = reg.add(1);
        let b = reg.add(2);
        assert_eq!(reg.remove(a), Some(1));
        assert_eq!(reg.remove(a), None);
        assert_eq!(reg.remove(EntityId(999)), None);
        assert_eq!(reg.get(b), Some(&2));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn requested_removal_waits_for_apply() {
        let mut reg = EntityRegistry::new();
        let a = reg.add(1);
        assert!(reg.request_removal(a));
        assert!(!reg.request_removal(a));
        assert!(reg.contains(a));
        assert_eq!(reg.apply_pending(), vec![a]);
        assert!(!reg.contains(a));
        assert!(reg.apply_pending().is_empty());
    }

    #[test]
    fn request_for_unknown_id_is_ignored() {
        let mut reg: EntityRegistry<u8> = EntityRegistry::new();
        assert!(!reg.request_removal(EntityId(3)));
        assert!(reg.apply_pending().is_empty());
    }

    #[test]
    fn direct_removal_cancels_queued_request() {
        let mut reg = EntityRegistry::new();
        let a = reg.add(1);
        reg.request_removal(a);
        reg.remove(a);
        assert!(reg.apply_pending().is_empty());
        let removed: Vec<_> = reg
            .events()
            .iter()
            .filter(|e| matches!(e, RegistryEvent::Removed(_)))
            .collect();
        assert_eq!(removed.len(), 1);
    }

    #[test]
    fn snapshot_is_stable_across_mutation() {
        let mut reg = EntityRegistry::new();
        let a = reg.add(1);
        let b = reg.add(2);
        let snapshot = reg.snapshot_ids();
        reg.remove(a);
        reg.add(3);
        assert_eq!(snapshot, vec![a, b]);
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut reg = EntityRegistry::new();
        for i in 0..20 {
            reg.add(i);
        }
        let values: Vec<i32> = reg.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn events_record_adds_and_removes() {
        let mut reg = EntityRegistry::new();
        let a = reg.add(());
        reg.remove(a);
        reg.remove(a);
        assert_eq!(
            reg.drain_events(),
            vec![RegistryEvent::Added(a), RegistryEvent::Removed(a)]
        );
        assert!(reg.events().is_empty());
    }

    #[test]
    fn clear_keeps_id_counter() {
        let mut reg = EntityRegistry::new();
        reg.add(0);
        reg.clear();
        assert!(reg.is_empty());
        assert_eq!(reg.add(1), EntityId(2));
    }
}
