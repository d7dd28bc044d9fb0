use std::collections::HashSet;

use crate::key::{Key, KeyEvent};

/// Held keys plus edge-triggered "just pressed" flags.
///
/// A press sets the edge only on the unheld → held transition, so host key
/// auto-repeat never re-arms it. Consumers clear the edge with
/// [`InputState::consume_just_pressed`].
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn on_key_up(&mut self, key: Key) {
        self.held.remove(&key);
        self.just_pressed.remove(&key);
    }

    /// Apply a raw host event. Returns the canonical key it mapped to, if any.
    pub fn handle_event(&mut self, event: &KeyEvent) -> Option<Key> {
        let Some(key) = event.canonical() else {
            tracing::trace!(key = %event.key, code = %event.code, "ignoring unmapped key");
            return None;
        };
        if event.pressed {
            self.on_key_down(key);
        } else {
            self.on_key_up(key);
        }
        Some(key)
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Read the edge without clearing it.
    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Return and clear the just-pressed edge for `key`.
    pub fn consume_just_pressed(&mut self, key: Key) -> bool {
        self.just_pressed.remove(&key)
    }

    /// Signed axis value from a negative / positive key pair: -1, 0 or 1.
    pub fn axis(&self, negative: Key, positive: Key) -> f32 {
        let mut value = 0.0;
        if self.is_held(positive) {
            value += 1.0;
        }
        if self.is_held(negative) {
            value -= 1.0;
        }
        value
    }

    pub fn held_count(&self) -> usize {
        self.held.len()
    }

    /// Forget every held key and pending edge (listener detached).
    pub fn clear(&mut self) {
        self.held.clear();
        self.just_pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_sets_held_and_edge() {
        let mut input = InputState::new();
        input.on_key_down(Key::Fire);
        assert!(input.is_held(Key::Fire));
        assert!(input.is_just_pressed(Key::Fire));
    }

    #[test]
    fn consume_reads_then_clears() {
        let mut input = InputState::new();
        input.on_key_down(Key::Fire);
        assert!(input.consume_just_pressed(Key::Fire));
        assert!(!input.consume_just_pressed(Key::Fire));
        assert!(input.is_held(Key::Fire));
    }

    #[test]
    fn repeated_key_down_does_not_rearm_edge() {
        let mut input = InputState::new();
        input.on_key_down(Key::Fire);
        assert!(input.consume_just_pressed(Key::Fire));
        for _ in 0..10 {
            input.on_key_down(Key::Fire);
            assert!(!input.consume_just_pressed(Key::Fire));
        }
    }

    #[test]
    fn release_and_press_rearms_edge() {
        let mut input = InputState::new();
        input.on_key_down(Key::Fire);
        input.consume_just_pressed(Key::Fire);
        input.on_key_up(Key::Fire);
        assert!(!input.is_held(Key::Fire));
        input.on_key_down(Key::Fire);
        assert!(input.consume_just_pressed(Key::Fire));
    }

    #[test]
    fn key_up_clears_unconsumed_edge() {
        let mut input = InputState::new();
        input.on_key_down(Key::Fire);
        input.on_key_up(Key::Fire);
        assert!(!input.consume_just_pressed(Key::Fire));
    }

    #[test]
    fn raw_events_are_normalized() {
        let mut input = InputState::new();
        assert_eq!(
            input.handle_event(&KeyEvent::down("ArrowUp", "ArrowUp")),
            Some(Key::Forward)
        );
        assert!(input.is_held(Key::Forward));
        assert_eq!(input.handle_event(&KeyEvent::down("q", "KeyQ")), None);
        assert_eq!(input.held_count(), 1);
        input.handle_event(&KeyEvent::up("w", "KeyW"));
        assert!(!input.is_held(Key::Forward));
    }

    #[test]
    fn opposite_keys_cancel_on_axis() {
        let mut input = InputState::new();
        input.on_key_down(Key::Left);
        assert_eq!(input.axis(Key::Left, Key::Right), -1.0);
        input.on_key_down(Key::Right);
        assert_eq!(input.axis(Key::Left, Key::Right), 0.0);
    }

    #[test]
    fn clear_resets_everything() {
        let mut input = InputState::new();
        input.on_key_down(Key::Forward);
        input.on_key_down(Key::Fire);
        input.clear();
        assert_eq!(input.held_count(), 0);
        assert!(!input.is_just_pressed(Key::Fire));
    }
}
