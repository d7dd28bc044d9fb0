use serde::{Deserialize, Serialize};

/// Canonical logical keys the simulation understands.
///
/// Arrow keys and WASD both map onto the four directions; the space bar maps to [`Key::Fire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    Forward,
    Backward,
    Left,
    Right,
    Fire,
}

impl Key {
    pub const ALL: [Key; 5] = [
        Key::Forward,
        Key::Backward,
        Key::Left,
        Key::Right,
        Key::Fire,
    ];

    /// Normalize a host key event into a canonical key.
    ///
    /// `code` is the platform's physical key code and wins for the space bar, whose
    /// textual value differs between layouts and browsers. Returns `None` for keys
    /// the simulation does not use.
    pub fn normalize(key: &str, code: &str) -> Option<Key> {
        if code == "Space" {
            return Some(Key::Fire);
        }
        let lowered = key.to_ascii_lowercase();
        match lowered.as_str() {
            "w" | "arrowup" | "up" => Some(Key::Forward),
            "s" | "arrowdown" | "down" => Some(Key::Backward),
            "a" | "arrowleft" | "left" => Some(Key::Left),
            "d" | "arrowright" | "right" => Some(Key::Right),
            " " | "space" | "spacebar" if code.is_empty() => Some(Key::Fire),
            _ => Self::from_code(code),
        }
    }

    fn from_code(code: &str) -> Option<Key> {
        match code {
            "KeyW" | "ArrowUp" => Some(Key::Forward),
            "KeyS" | "ArrowDown" => Some(Key::Backward),
            "KeyA" | "ArrowLeft" => Some(Key::Left),
            "KeyD" | "ArrowRight" => Some(Key::Right),
            _ => None,
        }
    }

    /// Short lowercase name, used by scripted hosts and logs.
    pub fn name(self) -> &'static str {
        match self {
            Key::Forward => "forward",
            Key::Backward => "backward",
            Key::Left => "left",
            Key::Right => "right",
            Key::Fire => "fire",
        }
    }
}

/// A raw keyboard event as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Textual key value, e.g. `"w"`, `"ArrowUp"`, `" "`.
    pub key: String,
    /// Physical key code, e.g. `"KeyW"`, `"Space"`. May be empty.
    pub code: String,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn down(key: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
            pressed: true,
        }
    }

    pub fn up(key: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
            pressed: false,
        }
    }

    pub fn canonical(&self) -> Option<Key> {
        Key::normalize(&self.key, &self.code)
    }
}
