use glam::Vec3;
use serde::{Deserialize, Serialize};
use skirmish_sim::{EffectBurst, Projectile};

/// A registry entry owned by the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEntity {
    Projectile(Projectile),
    Effect(EffectBurst),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Projectile,
    Effect,
}

impl SceneEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Projectile(_) => EntityKind::Projectile,
            Self::Effect(_) => EntityKind::Effect,
        }
    }

    /// Current position (burst origin for effects).
    pub fn position(&self) -> Vec3 {
        match self {
            Self::Projectile(p) => p.position,
            Self::Effect(b) => b.origin,
        }
    }

    pub fn as_projectile(&self) -> Option<&Projectile> {
        match self {
            Self::Projectile(p) => Some(p),
            Self::Effect(_) => None,
        }
    }

    pub fn as_effect(&self) -> Option<&EffectBurst> {
        match self {
            Self::Effect(b) => Some(b),
            Self::Projectile(_) => None,
        }
    }
}
