use glam::Vec3;
use serde::{Deserialize, Serialize};
use skirmish_common::ProjectileConfig;

use crate::trail::TrailBuffer;
use crate::vehicle::FireEvent;

/// Why a projectile expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpireReason {
    /// Lived longer than the configured maximum age.
    Timeout,
    /// Dropped below the ground threshold.
    Ground,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileStatus {
    Alive,
    Expired(ExpireReason),
}

/// A ballistic shell in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Seconds since spawn.
    pub age: f32,
    trail: TrailBuffer,
}

impl Projectile {
    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }
}

/// Spawns and integrates projectiles.
#[derive(Debug, Clone)]
pub struct ProjectileSimulator {
    config: ProjectileConfig,
}

impl ProjectileSimulator {
    pub fn new(config: &ProjectileConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &ProjectileConfig {
        &self.config
    }

    /// Projectile leaving the muzzle of `fire` at launch speed.
    pub fn spawn(&self, fire: &FireEvent) -> Projectile {
        let mut trail = TrailBuffer::new(self.config.trail_capacity);
        trail.push(fire.muzzle);
        Projectile {
            position: fire.muzzle,
            velocity: fire.direction * self.config.launch_speed,
            age: 0.0,
            trail,
        }
    }

    /// Integrate one tick and report whether the projectile should be removed.
    pub fn step(&self, projectile: &mut Projectile, dt: f32) -> ProjectileStatus {
        projectile.position += projectile.velocity * dt;
        projectile.velocity.y += self.config.gravity * dt;
        projectile.age += dt;
        projectile.trail.push(projectile.position);

        if projectile.age > self.config.max_age {
            ProjectileStatus::Expired(ExpireReason::Timeout)
        } else if projectile.position.y < self.config.ground_threshold {
            ProjectileStatus::Expired(ExpireReason::Ground)
        } else {
            ProjectileStatus::Alive
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn fire(muzzle: Vec3, direction: Vec3) -> FireEvent {
        FireEvent {
            muzzle,
            direction,
            time: 0.0,
        }
    }

    fn run_until_expired(sim: &ProjectileSimulator, p: &mut Projectile) -> (usize, ExpireReason) {
        for tick in 1..10_000 {
            if let ProjectileStatus::Expired(reason) = sim.step(p, DT) {
                return (tick, reason);
            }
        }
        panic!("projectile never expired");
    }

    #[test]
    fn spawn_sets_velocity_and_single_trail_point() {
        let sim = ProjectileSimulator::new(&ProjectileConfig::default());
        let p = sim.spawn(&fire(Vec3::new(0.0, 1.0, 0.0), Vec3::Z));
        assert_eq!(p.velocity, Vec3::new(0.0, 0.0, 20.0));
        assert_eq!(p.trail().to_vec(), vec![Vec3::new(0.0, 1.0, 0.0)]);
        assert_eq!(p.age, 0.0);
    }

    #[test]
    fn gravity_bends_trajectory() {
        let sim = ProjectileSimulator::new(&ProjectileConfig::default());
        let mut p = sim.spawn(&fire(Vec3::new(0.0, 1.0, 0.0), Vec3::Z));
        sim.step(&mut p, DT);
        // Position uses the pre-gravity velocity; gravity lands on the next step.
        assert_eq!(p.position.y, 1.0);
        assert!((p.velocity.y + 9.8 * DT).abs() < 1e-6);
        sim.step(&mut p, DT);
        assert!(p.position.y < 1.0);
    }

    #[test]
    fn horizontal_shot_hits_ground_deterministically() {
        let sim = ProjectileSimulator::new(&ProjectileConfig::default());
        let mut p = sim.spawn(&fire(Vec3::new(0.0, 1.0, 0.0), Vec3::Z));
        let (ticks, reason) = run_until_expired(&sim, &mut p);
        assert_eq!(reason, ExpireReason::Ground);
        // Explicit Euler: y_n = 1 - 9.8 dt² n(n-1)/2 drops below -1 at n = 39.
        assert_eq!(ticks, 39);
        assert!((p.position.z - 13.0).abs() < 1e-3);
    }

    #[test]
    fn steep_shot_times_out() {
        let config = ProjectileConfig {
            gravity: 0.0,
            ..ProjectileConfig::default()
        };
        let sim = ProjectileSimulator::new(&config);
        let mut p = sim.spawn(&fire(Vec3::ZERO, Vec3::Y));
        let (ticks, reason) = run_until_expired(&sim, &mut p);
        assert_eq!(reason, ExpireReason::Timeout);
        assert!((300..=302).contains(&ticks));
    }

    #[test]
    fn trail_is_bounded() {
        let config = ProjectileConfig {
            gravity: 0.0,
            ..ProjectileConfig::default()
        };
        let sim = ProjectileSimulator::new(&config);
        let mut p = sim.spawn(&fire(Vec3::ZERO, Vec3::X));
        for _ in 0..200 {
            sim.step(&mut p, DT);
            assert!(p.trail().len() <= 50);
        }
        assert_eq!(p.trail().len(), 50);
        assert_eq!(p.trail().newest(), Some(p.position));
    }

    #[test]
    fn age_never_decreases() {
        let sim = ProjectileSimulator::new(&ProjectileConfig::default());
        let mut p = sim.spawn(&fire(Vec3::new(0.0, 5.0, 0.0), Vec3::Z));
        let mut last = p.age;
        for _ in 0..30 {
            sim.step(&mut p, DT);
            assert!(p.age >= last);
            last = p.age;
        }
    }
}
