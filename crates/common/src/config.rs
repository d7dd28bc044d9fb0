use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Errors from loading or validating a [`SimConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be zero or positive, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must lie in (0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f64 },
    #[error("camera distance range is empty: min {min} > max {max}")]
    EmptyDistanceRange { min: f32, max: f32 },
}

/// Complete tuning for one mounted scene.
///
/// Every section defaults independently so a partial YAML file only overrides
/// the keys it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the particle spawn RNG.
    pub seed: u64,
    pub arena: ArenaConfig,
    pub vehicle: VehicleConfig,
    pub projectile: ProjectileConfig,
    pub effect: EffectConfig,
    pub camera: CameraConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            arena: ArenaConfig::default(),
            vehicle: VehicleConfig::default(),
            projectile: ProjectileConfig::default(),
            effect: EffectConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

/// Ground plane bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Vehicle positions are clamped to `[-half_extent, half_extent]` on X and Z.
    pub half_extent: f32,
    /// Side length of the drawn ground grid.
    pub ground_size: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            half_extent: 9.0,
            ground_size: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Speed per reference frame on each local axis.
    pub max_speed: f32,
    /// Velocity blend per reference frame while a direction is held.
    pub accel_blend: f32,
    /// Velocity blend per reference frame while no direction is held.
    pub brake_blend: f32,
    /// Updates per second that `max_speed` and the blends are tuned against.
    pub reference_rate: f32,
    /// Minimum seconds between two shots.
    pub fire_interval: f64,
    /// Re-arm the fire key while it stays held instead of requiring a fresh press.
    ///
    /// Off: holding fire shoots once. On: a 2 s hold shoots 4 times at the
    /// default `fire_interval`.
    pub auto_fire: bool,
    pub muzzle_height_factor: f32,
    pub muzzle_depth_factor: f32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            max_speed: 0.1,
            accel_blend: 0.1,
            brake_blend: 0.15,
            reference_rate: 60.0,
            fire_interval: 0.5,
            auto_fire: false,
            muzzle_height_factor: 0.6,
            muzzle_depth_factor: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub launch_speed: f32,
    /// Vertical acceleration in units/s² (negative is down).
    pub gravity: f32,
    /// Seconds after which a projectile expires.
    pub max_age: f32,
    /// Projectiles whose height drops below this expire.
    pub ground_threshold: f32,
    pub trail_capacity: usize,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            launch_speed: 20.0,
            gravity: -9.8,
            max_age: 5.0,
            ground_threshold: -1.0,
            trail_capacity: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    pub fire_count: usize,
    pub smoke_count: usize,
    /// Seconds after which a whole burst expires.
    pub max_age: f32,
    /// Radius of the disc particles are scattered over at spawn.
    pub spawn_radius: f32,
    /// Velocity retained per reference frame by fire particles.
    pub fire_drag: f32,
    /// Velocity retained per reference frame by smoke particles.
    pub smoke_drag: f32,
    /// Seconds for fire particles to shrink and fade to nothing.
    pub fire_fade: f32,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            fire_count: 12,
            smoke_count: 8,
            max_age: 0.6,
            spawn_radius: 0.1,
            fire_drag: 0.9,
            smoke_drag: 0.95,
            fire_fade: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Orbit target blend per reference frame.
    pub target_blend: f32,
    /// Look point blend per reference frame.
    pub look_blend: f32,
    /// Distance ahead of the vehicle the camera looks toward.
    pub look_ahead: f32,
    /// Initial eye offset from the orbit target.
    pub offset: Vec3,
    pub fov_degrees: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Largest angle between the eye offset and +Y, in radians.
    pub max_polar_angle: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            target_blend: 0.1,
            look_blend: 0.05,
            look_ahead: 5.0,
            offset: Vec3::new(5.0, 5.0, 5.0),
            fov_degrees: 50.0,
            min_distance: 3.0,
            max_distance: 20.0,
            max_polar_angle: std::f32::consts::FRAC_PI_2,
        }
    }
}

impl SimConfig {
    /// Parse a YAML document and validate the result.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("arena.half_extent", self.arena.half_extent as f64)?;
        positive("arena.ground_size", self.arena.ground_size as f64)?;

        let v = &self.vehicle;
        positive("vehicle.max_speed", v.max_speed as f64)?;
        positive("vehicle.reference_rate", v.reference_rate as f64)?;
        positive("vehicle.fire_interval", v.fire_interval)?;
        unit("vehicle.accel_blend", v.accel_blend)?;
        unit("vehicle.brake_blend", v.brake_blend)?;

        let p = &self.projectile;
        positive("projectile.launch_speed", p.launch_speed as f64)?;
        positive("projectile.max_age", p.max_age as f64)?;
        positive("projectile.trail_capacity", p.trail_capacity as f64)?;

        let e = &self.effect;
        positive("effect.max_age", e.max_age as f64)?;
        positive("effect.fire_fade", e.fire_fade as f64)?;
        non_negative("effect.spawn_radius", e.spawn_radius as f64)?;
        unit("effect.fire_drag", e.fire_drag)?;
        unit("effect.smoke_drag", e.smoke_drag)?;

        let c = &self.camera;
        unit("camera.target_blend", c.target_blend)?;
        unit("camera.look_blend", c.look_blend)?;
        positive("camera.fov_degrees", c.fov_degrees as f64)?;
        positive("camera.min_distance", c.min_distance as f64)?;
        positive("camera.max_polar_angle", c.max_polar_angle as f64)?;
        if c.min_distance > c.max_distance {
            return Err(ConfigError::EmptyDistanceRange {
                min: c.min_distance,
                max: c.max_distance,
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange {
            field,
            value: value as f64,
        })
    }
}
