use glam::Vec3;
use serde::{Deserialize, Serialize};
use skirmish_assets::Model;
use skirmish_common::{ArenaConfig, TickContext, Transform, VehicleConfig, frame_blend};
use skirmish_input::{InputState, Key};

/// The player-controlled vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub transform: Transform,
    /// Current velocity in world units per reference frame.
    pub velocity: Vec3,
    /// Velocity requested by input on the last tick, in world space.
    pub target_velocity: Vec3,
    /// Simulation time of the last successful shot.
    pub last_fire: Option<f64>,
}

impl Vehicle {
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            velocity: Vec3::ZERO,
            target_velocity: Vec3::ZERO,
            last_fire: None,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Unit vector the vehicle faces (local +Z in world space).
    pub fn forward(&self) -> Vec3 {
        self.transform
            .transform_direction(Vec3::Z)
            .try_normalize()
            .unwrap_or(Vec3::Z)
    }
}

impl Default for Vehicle {
    fn default() -> Self {
        Self::new(Transform::default())
    }
}

/// A shot fired this tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireEvent {
    pub muzzle: Vec3,
    /// Unit launch direction.
    pub direction: Vec3,
    pub time: f64,
}

/// Turns input into smoothed vehicle motion and gated fire events.
#[derive(Debug, Clone)]
pub struct VehicleController {
    config: VehicleConfig,
    half_extent: f32,
}

impl VehicleController {
    pub fn new(config: &VehicleConfig, arena: &ArenaConfig) -> Self {
        Self {
            config: config.clone(),
            half_extent: arena.half_extent,
        }
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    /// Target velocity in vehicle space: ±X for left/right, ±Z for back/forward.
    pub fn local_target(&self, input: &InputState) -> Vec3 {
        Vec3::new(
            input.axis(Key::Left, Key::Right),
            0.0,
            input.axis(Key::Backward, Key::Forward),
        ) * self.config.max_speed
    }

    /// Advance the vehicle one tick. Returns a fire event if a shot went off.
    ///
    /// Without a model (still loading) the tick is skipped entirely.
    pub fn update(
        &self,
        vehicle: &mut Vehicle,
        model: Option<&Model>,
        input: &mut InputState,
        ctx: TickContext,
    ) -> Option<FireEvent> {
        let Some(model) = model else {
            tracing::trace!("vehicle model not ready, skipping tick");
            return None;
        };

        let target = vehicle
            .transform
            .transform_direction(self.local_target(input));
        vehicle.target_velocity = target;

        let blend = if target == Vec3::ZERO {
            self.config.brake_blend
        } else {
            self.config.accel_blend
        };
        let t = frame_blend(blend, ctx.dt, self.config.reference_rate);
        vehicle.velocity = vehicle.velocity.lerp(target, t);

        let position = &mut vehicle.transform.position;
        *position += vehicle.velocity * ctx.dt * self.config.reference_rate;
        position.x = position.x.clamp(-self.half_extent, self.half_extent);
        position.z = position.z.clamp(-self.half_extent, self.half_extent);

        self.try_fire(vehicle, model, input, ctx.now)
    }

    fn try_fire(
        &self,
        vehicle: &mut Vehicle,
        model: &Model,
        input: &mut InputState,
        now: f64,
    ) -> Option<FireEvent> {
        if !input.is_held(Key::Fire) {
            return None;
        }
        let fresh = input.consume_just_pressed(Key::Fire);
        if !fresh && !self.config.auto_fire {
            return None;
        }
        if !self.cooldown_elapsed(vehicle, now) {
            return None;
        }

        let event = FireEvent {
            muzzle: self.muzzle_point(vehicle, model),
            direction: vehicle.forward(),
            time: now,
        };
        vehicle.last_fire = Some(now);
        tracing::debug!(
            muzzle = ?event.muzzle,
            direction = ?event.direction,
            time = now,
            "vehicle fired"
        );
        Some(event)
    }

    /// Whether more than the fire interval has passed since the last shot.
    pub fn cooldown_elapsed(&self, vehicle: &Vehicle, now: f64) -> bool {
        vehicle
            .last_fire
            .is_none_or(|last| now - last > self.config.fire_interval)
    }

    /// World-space muzzle point from the model's current bounding box.
    ///
    /// The box is recomputed from the model on every call.
    pub fn muzzle_point(&self, vehicle: &Vehicle, model: &Model) -> Vec3 {
        let size = model.world_bounds(&vehicle.transform).size();
        let local = Vec3::new(
            0.0,
            size.y * self.config.muzzle_height_factor,
            size.z * self.config.muzzle_depth_factor,
        );
        vehicle.position() + vehicle.transform.transform_direction(local)
    }
}
