use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use skirmish_assets::{Model, ModelProvider};
use skirmish_common::{EntityId, SimConfig, TickContext, Transform};
use skirmish_ecs::EntityRegistry;
use skirmish_input::{InputState, Key, KeyEvent, Subscription};
use skirmish_sim::{
    BurstStatus, CameraRig, EffectBurst, EffectSimulator, ExpireReason, FireEvent, Projectile,
    ProjectileSimulator, ProjectileStatus, Vehicle, VehicleController,
};

use crate::entity::SceneEntity;

/// Something that happened during a tick.
///
/// Returned from [`Scene::step`] and appended to the scene's event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    /// The vehicle model finished loading; the vehicle starts responding.
    ModelReady { tick: u64 },
    /// A shot went off, spawning a projectile and a muzzle burst.
    Fired {
        tick: u64,
        time: f64,
        muzzle: Vec3,
        direction: Vec3,
        projectile: EntityId,
        burst: EntityId,
    },
    ProjectileExpired {
        tick: u64,
        id: EntityId,
        reason: ExpireReason,
    },
    BurstExpired { tick: u64, id: EntityId },
}

/// One mounted scene: the vehicle, its input, live entities and the camera.
///
/// Nothing here is shared between mounts. Dropping the scene (or calling
/// [`Scene::unmount`]) releases the keyboard subscription and discards every
/// outstanding projectile and burst.
pub struct Scene {
    config: SimConfig,
    tick: u64,
    /// Accumulated simulation seconds since mount.
    clock: f64,
    input: InputState,
    vehicle: Vehicle,
    provider: Option<Box<dyn ModelProvider>>,
    model: Option<Model>,
    controller: VehicleController,
    projectiles: ProjectileSimulator,
    effects: EffectSimulator,
    camera: CameraRig,
    registry: EntityRegistry<SceneEntity>,
    rng: ChaCha8Rng,
    event_log: Vec<SceneEvent>,
    subscription: Option<Subscription>,
}

impl Scene {
    /// Mount a scene with the vehicle at the origin.
    pub fn mount(config: SimConfig, provider: impl ModelProvider + 'static) -> Self {
        Self::mount_at(config, provider, Transform::default())
    }

    /// Mount a scene with the vehicle starting at `start`.
    pub fn mount_at(
        config: SimConfig,
        provider: impl ModelProvider + 'static,
        start: Transform,
    ) -> Self {
        let rate = config.vehicle.reference_rate;
        let mut camera = CameraRig::new(&config.camera, rate);
        camera.snap_to(&start);
        tracing::debug!(seed = config.seed, position = ?start.position, "mounting scene");
        Self {
            controller: VehicleController::new(&config.vehicle, &config.arena),
            projectiles: ProjectileSimulator::new(&config.projectile),
            effects: EffectSimulator::new(&config.effect, rate),
            camera,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            tick: 0,
            clock: 0.0,
            input: InputState::new(),
            vehicle: Vehicle::new(start),
            provider: Some(Box::new(provider)),
            model: None,
            registry: EntityRegistry::new(),
            event_log: Vec::new(),
            subscription: None,
        }
    }

    /// Hold the host's keyboard listener for the lifetime of this mount.
    pub fn attach_input(&mut self, subscription: Subscription) {
        tracing::debug!(label = subscription.label(), "keyboard listener attached");
        // Replacing a previous subscription drops (and detaches) it.
        self.subscription = Some(subscription);
    }

    pub fn is_input_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Feed a raw host key event. Unmapped keys are ignored.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> Option<Key> {
        self.input.handle_event(event)
    }

    pub fn key_down(&mut self, key: Key) {
        self.input.on_key_down(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.input.on_key_up(key);
    }

    /// Advance the scene by `dt` seconds. Returns this tick's events.
    pub fn step(&mut self, dt: f32) -> Vec<SceneEvent> {
        self.tick += 1;
        let _span = tracing::trace_span!("scene_step", tick = self.tick).entered();
        let ctx = TickContext::new(dt, self.clock);
        let mut events = Vec::new();

        self.poll_model(&mut events);

        let fire = self.controller.update(
            &mut self.vehicle,
            self.model.as_ref(),
            &mut self.input,
            ctx,
        );
        if let Some(fire) = fire {
            self.dispatch_fire(&fire, &mut events);
        }

        self.step_projectiles(dt, &mut events);
        self.step_effects(dt, &mut events);
        self.registry.apply_pending();
        // Spawn and expiry already live in the scene log.
        self.registry.drain_events();

        if self.model.is_some() {
            self.camera.update(&self.vehicle.transform, dt);
        }

        self.clock += dt as f64;
        self.event_log.extend(events.iter().cloned());
        events
    }

    fn poll_model(&mut self, events: &mut Vec<SceneEvent>) {
        let Some(provider) = self.provider.as_mut() else {
            return;
        };
        match provider.poll() {
            Ok(Some(model)) => {
                tracing::info!(model = model.name(), tick = self.tick, "vehicle model ready");
                self.model = Some(model);
                self.provider = None;
                events.push(SceneEvent::ModelReady { tick: self.tick });
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, tick = self.tick, "vehicle model unavailable");
            }
        }
    }

    fn dispatch_fire(&mut self, fire: &FireEvent, events: &mut Vec<SceneEvent>) {
        let projectile = self
            .registry
            .add(SceneEntity::Projectile(self.projectiles.spawn(fire)));
        let burst = self
            .registry
            .add(SceneEntity::Effect(self.effects.spawn(&mut self.rng, fire)));
        events.push(SceneEvent::Fired {
            tick: self.tick,
            time: fire.time,
            muzzle: fire.muzzle,
            direction: fire.direction,
            projectile,
            burst,
        });
    }

    fn step_projectiles(&mut self, dt: f32, events: &mut Vec<SceneEvent>) {
        let mut expired = Vec::new();
        for (id, entity) in self.registry.iter_mut() {
            let SceneEntity::Projectile(projectile) = entity else {
                continue;
            };
            if let ProjectileStatus::Expired(reason) = self.projectiles.step(projectile, dt) {
                expired.push((*id, reason));
            }
        }
        for (id, reason) in expired {
            if self.registry.request_removal(id) {
                tracing::debug!(%id, ?reason, "projectile expired");
                events.push(SceneEvent::ProjectileExpired {
                    tick: self.tick,
                    id,
                    reason,
                });
            }
        }
    }

    fn step_effects(&mut self, dt: f32, events: &mut Vec<SceneEvent>) {
        let mut expired = Vec::new();
        for (id, entity) in self.registry.iter_mut() {
            let SceneEntity::Effect(burst) = entity else {
                continue;
            };
            if self.effects.step(burst, dt) == BurstStatus::Expired {
                expired.push(*id);
            }
        }
        for id in expired {
            if self.registry.request_removal(id) {
                tracing::debug!(%id, "burst expired");
                events.push(SceneEvent::BurstExpired {
                    tick: self.tick,
                    id,
                });
            }
        }
    }

    /// Tear the scene down: detach input and discard live entities.
    ///
    /// Returns how many entities were discarded.
    pub fn unmount(mut self) -> usize {
        let discarded = self.registry.len();
        self.release();
        tracing::info!(tick = self.tick, discarded, "scene unmounted");
        discarded
    }

    fn release(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.detach();
        }
        self.input.clear();
        self.registry.clear();
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Accumulated simulation seconds.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut CameraRig {
        &mut self.camera
    }

    pub fn effects(&self) -> &EffectSimulator {
        &self.effects
    }

    pub fn registry(&self) -> &EntityRegistry<SceneEntity> {
        &self.registry
    }

    pub fn projectiles(&self) -> impl Iterator<Item = (EntityId, &Projectile)> {
        self.registry
            .iter()
            .filter_map(|(id, e)| e.as_projectile().map(|p| (*id, p)))
    }

    pub fn bursts(&self) -> impl Iterator<Item = (EntityId, &EffectBurst)> {
        self.registry
            .iter()
            .filter_map(|(id, e)| e.as_effect().map(|b| (*id, b)))
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[SceneEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Deterministic hash of the simulation state, for comparing runs.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let mix_vec = |h: &mut u64, v: Vec3| {
            for c in v.to_array() {
                mix(h, &c.to_le_bytes());
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        mix(&mut h, &self.clock.to_le_bytes());
        mix_vec(&mut h, self.vehicle.transform.position);
        mix_vec(&mut h, self.vehicle.velocity);
        mix_vec(&mut h, self.camera.target());
        for (id, entity) in self.registry.iter() {
            mix(&mut h, &id.0.to_le_bytes());
            match entity {
                SceneEntity::Projectile(p) => {
                    mix_vec(&mut h, p.position);
                    mix_vec(&mut h, p.velocity);
                }
                SceneEntity::Effect(b) => {
                    mix(&mut h, &b.age.to_le_bytes());
                    for p in b.fire_particles().iter().chain(b.smoke_particles()) {
                        mix_vec(&mut h, p.offset);
                    }
                }
            }
        }
        h
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("tick", &self.tick)
            .field("clock", &self.clock)
            .field("ready", &self.is_ready())
            .field("vehicle", &self.vehicle.transform.position)
            .field("entities", &self.registry.len())
            .finish()
    }
}
