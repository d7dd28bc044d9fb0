use glam::{Mat4, Vec3};
use serde::Serialize;
use skirmish_common::{EntityId, Transform};
use skirmish_kernel::Scene;

/// Camera parameters for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraView {
    pub eye: Vec3,
    pub target: Vec3,
    pub look_at: Vec3,
    pub fov_degrees: f32,
    pub view: Mat4,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileDraw {
    pub id: EntityId,
    pub position: Vec3,
    /// Trail points, oldest first.
    pub trail: Vec<Vec3>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParticleKind {
    Fire,
    Smoke,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParticleDraw {
    pub burst: EntityId,
    pub kind: ParticleKind,
    pub position: Vec3,
    pub scale: f32,
    pub opacity: f32,
}

/// Every transform a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawList {
    pub tick: u64,
    /// `None` until the vehicle model has loaded.
    pub vehicle: Option<Transform>,
    pub ground_size: f32,
    pub camera: CameraView,
    pub projectiles: Vec<ProjectileDraw>,
    /// Visible particles only.
    pub particles: Vec<ParticleDraw>,
}

impl DrawList {
    pub fn capture(scene: &Scene) -> Self {
        let camera = scene.camera();
        let effects = scene.effects();

        let projectiles: Vec<ProjectileDraw> = scene
            .projectiles()
            .map(|(id, p)| ProjectileDraw {
                id,
                position: p.position,
                trail: p.trail().to_vec(),
            })
            .collect();

        let mut particles = Vec::new();
        for (id, burst) in scene.bursts() {
            let fire = (effects.fire_scale(burst.age), effects.fire_opacity(burst.age));
            let smoke = (effects.smoke_scale(burst.age), effects.smoke_opacity(burst.age));
            let sets = [
                (ParticleKind::Fire, burst.fire_particles(), fire),
                (ParticleKind::Smoke, burst.smoke_particles(), smoke),
            ];
            for (kind, slots, (scale, opacity)) in sets {
                particles.extend(slots.iter().filter(|p| p.active).map(|p| ParticleDraw {
                    burst: id,
                    kind,
                    position: burst.origin + p.offset,
                    scale,
                    opacity,
                }));
            }
        }

        tracing::trace!(
            tick = scene.tick(),
            projectiles = projectiles.len(),
            particles = particles.len(),
            "draw list captured"
        );
        Self {
            tick: scene.tick(),
            vehicle: scene.is_ready().then(|| scene.vehicle().transform),
            ground_size: scene.config().arena.ground_size,
            camera: CameraView {
                eye: camera.eye(),
                target: camera.target(),
                look_at: camera.look_at(),
                fov_degrees: scene.config().camera.fov_degrees,
                view: camera.view_matrix(),
            },
            projectiles,
            particles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_assets::{DeferredModelProvider, Model, StaticModelProvider};
    use skirmish_common::SimConfig;
    use skirmish_input::Key;

    const DT: f32 = 1.0 / 60.0;

    fn tank() -> Model {
        Model::box_model("tank", Vec3::new(1.0, 1.0, 2.0)).unwrap()
    }

    #[test]
    fn vehicle_hidden_until_model_loads() {
        let mut scene = Scene::mount(SimConfig::default(), DeferredModelProvider::new(tank(), 1));
        scene.step(DT);
        assert!(DrawList::capture(&scene).vehicle.is_none());
        scene.step(DT);
        assert!(DrawList::capture(&scene).vehicle.is_some());
    }

    #[test]
    fn shot_produces_projectile_and_particles() {
        let mut scene = Scene::mount(SimConfig::default(), StaticModelProvider::new(tank()));
        scene.key_down(Key::Fire);
        scene.step(DT);
        let frame = DrawList::capture(&scene);
        assert_eq!(frame.projectiles.len(), 1);
        assert_eq!(frame.projectiles[0].trail.len(), 2);
        let fire = frame
            .particles
            .iter()
            .filter(|p| p.kind == ParticleKind::Fire)
            .count();
        let smoke = frame.particles.len() - fire;
        assert_eq!((fire, smoke), (12, 8));
        assert!(frame.particles.iter().all(|p| p.opacity > 0.0));
    }

    #[test]
    fn fire_particles_drop_out_after_fade() {
        let mut scene = Scene::mount(SimConfig::default(), StaticModelProvider::new(tank()));
        scene.key_down(Key::Fire);
        for _ in 0..20 {
            scene.step(DT);
        }
        let frame = DrawList::capture(&scene);
        assert!(frame.particles.iter().all(|p| p.kind == ParticleKind::Smoke));
        assert!(!frame.particles.is_empty());
    }
}
