use skirmish_kernel::Scene;

use crate::draw::{DrawList, ParticleKind};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene and produces output for one frame. It never
/// mutates the scene; simulation state is kernel-owned.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the current scene state.
    fn render(&self, scene: &Scene) -> Self::Output;
}

/// Renderer that hands back the raw [`DrawList`], for hosts with their own pipeline.
#[derive(Debug, Default)]
pub struct DrawListRenderer;

impl Renderer for DrawListRenderer {
    type Output = DrawList;

    fn render(&self, scene: &Scene) -> DrawList {
        DrawList::capture(scene)
    }
}

/// Human-readable frame dump used by the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Include one line per visible particle.
    pub verbose: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene) -> String {
        let frame = DrawList::capture(scene);
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame (tick={}, t={:.3}s) ===\n",
            frame.tick,
            scene.clock()
        ));
        match frame.vehicle {
            Some(t) => {
                let v = scene.vehicle().velocity;
                out.push_str(&format!(
                    "Vehicle: pos=({:.2}, {:.2}, {:.2}) vel=({:.3}, {:.3}, {:.3})\n",
                    t.position.x, t.position.y, t.position.z, v.x, v.y, v.z
                ));
            }
            None => out.push_str("Vehicle: loading\n"),
        }
        let c = frame.camera;
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            c.eye.x, c.eye.y, c.eye.z, c.target.x, c.target.y, c.target.z, c.fov_degrees
        ));
        out.push_str(&format!("Projectiles: {}\n", frame.projectiles.len()));
        for p in &frame.projectiles {
            out.push_str(&format!(
                "  [{}] pos=({:.2}, {:.2}, {:.2}) trail={}\n",
                p.id,
                p.position.x,
                p.position.y,
                p.position.z,
                p.trail.len()
            ));
        }
        let bursts = scene.bursts().count();
        let fire = frame
            .particles
            .iter()
            .filter(|p| p.kind == ParticleKind::Fire)
            .count();
        out.push_str(&format!(
            "Bursts: {} (fire={}, smoke={})\n",
            bursts,
            fire,
            frame.particles.len() - fire
        ));
        if self.verbose {
            for p in &frame.particles {
                out.push_str(&format!(
                    "  [{}] {:?} pos=({:.2}, {:.2}, {:.2}) scale={:.2} alpha={:.2}\n",
                    p.burst, p.kind, p.position.x, p.position.y, p.position.z, p.scale, p.opacity
                ));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use skirmish_assets::{DeferredModelProvider, Model, StaticModelProvider};
    use skirmish_common::SimConfig;
    use skirmish_input::Key;

    fn tank() -> Model {
        Model::box_model("tank", Vec3::new(1.0, 1.0, 2.0)).unwrap()
    }

    #[test]
    fn loading_scene_renders_placeholder() {
        let mut scene = Scene::mount(SimConfig::default(), DeferredModelProvider::new(tank(), 10));
        scene.step(1.0 / 60.0);
        let out = DebugTextRenderer::new().render(&scene);
        assert!(out.contains("tick=1"));
        assert!(out.contains("Vehicle: loading"));
        assert!(out.contains("Projectiles: 0"));
    }

    #[test]
    fn renders_live_entities() {
        let mut scene = Scene::mount(SimConfig::default(), StaticModelProvider::new(tank()));
        scene.key_down(Key::Fire);
        scene.step(1.0 / 60.0);
        let out = DebugTextRenderer::verbose().render(&scene);
        assert!(out.contains("Projectiles: 1"));
        assert!(out.contains("trail=2"));
        assert!(out.contains("Bursts: 1 (fire=12, smoke=8)"));
        assert!(out.contains("Smoke pos="));
    }

    #[test]
    fn draw_list_renderer_matches_capture() {
        let mut scene = Scene::mount(SimConfig::default(), StaticModelProvider::new(tank()));
        scene.step(1.0 / 60.0);
        assert_eq!(DrawListRenderer.render(&scene), DrawList::capture(&scene));
    }
}
