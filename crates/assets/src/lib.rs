//! Model provider seam: a loaded mesh hierarchy and its bounding box.
//!
//! The simulation never parses assets. A host hands it a [`ModelProvider`]
//! that reports "still loading" until a [`Model`] is available; each mounted
//! scene then keeps its own instance of the hierarchy.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use skirmish_common::{Aabb, Transform};

/// Errors from model construction or loading.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssetError {
    #[error("model {0:?} has no mesh bounds")]
    EmptyModel(String),
    #[error("node {node} references parent {parent}, which does not precede it")]
    InvalidHierarchy { node: usize, parent: usize },
    #[error("node {0} has an inverted or non-finite bounding box")]
    InvalidBounds(usize),
    #[error("model failed to load: {0}")]
    LoadFailed(String),
}

/// One node of a model hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelNode {
    pub name: String,
    /// Index of the parent node; parents always precede their children.
    pub parent: Option<usize>,
    /// Transform relative to the parent (or to the model root).
    pub local: Transform,
    /// Mesh extents in node space, if the node carries geometry.
    pub mesh_bounds: Option<Aabb>,
}

/// A loaded mesh hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    name: String,
    nodes: Vec<ModelNode>,
}

impl Model {
    /// Build a model, validating hierarchy order and bounding boxes.
    pub fn new(name: impl Into<String>, nodes: Vec<ModelNode>) -> Result<Self, AssetError> {
        let name = name.into();
        for (index, node) in nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                if parent >= index {
                    return Err(AssetError::InvalidHierarchy {
                        node: index,
                        parent,
                    });
                }
            }
            if let Some(bounds) = node.mesh_bounds {
                if !bounds.is_valid() {
                    return Err(AssetError::InvalidBounds(index));
                }
            }
        }
        if nodes.iter().all(|n| n.mesh_bounds.is_none()) {
            return Err(AssetError::EmptyModel(name));
        }
        Ok(Self { name, nodes })
    }

    /// Single-node box model sitting on the ground plane, centred on the origin.
    pub fn box_model(name: impl Into<String>, size: Vec3) -> Result<Self, AssetError> {
        let half = size * 0.5;
        Self::new(
            name,
            vec![ModelNode {
                name: "body".into(),
                parent: None,
                local: Transform::default(),
                mesh_bounds: Some(Aabb::new(
                    Vec3::new(-half.x, 0.0, -half.z),
                    Vec3::new(half.x, size.y, half.z),
                )),
            }],
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[ModelNode] {
        &self.nodes
    }

    /// Mutable node access, e.g. to animate a turret on this instance only.
    pub fn node_mut(&mut self, index: usize) -> Option<&mut ModelNode> {
        self.nodes.get_mut(index)
    }

    /// Root-relative transform of every node, in hierarchy order.
    pub fn node_transforms(&self) -> Vec<Transform> {
        let mut resolved: Vec<Transform> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let t = match node.parent {
                Some(parent) => resolved[parent].compose(&node.local),
                None => node.local,
            };
            resolved.push(t);
        }
        resolved
    }

    /// Bounding box of all meshes in model space.
    pub fn local_bounds(&self) -> Aabb {
        self.world_bounds(&Transform::default())
    }

    /// Bounding box of all meshes with the model placed at `root`.
    ///
    /// Recomputed from the hierarchy on every call, so per-instance node
    /// edits are reflected.
    pub fn world_bounds(&self, root: &Transform) -> Aabb {
        let transforms = self.node_transforms();
        let mut bounds: Option<Aabb> = None;
        for (node, local) in self.nodes.iter().zip(&transforms) {
            let Some(mesh) = node.mesh_bounds else {
                continue;
            };
            let placed = mesh.transformed(&root.compose(local));
            bounds = Some(match bounds {
                Some(b) => b.union(&placed),
                None => placed,
            });
        }
        // Model::new guarantees at least one mesh.
        bounds.unwrap_or(Aabb::new(root.position, root.position))
    }
}

/// Source of the controlled vehicle's model.
///
/// `Ok(None)` means "still loading": callers skip the tick and poll again later.
pub trait ModelProvider {
    fn poll(&mut self) -> Result<Option<Model>, AssetError>;
}

/// Provider whose model is available immediately.
#[derive(Debug, Clone)]
pub struct StaticModelProvider {
    model: Model,
}

impl StaticModelProvider {
    pub fn new(model: Model) -> Self {
        Self { model }
    }
}

impl ModelProvider for StaticModelProvider {
    fn poll(&mut self) -> Result<Option<Model>, AssetError> {
        Ok(Some(self.model.clone()))
    }
}

/// Provider that reports "loading" for a number of polls before yielding its model.
///
/// Stands in for an asynchronous loader in headless hosts and tests.
#[derive(Debug, Clone)]
pub struct DeferredModelProvider {
    model: Model,
    pending_polls: u32,
    failures: Vec<String>,
}

impl DeferredModelProvider {
    pub fn new(model: Model, pending_polls: u32) -> Self {
        Self {
            model,
            pending_polls,
            failures: Vec::new(),
        }
    }

    /// Fail the next polls with these messages before continuing to load.
    pub fn with_failures(mut self, failures: impl IntoIterator<Item = String>) -> Self {
        self.failures = failures.into_iter().collect();
        self.failures.reverse();
        self
    }
}

impl ModelProvider for DeferredModelProvider {
    fn poll(&mut self) -> Result<Option<Model>, AssetError> {
        if let Some(message) = self.failures.pop() {
            return Err(AssetError::LoadFailed(message));
        }
        if self.pending_polls > 0 {
            self.pending_polls -= 1;
            tracing::trace!(remaining = self.pending_polls, "model still loading");
            return Ok(None);
        }
        Ok(Some(self.model.clone()))
    }
}

pub fn crate_info() -> &'static str {
    "skirmish-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn tank() -> Model {
        Model::new(
            "tank",
            vec![
                ModelNode {
                    name: "hull".into(),
                    parent: None,
                    local: Transform::default(),
                    mesh_bounds: Some(Aabb::new(
                        Vec3::new(-1.0, 0.0, -1.5),
                        Vec3::new(1.0, 0.8, 1.5),
                    )),
                },
                ModelNode {
                    name: "turret".into(),
                    parent: Some(0),
                    local: Transform::from_position(Vec3::new(0.0, 0.8, 0.0)),
                    mesh_bounds: Some(Aabb::new(
                        Vec3::new(-0.5, 0.0, -0.5),
                        Vec3::new(0.5, 0.6, 0.5),
                    )),
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn bounds_cover_child_nodes() {
        let bounds = tank().local_bounds();
        assert!((bounds.max.y - 1.4).abs() < 1e-5);
        assert!((bounds.size().z - 3.0).abs() < 1e-5);
    }

    #[test]
    fn world_bounds_follow_root_rotation() {
        let root = Transform {
            position: Vec3::new(3.0, 0.0, 0.0),
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            scale: Vec3::ONE,
        };
        let bounds = tank().world_bounds(&root);
        assert!((bounds.size().x - 3.0).abs() < 1e-4);
        assert!((bounds.size().z - 2.0).abs() < 1e-4);
        assert!((bounds.center().x - 3.0).abs() < 1e-4);
    }

    #[test]
    fn instance_edits_change_bounds() {
        let mut model = tank();
        let before = model.local_bounds();
        model.node_mut(1).unwrap().local.position.y = 2.0;
        assert!(model.local_bounds().max.y > before.max.y);
    }

    #[test]
    fn rejects_forward_parent_reference() {
        let err = Model::new(
            "bad",
            vec![ModelNode {
                name: "a".into(),
                parent: Some(0),
                local: Transform::default(),
                mesh_bounds: Some(Aabb::new(Vec3::ZERO, Vec3::ONE)),
            }],
        )
        .unwrap_err();
        assert_eq!(err, AssetError::InvalidHierarchy { node: 0, parent: 0 });
    }

    #[test]
    fn rejects_inverted_bounds_and_empty_models() {
        let inverted = Model::new(
            "bad",
            vec![ModelNode {
                name: "a".into(),
                parent: None,
                local: Transform::default(),
                mesh_bounds: Some(Aabb::new(Vec3::ONE, Vec3::ZERO)),
            }],
        );
        assert_eq!(inverted.unwrap_err(), AssetError::InvalidBounds(0));
        assert!(matches!(
            Model::new("empty", Vec::new()),
            Err(AssetError::EmptyModel(_))
        ));
    }

    #[test]
    fn box_model_rests_on_ground() {
        let model = Model::box_model("box", Vec3::new(1.0, 1.0, 2.0)).unwrap();
        let bounds = model.local_bounds();
        assert_eq!(bounds.min.y, 0.0);
        assert_eq!(bounds.size(), Vec3::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn deferred_provider_loads_after_pending_polls() {
        let model = Model::box_model("box", Vec3::ONE).unwrap();
        let mut provider = DeferredModelProvider::new(model, 2)
            .with_failures(vec!["network".to_string()]);
        assert!(matches!(provider.poll(), Err(AssetError::LoadFailed(_))));
        assert_eq!(provider.poll().unwrap(), None);
        assert_eq!(provider.poll().unwrap(), None);
        assert!(provider.poll().unwrap().is_some());
    }

    #[test]
    fn static_provider_hands_out_independent_instances() {
        let mut provider = StaticModelProvider::new(tank());
        let mut a = provider.poll().unwrap().unwrap();
        let b = provider.poll().unwrap().unwrap();
        a.node_mut(1).unwrap().local.position.y = 5.0;
        assert_ne!(a, b);
    }
}
