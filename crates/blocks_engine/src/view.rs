//! Render-facing snapshot of a scene
//!
//! Renderers read owned copies of the visible state between controller calls
//! and never hold references into the registry.

use crate::foundation::math::Point3;
use crate::scene::{Dimensions, ObjectId, ObjectKind, ObjectRegistry, SceneObject};

/// What a renderer needs to draw one object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectView {
    /// Object identifier
    pub id: ObjectId,
    /// Object kind
    pub kind: ObjectKind,
    /// Physical extents
    pub shape: Dimensions,
    /// Point of support (bottom centre); the claw tip for graspers
    pub position: Point3,
    /// Colour tag, if the object has one
    pub color: Option<String>,
    /// Whether a grasper is holding the object
    pub held: bool,
}

impl From<&SceneObject> for ObjectView {
    fn from(object: &SceneObject) -> Self {
        Self {
            id: object.id(),
            kind: object.kind(),
            shape: object.dimensions(),
            position: object.position(),
            color: object.descriptors().color.clone(),
            held: object.grasped_by().is_some(),
        }
    }
}

/// Owned copy of every object's visible state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneSnapshot {
    /// Objects in ID order
    pub objects: Vec<ObjectView>,
}

impl SceneSnapshot {
    /// Capture the current state of a registry
    pub fn capture(registry: &ObjectRegistry) -> Self {
        Self {
            objects: registry.iter().map(ObjectView::from).collect(),
        }
    }

    /// View of a single object
    pub fn get(&self, id: ObjectId) -> Option<&ObjectView> {
        self.objects.iter().find(|view| view.id == id)
    }

    /// Number of objects captured
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether nothing was captured
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
