//! Scene state
//!
//! A [`Scene`] owns the [`ObjectRegistry`] and is built once from a
//! [`SceneDefinition`]. After construction it only changes through grasper
//! actions issued by the controller.
//!
//! ## Architecture
//!
//! ```text
//! Controller (facade)
//!      ↓
//! Grasper protocol (validate, then commit)
//!      ↓
//! Scene ── ObjectRegistry (records)
//!      └── SupportGraph   (derived resting_on queries)
//! ```

mod definition;
mod object;
mod registry;
mod support;
mod tags;

pub use definition::{ObjectDefinition, SceneDefinition};
pub use object::{
    Descriptors, Dimensions, GrasperBounds, GrasperState, ObjectId, ObjectKind, ObjectTemplate, SceneObject,
    Support,
};
pub use registry::{ObjectRegistry, TagIter};
pub use support::{Contact, SupportGraph};
pub use tags::{Tag, TagValue};

use crate::error::SceneError;
use crate::foundation::math::{planar, GROUND_LEVEL};

/// The full set of objects and their spatial/support state
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    registry: ObjectRegistry,
}

impl Scene {
    /// Build a scene from definition data
    ///
    /// Every resting object must sit exactly on its declared support (or on
    /// the ground when none is declared), and that support must be able to
    /// bear it. `tolerance` bounds the allowed positional error.
    pub fn from_definition(definition: &SceneDefinition, tolerance: f32) -> Result<Self, SceneError> {
        let count = definition.objects.len();
        let mut registry = ObjectRegistry::new();

        for (index, object) in definition.objects.iter().enumerate() {
            let invalid = |message: String| Err(SceneError::InvalidScene(format!("object {index}: {message}")));

            if !object.dimensions.is_valid() {
                return invalid("dimensions must be finite and non-negative".to_string());
            }
            if !object.position.iter().all(|coordinate| coordinate.is_finite()) {
                return invalid("position must be finite".to_string());
            }

            let resting_on = if object.kind == ObjectKind::Grasper {
                if object.graspable || object.can_support {
                    return invalid("graspers can be neither grasped nor stacked on".to_string());
                }
                if object.resting_on.is_some() {
                    return invalid("graspers hang from their rig and cannot rest on anything".to_string());
                }
                let bounds = object.bounds.unwrap_or_default();
                if !bounds.is_valid() {
                    return invalid("reach bounds must have each minimum at or below its maximum".to_string());
                }
                if !bounds.contains(object.position[0], object.position[1]) {
                    return invalid("grasper starts outside its own reach".to_string());
                }
                None
            } else {
                if object.bounds.is_some() {
                    return invalid(format!("only graspers have reach bounds, not a {}", object.kind));
                }
                match object.resting_on {
                    Some(support) if support >= count => {
                        return invalid(format!("resting_on refers to missing object {support}"));
                    }
                    Some(support) if support == index => return invalid("rests on itself".to_string()),
                    Some(support) => Some(Support::Object(ObjectId::from(support as u32))),
                    None => Some(Support::Ground),
                }
            };

            registry.create(object.template(), object.point(), resting_on);
        }

        let scene = Self { registry };
        scene.validate_supports(tolerance)?;
        scene.support_graph(tolerance).check_invariants()?;

        log::info!(
            "Scene built with {} objects ({} graspers)",
            scene.registry.len(),
            scene.registry.graspers().count()
        );
        Ok(scene)
    }

    /// The classic arrangement
    pub fn standard() -> Result<Self, SceneError> {
        Self::from_definition(&SceneDefinition::standard(), crate::config::ControllerConfig::default().grasp_tolerance)
    }

    /// Object registry
    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut ObjectRegistry {
        &mut self.registry
    }

    /// Support queries over the current state
    pub fn support_graph(&self, tolerance: f32) -> SupportGraph<'_> {
        SupportGraph::new(&self.registry, tolerance)
    }

    fn validate_supports(&self, tolerance: f32) -> Result<(), SceneError> {
        let graph = self.support_graph(tolerance);

        for object in self.registry.iter() {
            let invalid = |message: String| Err(SceneError::InvalidScene(format!("object {}: {message}", object.id())));

            match object.resting_on() {
                None => {}
                Some(Support::Ground) => {
                    if (object.position().z - GROUND_LEVEL).abs() > tolerance {
                        return invalid("rests on the ground but is not at ground level".to_string());
                    }
                }
                Some(Support::Object(support_id)) => {
                    let support = self.registry.get(support_id)?;
                    if support.is_grasper() {
                        return invalid(format!("cannot rest on grasper {support_id}"));
                    }
                    if graph.support_depth(object.id()) > self.registry.len() {
                        return invalid("is part of a support cycle".to_string());
                    }
                    let footprint = object.footprint();
                    if !support.footprint().contains_point(planar(&object.position()), tolerance) {
                        return invalid(format!("is not above object {support_id}"));
                    }
                    if (support.top() - object.position().z).abs() > tolerance {
                        return invalid(format!("is not at the top of object {support_id}"));
                    }
                    let bears = support.can_support()
                        && (support.kind() != ObjectKind::Box || support.footprint().contains_rect(&footprint, tolerance));
                    if !bears {
                        return invalid(format!("object {support_id} cannot support it"));
                    }
                }
            }
        }
        Ok(())
    }
}
