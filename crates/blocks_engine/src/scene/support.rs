//! Support graph queries
//!
//! The `resting_on` relation is stored on the objects themselves; this module
//! answers the questions grasper actions ask about it. Nothing here is cached:
//! a [`SupportGraph`] borrows the registry and recomputes every answer.

use super::object::{ObjectId, ObjectKind, SceneObject, Support};
use super::registry::ObjectRegistry;
use crate::error::SceneError;
use crate::foundation::math::{planar, planar_distance, Point3, Rect, Vec2, GROUND_LEVEL};

/// The surface an object (or an empty grasper) comes to rest against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Surface touched
    pub surface: Support,
    /// Elevation of that surface
    pub elevation: f32,
    /// Whether the surface can bear the placed object
    pub valid: bool,
}

impl Contact {
    fn ground() -> Self {
        Self {
            surface: Support::Ground,
            elevation: GROUND_LEVEL,
            valid: true,
        }
    }

    /// The support to record, if the contact bears weight
    pub fn support(&self) -> Option<Support> {
        self.valid.then_some(self.surface)
    }
}

/// Read-only view of the support relation over a registry
#[derive(Debug, Clone, Copy)]
pub struct SupportGraph<'a> {
    registry: &'a ObjectRegistry,
    tolerance: f32,
}

impl<'a> SupportGraph<'a> {
    /// Create a view over `registry`, comparing distances with `tolerance`
    pub fn new(registry: &'a ObjectRegistry, tolerance: f32) -> Self {
        Self { registry, tolerance }
    }

    /// Find the surface directly beneath `point`
    ///
    /// Only resting objects are surfaces; held objects, graspers and
    /// `excluding` are ignored. The highest top at or below `point.z` whose
    /// footprint covers `(x, y)` wins, with ties going to the object stacked
    /// higher in the support graph. With no such object the ground is hit.
    ///
    /// `footprint` is the footprint of the object being placed, if any; it
    /// decides whether the surface can bear it.
    pub fn contact_below(&self, point: Point3, footprint: Option<Rect>, excluding: Option<ObjectId>) -> Contact {
        self.highest_surface(planar(&point), Some(point.z), footprint, excluding)
    }

    /// Find the first surface a grasper descending at `(x, y)` would meet
    ///
    /// The descent starts from above every object, so a grasper that is
    /// currently lower than a surface still stops on top of it.
    pub fn descend(&self, at: Vec2, footprint: Option<Rect>, excluding: Option<ObjectId>) -> Contact {
        self.highest_surface(at, None, footprint, excluding)
    }

    /// Determine what would support `object` if it were released at `position`
    ///
    /// The contact is only valid when it is at the resting elevation and the
    /// surface there can bear the object.
    pub fn compute_support(&self, object: &SceneObject, position: Point3) -> Contact {
        let footprint = object.footprint_at(planar(&position));
        let mut contact = self.contact_below(position, Some(footprint), Some(object.id()));
        if (contact.elevation - position.z).abs() > self.tolerance {
            contact.valid = false;
        }
        contact
    }

    /// Whether `object` may be released at `position`
    pub fn can_release_at(&self, object: &SceneObject, position: Point3) -> bool {
        self.compute_support(object, position).valid
    }

    /// Highest top surface among resting objects, never below the ground
    pub fn highest_stable_top(&self, excluding: Option<ObjectId>) -> f32 {
        self.registry
            .iter()
            .filter(|object| object.is_resting() && Some(object.id()) != excluding)
            .map(SceneObject::top)
            .fold(GROUND_LEVEL, f32::max)
    }

    /// Whether any object rests on `id`
    pub fn supports_others(&self, id: ObjectId) -> bool {
        self.registry
            .iter()
            .any(|object| object.resting_on() == Some(Support::Object(id)))
    }

    /// Number of support hops between an object and the ground
    ///
    /// Held objects and graspers have depth zero. Cycles are cut off at the
    /// registry size.
    pub fn support_depth(&self, id: ObjectId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while depth <= self.registry.len() {
            match self.registry.get(current).ok().and_then(SceneObject::resting_on) {
                Some(Support::Object(next)) => {
                    depth += 1;
                    current = next;
                }
                Some(Support::Ground) => return depth + 1,
                None => return depth,
            }
        }
        depth
    }

    /// Verify every structural invariant of the scene
    pub fn check_invariants(&self) -> Result<(), SceneError> {
        for object in self.registry.iter() {
            if object.is_grasper() {
                self.check_grasper(object)?;
            } else {
                self.check_object(object)?;
            }
        }
        Ok(())
    }

    fn highest_surface(&self, at: Vec2, ceiling: Option<f32>, footprint: Option<Rect>, excluding: Option<ObjectId>) -> Contact {
        let best = self
            .registry
            .iter()
            .filter(|object| object.is_resting() && Some(object.id()) != excluding)
            .filter(|object| object.footprint().contains_point(at, self.tolerance))
            .filter(|object| ceiling.map_or(true, |z| object.top() <= z + self.tolerance))
            .map(|object| (object, self.support_depth(object.id())))
            .max_by(|(a, a_depth), (b, b_depth)| {
                a.top()
                    .partial_cmp(&b.top())
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a_depth.cmp(b_depth))
            });

        match best {
            Some((object, _)) => Contact {
                surface: Support::Object(object.id()),
                elevation: object.top(),
                valid: self.bears(object, footprint),
            },
            None => Contact::ground(),
        }
    }

    fn bears(&self, surface: &SceneObject, footprint: Option<Rect>) -> bool {
        if !surface.can_support() {
            return false;
        }
        match (surface.kind(), footprint) {
            (ObjectKind::Box, Some(footprint)) => surface.footprint().contains_rect(&footprint, self.tolerance),
            _ => true,
        }
    }

    fn check_grasper(&self, grasper: &SceneObject) -> Result<(), SceneError> {
        let violation = |message: String| Err(SceneError::InvariantViolation(message));
        let Some(state) = grasper.grasper() else {
            return violation(format!("grasper {} has no grasper state", grasper.id()));
        };
        if grasper.resting_on().is_some() || grasper.grasped_by().is_some() {
            return violation(format!("grasper {} is resting or held", grasper.id()));
        }
        let Some(held_id) = state.grasped() else {
            return Ok(());
        };
        let held = self.registry.get(held_id)?;
        if held.grasped_by() != Some(grasper.id()) {
            return violation(format!("grasper {} holds {held_id} but it is not held back", grasper.id()));
        }
        let expected = Point3::new(
            grasper.position().x,
            grasper.position().y,
            grasper.position().z - held.top_offset(),
        );
        if (held.position() - expected).magnitude() > self.tolerance {
            return violation(format!("object {held_id} does not track grasper {}", grasper.id()));
        }
        Ok(())
    }

    fn check_object(&self, object: &SceneObject) -> Result<(), SceneError> {
        let violation = |message: String| Err(SceneError::InvariantViolation(message));
        let id = object.id();

        match (object.resting_on(), object.grasped_by()) {
            (Some(_), Some(_)) => violation(format!("object {id} is both resting and held")),
            (None, None) => violation(format!("object {id} is neither resting nor held")),
            (None, Some(grasper_id)) => {
                let grasper = self.registry.get_kind(grasper_id, ObjectKind::Grasper)?;
                if grasper.grasper().and_then(|state| state.grasped()) != Some(id) {
                    return violation(format!("object {id} claims grasper {grasper_id}, which holds something else"));
                }
                Ok(())
            }
            (Some(Support::Ground), None) => {
                if (object.position().z - GROUND_LEVEL).abs() > self.tolerance {
                    return violation(format!("object {id} rests on the ground but floats at {}", object.position().z));
                }
                Ok(())
            }
            (Some(Support::Object(support_id)), None) => {
                if support_id == id {
                    return violation(format!("object {id} rests on itself"));
                }
                let support = self.registry.get(support_id)?;
                if !support.is_resting() {
                    return violation(format!("object {id} rests on {support_id}, which is not resting"));
                }
                if (object.position().z - support.top()).abs() > self.tolerance {
                    return violation(format!("object {id} is not at the top of {support_id}"));
                }
                if !support.footprint().contains_point(planar(&object.position()), self.tolerance) {
                    return violation(format!("object {id} is not above {support_id}"));
                }
                if self.support_depth(id) > self.registry.len() {
                    return violation(format!("object {id} is part of a support cycle"));
                }
                Ok(())
            }
        }
    }

    /// Horizontal distance check shared by grasp eligibility
    pub(crate) fn coincides(&self, a: &Point3, b: &Point3) -> bool {
        planar_distance(a, b) <= self.tolerance
    }
}
