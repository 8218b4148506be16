//! Grasper state machine
//!
//! Each action first plans against a read-only [`SupportGraph`](crate::scene::SupportGraph) and only then
//! commits, so a rejected action never leaves a partial change behind.
//!
//! A grasper's position is its claw tip. While it holds an object the tip sits
//! on the object's top surface, so the object's point of support is
//! `tip - top_offset`.

use crate::config::ControllerConfig;
use crate::error::{DropReason, SceneError};
use crate::foundation::math::{planar, Point3, Rect};
use crate::scene::{GrasperState, ObjectId, ObjectKind, Scene, SceneObject, Support};

/// Executes grasper actions against a scene
#[derive(Debug, Clone, Copy)]
pub struct GrasperProtocol {
    tolerance: f32,
    clearance: f32,
}

/// Snapshot of a grasper taken before planning
#[derive(Debug, Clone, Copy)]
struct GrasperView {
    id: ObjectId,
    tip: Point3,
    state: GrasperState,
}

impl GrasperProtocol {
    /// Create a protocol using the controller's tolerances
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            tolerance: config.grasp_tolerance,
            clearance: config.raise_clearance,
        }
    }

    /// Lower the grasper until it, or the object it holds, meets a surface
    pub fn lower(&self, scene: &mut Scene, grasper: ObjectId) -> Result<(), SceneError> {
        let view = Self::view(scene, grasper)?;
        if view.state.is_lowered() {
            return Ok(());
        }

        let graph = scene.support_graph(self.tolerance);
        let at = planar(&view.tip);
        let held = view.state.grasped().map(|id| scene.registry().get(id)).transpose()?;

        let (tip, landing) = match held {
            Some(object) => {
                let footprint = object.footprint_at(at);
                let contact = graph.descend(at, Some(footprint), Some(object.id()));
                (contact.elevation + object.top_offset(), footprint)
            }
            None => {
                let contact = graph.descend(at, None, None);
                (contact.elevation, Rect::from_center_size(at, 0.0, 0.0))
            }
        };

        if let Some(other) = self.conflicting_grasper(scene, grasper, &landing)? {
            return Err(SceneError::Conflict { grasper, other });
        }

        Self::commit_tip(scene, &view, Point3::new(view.tip.x, view.tip.y, tip))?;
        Self::state_mut(scene, grasper)?.lowered = true;
        log::debug!("Grasper {grasper} lowered to {tip:.3}");
        Ok(())
    }

    /// Raise the grasper clear of every resting object
    pub fn raise(&self, scene: &mut Scene, grasper: ObjectId) -> Result<(), SceneError> {
        let view = Self::view(scene, grasper)?;
        if !view.state.is_lowered() {
            return Ok(());
        }

        let bottom = scene.support_graph(self.tolerance).highest_stable_top(None) + self.clearance;
        let tip = match view.state.grasped() {
            Some(id) => bottom + scene.registry().get(id)?.top_offset(),
            None => bottom,
        };

        Self::commit_tip(scene, &view, Point3::new(view.tip.x, view.tip.y, tip))?;
        Self::state_mut(scene, grasper)?.lowered = false;
        log::debug!("Grasper {grasper} raised to {tip:.3}");
        Ok(())
    }

    /// Close the claw, grasping the single eligible object under it if any
    pub fn close(&self, scene: &mut Scene, grasper: ObjectId) -> Result<(), SceneError> {
        let view = Self::view(scene, grasper)?;
        if view.state.is_closed() {
            return Ok(());
        }

        let target = if view.state.is_lowered() && view.state.grasped().is_none() {
            self.grasp_candidate(scene, &view)
        } else {
            None
        };

        Self::state_mut(scene, grasper)?.closed = true;
        match target {
            Some((id, top_offset)) => {
                let object = scene.registry_mut().get_mut(id)?;
                object.resting_on = None;
                object.grasped_by = Some(grasper);
                object.position = Point3::new(view.tip.x, view.tip.y, view.tip.z - top_offset);
                Self::state_mut(scene, grasper)?.grasped = Some(id);
                log::debug!("Grasper {grasper} closed on object {id}");
            }
            None => log::debug!("Grasper {grasper} closed on nothing"),
        }
        Ok(())
    }

    /// Open the claw, releasing the held object onto the surface beneath it
    pub fn open(&self, scene: &mut Scene, grasper: ObjectId) -> Result<(), SceneError> {
        let view = Self::view(scene, grasper)?;
        if !view.state.is_closed() {
            return Ok(());
        }

        let Some(held) = view.state.grasped() else {
            Self::state_mut(scene, grasper)?.closed = false;
            log::debug!("Grasper {grasper} opened");
            return Ok(());
        };

        let drop_error = |reason| SceneError::Drop { grasper, object: held, reason };
        if !view.state.is_lowered() {
            return Err(drop_error(DropReason::NotLowered));
        }

        let object = scene.registry().get(held)?;
        let position = object.position();
        let contact = scene.support_graph(self.tolerance).compute_support(object, position);
        let Some(support) = contact.support() else {
            let reason = match contact.surface {
                Support::Object(surface) if (contact.elevation - position.z).abs() <= self.tolerance => {
                    DropReason::Unstable(surface)
                }
                _ => DropReason::NoSupport,
            };
            return Err(drop_error(reason));
        };

        let object = scene.registry_mut().get_mut(held)?;
        object.grasped_by = None;
        object.resting_on = Some(support);
        object.position.z = contact.elevation;
        let state = Self::state_mut(scene, grasper)?;
        state.grasped = None;
        state.closed = false;
        log::debug!("Grasper {grasper} released object {held} onto {support}");
        Ok(())
    }

    /// Move the grasper horizontally, carrying whatever it holds
    pub fn move_to(&self, scene: &mut Scene, grasper: ObjectId, x: f32, y: f32) -> Result<(), SceneError> {
        let view = Self::view(scene, grasper)?;
        if view.state.is_lowered() {
            return Err(SceneError::CannotMoveWhileLowered(grasper));
        }
        if !view.state.bounds().contains(x, y) {
            return Err(SceneError::OutOfReach { grasper, x, y });
        }

        Self::commit_tip(scene, &view, Point3::new(x, y, view.tip.z))?;
        log::debug!("Grasper {grasper} moved to ({x}, {y})");
        Ok(())
    }

    fn view(scene: &Scene, id: ObjectId) -> Result<GrasperView, SceneError> {
        let grasper = scene.registry().get_kind(id, ObjectKind::Grasper)?;
        let state = grasper
            .grasper()
            .copied()
            .ok_or_else(|| SceneError::InvariantViolation(format!("grasper {id} has no grasper state")))?;
        Ok(GrasperView {
            id,
            tip: grasper.position(),
            state,
        })
    }

    fn state_mut(scene: &mut Scene, id: ObjectId) -> Result<&mut GrasperState, SceneError> {
        scene
            .registry_mut()
            .get_mut(id)?
            .grasper
            .as_mut()
            .ok_or_else(|| SceneError::InvariantViolation(format!("grasper {id} has no grasper state")))
    }

    /// Move the tip, dragging the held object along
    fn commit_tip(scene: &mut Scene, view: &GrasperView, tip: Point3) -> Result<(), SceneError> {
        if let Some(held) = view.state.grasped() {
            let object = scene.registry_mut().get_mut(held)?;
            object.position = Point3::new(tip.x, tip.y, tip.z - object.top_offset());
        }
        scene.registry_mut().get_mut(view.id)?.position = tip;
        Ok(())
    }

    /// Object to pick up when closing, with its top offset
    ///
    /// Exactly one resting, graspable object must have its top at the tip.
    /// Objects that carry others cannot be lifted out from under them.
    fn grasp_candidate(&self, scene: &Scene, view: &GrasperView) -> Option<(ObjectId, f32)> {
        let graph = scene.support_graph(self.tolerance);
        let mut candidates = scene.registry().iter().filter(|object| {
            !object.is_grasper()
                && object.is_graspable()
                && object.is_resting()
                && graph.coincides(&object.position(), &view.tip)
                && (object.top() - view.tip.z).abs() <= self.tolerance
                && !graph.supports_others(object.id())
        });

        match (candidates.next(), candidates.next()) {
            (Some(object), None) => Some((object.id(), object.top_offset())),
            (Some(first), Some(second)) => {
                log::warn!(
                    "Grasper {} found objects {} and {} under its claw; grasping neither",
                    view.id,
                    first.id(),
                    second.id()
                );
                None
            }
            _ => None,
        }
    }

    /// Another lowered grasper whose claw or load overlaps `landing`
    fn conflicting_grasper(
        &self,
        scene: &Scene,
        grasper: ObjectId,
        landing: &Rect,
    ) -> Result<Option<ObjectId>, SceneError> {
        for other in scene.registry().graspers().filter(|other| other.id() != grasper) {
            let Some(state) = other.grasper() else { continue };
            if !state.is_lowered() {
                continue;
            }
            let occupied = match state.grasped() {
                Some(held) => scene.registry().get(held).map(SceneObject::footprint)?,
                None => Rect::from_center_size(planar(&other.position()), 0.0, 0.0),
            };
            if occupied.intersects(landing, self.tolerance) {
                return Ok(Some(other.id()));
            }
        }
        Ok(None)
    }
}
