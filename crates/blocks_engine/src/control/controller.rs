//! Controller facade
//!
//! The single entry point agents use to inspect and change a scene. Queries
//! never mutate; actions validate, commit, then re-check the scene
//! invariants.

use super::grasper::GrasperProtocol;
use crate::config::ControllerConfig;
use crate::error::SceneError;
use crate::foundation::math::Point3;
use crate::scene::{GrasperState, ObjectId, ObjectKind, Scene, Tag, TagIter, TagValue};
use crate::view::SceneSnapshot;

/// Owns a scene and drives its graspers
///
/// Every grasper parameter is optional; `None` means the default grasper.
#[derive(Debug, Clone)]
pub struct Controller {
    scene: Scene,
    config: ControllerConfig,
    protocol: GrasperProtocol,
    default_grasper: ObjectId,
}

impl Controller {
    /// Take ownership of a scene
    ///
    /// The default grasper is the first one in creation order.
    pub fn new(scene: Scene, config: ControllerConfig) -> Result<Self, SceneError> {
        config.validate()?;
        let default_grasper = scene
            .registry()
            .graspers()
            .map(|grasper| grasper.id())
            .next()
            .ok_or(SceneError::NoGraspers)?;

        log::info!(
            "Controller ready: {} objects, default grasper {default_grasper}",
            scene.registry().len()
        );
        Ok(Self {
            protocol: GrasperProtocol::new(&config),
            scene,
            config,
            default_grasper,
        })
    }

    /// Controller over the standard scene with default settings
    pub fn standard() -> Result<Self, SceneError> {
        Self::new(Scene::standard()?, ControllerConfig::default())
    }

    /// Scene being controlled
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Active configuration
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Grasper used when an action names none
    pub fn default_grasper(&self) -> ObjectId {
        self.default_grasper
    }

    /// Change the default grasper
    pub fn set_default_grasper(&mut self, grasper: ObjectId) -> Result<(), SceneError> {
        self.scene.registry().get_kind(grasper, ObjectKind::Grasper)?;
        self.default_grasper = grasper;
        Ok(())
    }

    // Queries

    /// IDs of objects whose tags equal every filter value, in ID order
    pub fn find_objects<'a>(&'a self, filters: &'a [(Tag, TagValue)]) -> impl Iterator<Item = ObjectId> + 'a {
        self.scene.registry().find_by_tags(filters)
    }

    /// Point of support of an object (the claw tip for graspers)
    pub fn get_object_position(&self, id: ObjectId) -> Result<Point3, SceneError> {
        self.scene.registry().position(id)
    }

    /// Value of one tag on an object
    pub fn get_object_tag(&self, id: ObjectId, tag: Tag) -> Result<TagValue, SceneError> {
        self.scene.registry().get_tag(id, tag)
    }

    /// Value of a tag given by name
    ///
    /// Unknown objects are reported before unknown tag names.
    pub fn get_object_tag_named(&self, id: ObjectId, name: &str) -> Result<TagValue, SceneError> {
        self.scene.registry().get(id)?;
        let tag = name.parse::<Tag>().map_err(|_| SceneError::UnknownTag {
            tag: name.to_string(),
            object: Some(id),
        })?;
        self.get_object_tag(id, tag)
    }

    /// Every `(tag, value)` pair an object carries
    pub fn iter_object_tags(&self, id: ObjectId) -> Result<TagIter<'_>, SceneError> {
        self.scene.registry().iter_tags(id)
    }

    /// Object held by a grasper
    pub fn get_grasped_object(&self, grasper: Option<ObjectId>) -> Result<Option<ObjectId>, SceneError> {
        self.grasper_state(grasper).map(GrasperState::grasped)
    }

    /// Whether a grasper's claw is closed
    pub fn grasper_is_closed(&self, grasper: Option<ObjectId>) -> Result<bool, SceneError> {
        self.grasper_state(grasper).map(GrasperState::is_closed)
    }

    /// Whether a grasper is lowered
    pub fn grasper_is_lowered(&self, grasper: Option<ObjectId>) -> Result<bool, SceneError> {
        self.grasper_state(grasper).map(GrasperState::is_lowered)
    }

    /// Owned copy of the scene for renderers
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot::capture(self.scene.registry())
    }

    /// Verify every structural invariant of the scene
    pub fn check_invariants(&self) -> Result<(), SceneError> {
        self.scene
            .support_graph(self.config.grasp_tolerance)
            .check_invariants()
    }

    // Actions

    /// Close the claw, grasping the object under it when there is exactly one
    pub fn close_grasper(&mut self, grasper: Option<ObjectId>) -> Result<(), SceneError> {
        self.act("close", grasper, GrasperProtocol::close)
    }

    /// Open the claw, releasing any held object onto the surface beneath it
    pub fn open_grasper(&mut self, grasper: Option<ObjectId>) -> Result<(), SceneError> {
        self.act("open", grasper, GrasperProtocol::open)
    }

    /// Lower a grasper onto whatever lies beneath it
    pub fn lower_grasper(&mut self, grasper: Option<ObjectId>) -> Result<(), SceneError> {
        self.act("lower", grasper, GrasperProtocol::lower)
    }

    /// Raise a grasper clear of the scene
    pub fn raise_grasper(&mut self, grasper: Option<ObjectId>) -> Result<(), SceneError> {
        self.act("raise", grasper, GrasperProtocol::raise)
    }

    /// Move a raised grasper to `(x, y)` within its reach
    pub fn move_grasper(&mut self, x: f32, y: f32, grasper: Option<ObjectId>) -> Result<(), SceneError> {
        self.act("move", grasper, |protocol, scene, id| protocol.move_to(scene, id, x, y))
    }

    /// Move a raised grasper along one or both axes
    ///
    /// A coordinate given as `None` keeps the grasper's current value.
    pub fn move_grasper_partial(
        &mut self,
        x: Option<f32>,
        y: Option<f32>,
        grasper: Option<ObjectId>,
    ) -> Result<(), SceneError> {
        let current = self.get_object_position(self.resolve(grasper)?)?;
        self.move_grasper(x.unwrap_or(current.x), y.unwrap_or(current.y), grasper)
    }

    fn resolve(&self, grasper: Option<ObjectId>) -> Result<ObjectId, SceneError> {
        let id = grasper.unwrap_or(self.default_grasper);
        self.scene.registry().get_kind(id, ObjectKind::Grasper)?;
        Ok(id)
    }

    fn grasper_state(&self, grasper: Option<ObjectId>) -> Result<&GrasperState, SceneError> {
        let id = self.resolve(grasper)?;
        self.scene
            .registry()
            .get(id)?
            .grasper()
            .ok_or_else(|| SceneError::InvariantViolation(format!("grasper {id} has no grasper state")))
    }

    fn act<F>(&mut self, action: &str, grasper: Option<ObjectId>, f: F) -> Result<(), SceneError>
    where
        F: FnOnce(&GrasperProtocol, &mut Scene, ObjectId) -> Result<(), SceneError>,
    {
        let id = match self.resolve(grasper) {
            Ok(id) => id,
            Err(error) => {
                log::warn!("Rejected {action}: {error}");
                return Err(error);
            }
        };

        let protocol = self.protocol;
        if let Err(error) = f(&protocol, &mut self.scene, id) {
            log::warn!("Rejected {action} on grasper {id}: {error}");
            return Err(error);
        }

        if let Err(error) = self.check_invariants() {
            log::error!("Scene invariant broken after {action} on grasper {id}: {error}");
        }
        Ok(())
    }
}
