//! Controller scenario tests
//!
//! Shared fixture: a grasper above a large table carrying block `B` at
//! `(2, 0)`, a pedestal at `(5, 0)` with an open box on top whose floor is at
//! elevation 1, and a pyramid at `(-3, 0)`.

mod properties;
mod standard_scene;

use crate::config::ControllerConfig;
use crate::control::Controller;
use crate::scene::{
    Descriptors, Dimensions, GrasperBounds, ObjectDefinition, ObjectId, ObjectKind, Scene, SceneDefinition,
};

pub(super) const GRASPER: ObjectId = ObjectId::from_raw(0);
pub(super) const TABLE: ObjectId = ObjectId::from_raw(1);
pub(super) const BLOCK: ObjectId = ObjectId::from_raw(2);
pub(super) const PEDESTAL: ObjectId = ObjectId::from_raw(3);
pub(super) const BOX: ObjectId = ObjectId::from_raw(4);
pub(super) const PYRAMID: ObjectId = ObjectId::from_raw(5);

pub(super) fn definition() -> SceneDefinition {
    let mut scene = SceneDefinition::empty();
    scene.push(ObjectDefinition::grasper(
        Dimensions::new(0.1, 0.1, 1.0),
        [2.0, 0.0, 4.0],
        GrasperBounds::new(-10.0, 10.0, -10.0, 10.0),
    ));
    let table = scene.push(
        ObjectDefinition::new(ObjectKind::Table, Dimensions::new(20.0, 20.0, 0.0), [0.0, 0.0, 0.0]).can_support(true),
    );
    scene.push(
        ObjectDefinition::new(ObjectKind::Block, Dimensions::new(1.0, 1.0, 1.0), [2.0, 0.0, 0.0])
            .graspable(true)
            .can_support(true)
            .described(Descriptors::default().with_color("red"))
            .resting_on(table),
    );
    let pedestal = scene.push(
        ObjectDefinition::new(ObjectKind::Block, Dimensions::new(2.0, 2.0, 1.0), [5.0, 0.0, 0.0])
            .can_support(true)
            .resting_on(table),
    );
    scene.push(
        ObjectDefinition::new(ObjectKind::Box, Dimensions::new(1.5, 1.5, 0.5), [5.0, 0.0, 1.0])
            .can_support(true)
            .described(Descriptors::default().with_color("white"))
            .resting_on(pedestal),
    );
    scene.push(
        ObjectDefinition::new(ObjectKind::Pyramid, Dimensions::new(1.0, 1.0, 1.0), [-3.0, 0.0, 0.0])
            .graspable(true)
            .described(Descriptors::default().with_color("green"))
            .resting_on(table),
    );
    scene
}

pub(super) fn controller_for(definition: &SceneDefinition) -> Controller {
    let config = ControllerConfig::default();
    let scene = Scene::from_definition(definition, config.grasp_tolerance).unwrap();
    Controller::new(scene, config).unwrap()
}

pub(super) fn controller() -> Controller {
    controller_for(&definition())
}

/// Grasper lowered over `B` with `B` in its claw
pub(super) fn holding_block() -> Controller {
    let mut controller = controller();
    controller.lower_grasper(None).unwrap();
    controller.close_grasper(None).unwrap();
    assert_eq!(controller.get_grasped_object(None).unwrap(), Some(BLOCK));
    controller
}
