//! State machine properties and query validation

use super::*;
use crate::error::SceneError;
use crate::scene::{Tag, TagValue};

#[test]
fn test_lower_and_raise_are_idempotent() {
    let mut once = holding_block();
    let mut twice = once.clone();

    once.raise_grasper(None).unwrap();
    twice.raise_grasper(None).unwrap();
    twice.raise_grasper(None).unwrap();
    assert_eq!(once.scene(), twice.scene());

    once.lower_grasper(None).unwrap();
    twice.lower_grasper(None).unwrap();
    twice.lower_grasper(None).unwrap();
    assert_eq!(once.scene(), twice.scene());
}

#[test]
fn test_empty_close_then_open_restores_state() {
    let mut controller = controller();
    controller.move_grasper(-8.0, -8.0, None).unwrap();
    controller.lower_grasper(None).unwrap();
    let before = controller.scene().clone();

    controller.close_grasper(None).unwrap();
    assert_eq!(controller.get_grasped_object(None).unwrap(), None);
    controller.open_grasper(None).unwrap();

    assert_eq!(controller.scene(), &before);
}

#[test]
fn test_open_when_open_is_a_no_op() {
    let mut controller = controller();
    let before = controller.scene().clone();

    controller.open_grasper(None).unwrap();

    assert_eq!(controller.scene(), &before);
}

#[test]
fn test_reach_bounds_are_inclusive() {
    let mut controller = controller();

    controller.move_grasper(10.0, 0.0, None).unwrap();
    assert_eq!(controller.get_object_position(GRASPER).unwrap().x, 10.0);

    assert_eq!(
        controller.move_grasper(11.0, 0.0, None),
        Err(SceneError::OutOfReach { grasper: GRASPER, x: 11.0, y: 0.0 })
    );
    assert!(controller.move_grasper(f32::NAN, 0.0, None).is_err());
    assert_eq!(controller.get_object_position(GRASPER).unwrap().x, 10.0);
}

#[test]
fn test_partial_move_keeps_other_coordinate() {
    let mut controller = controller();

    controller.move_grasper_partial(None, Some(3.0), None).unwrap();
    let tip = controller.get_object_position(GRASPER).unwrap();
    assert_eq!((tip.x, tip.y), (2.0, 3.0));

    controller.move_grasper_partial(Some(-1.0), None, None).unwrap();
    let tip = controller.get_object_position(GRASPER).unwrap();
    assert_eq!((tip.x, tip.y), (-1.0, 3.0));

    // Still subject to reach bounds and the lowered check
    assert_eq!(
        controller.move_grasper_partial(Some(11.0), None, None),
        Err(SceneError::OutOfReach { grasper: GRASPER, x: 11.0, y: 3.0 })
    );
    controller.lower_grasper(None).unwrap();
    assert_eq!(
        controller.move_grasper_partial(None, Some(0.0), None),
        Err(SceneError::CannotMoveWhileLowered(GRASPER))
    );
    assert!(controller.move_grasper_partial(None, None, Some(BLOCK)).is_err());
}

#[test]
fn test_actions_reject_non_graspers() {
    let mut controller = controller();
    let missing = ObjectId::from_raw(99);

    assert_eq!(
        controller.close_grasper(Some(BLOCK)),
        Err(SceneError::WrongKind { id: BLOCK, expected: ObjectKind::Grasper, found: ObjectKind::Block })
    );
    assert_eq!(controller.lower_grasper(Some(missing)), Err(SceneError::UnknownObject(missing)));
    assert!(matches!(controller.grasper_is_closed(Some(TABLE)), Err(SceneError::WrongKind { .. })));
    assert!(controller.set_default_grasper(BLOCK).is_err());
    assert_eq!(controller.default_grasper(), GRASPER);
}

#[test]
fn test_tag_queries() {
    let controller = controller();

    assert_eq!(controller.get_object_tag(BLOCK, Tag::Color).unwrap(), TagValue::from("red"));
    assert_eq!(controller.get_object_tag(GRASPER, Tag::MaxX).unwrap(), TagValue::Number(10.0));
    assert_eq!(
        controller.get_object_tag_named(BLOCK, "flavor"),
        Err(SceneError::UnknownTag { tag: "flavor".to_string(), object: Some(BLOCK) })
    );
    assert_eq!(
        controller.get_object_tag_named(ObjectId::from_raw(99), "flavor"),
        Err(SceneError::UnknownObject(ObjectId::from_raw(99)))
    );
    assert_eq!(
        controller.get_object_tag(TABLE, Tag::Color),
        Err(SceneError::UnknownTag { tag: "color".to_string(), object: Some(TABLE) })
    );

    let tags: Vec<_> = controller.iter_object_tags(GRASPER).unwrap().map(|(tag, _)| tag).collect();
    assert!(tags.contains(&Tag::Lowered));
    assert!(!tags.contains(&Tag::RestingOn));
}

#[test]
fn test_find_objects() {
    let mut controller = controller();
    let graspable = [(Tag::Graspable, TagValue::Flag(true))];

    let found: Vec<_> = controller.find_objects(&graspable).collect();
    assert_eq!(found, vec![BLOCK, PYRAMID]);

    let on_table = [(Tag::RestingOn, TagValue::Object(TABLE))];
    assert_eq!(controller.find_objects(&on_table).count(), 3);

    controller.lower_grasper(None).unwrap();
    controller.close_grasper(None).unwrap();
    let held = [(Tag::GraspedBy, TagValue::Object(GRASPER))];
    let found: Vec<_> = controller.find_objects(&held).collect();
    assert_eq!(found, vec![BLOCK]);
}

#[test]
fn test_controller_needs_a_grasper() {
    let mut definition = definition();
    definition.objects.remove(0);
    for object in &mut definition.objects {
        object.resting_on = object.resting_on.map(|index| index - 1);
    }
    let config = ControllerConfig::default();
    let scene = Scene::from_definition(&definition, config.grasp_tolerance).unwrap();

    assert!(matches!(Controller::new(scene, config), Err(SceneError::NoGraspers)));
}

#[test]
fn test_controller_rejects_bad_config() {
    let scene = Scene::from_definition(&definition(), 1e-4).unwrap();
    let config = ControllerConfig::default().with_raise_clearance(0.0);

    assert!(matches!(Controller::new(scene, config), Err(SceneError::Config(_))));
}

#[test]
fn test_invariants_hold_through_every_action() {
    let mut controller = controller();
    let actions: [fn(&mut Controller) -> Result<(), SceneError>; 8] = [
        |c| c.lower_grasper(None),
        |c| c.close_grasper(None),
        |c| c.raise_grasper(None),
        |c| c.move_grasper(5.0, 0.0, None),
        |c| c.lower_grasper(None),
        |c| c.open_grasper(None),
        |c| c.raise_grasper(None),
        |c| c.move_grasper(-10.0, 10.0, None),
    ];

    for action in actions {
        action(&mut controller).unwrap();
        controller.check_invariants().unwrap();

        // Every non-grasper is either resting or held, never both
        for object in controller.scene().registry().iter().filter(|o| !o.is_grasper()) {
            assert!(object.resting_on().is_some() != object.grasped_by().is_some());
        }
    }
}
