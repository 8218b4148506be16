//! Rearranging the classic scene

use crate::control::Controller;
use crate::error::{DropReason, SceneError};
use crate::scene::{ObjectId, Support, Tag, TagValue};
use approx::assert_relative_eq;

const SMALL_RED_BLOCK: ObjectId = ObjectId::from_raw(3);
const SMALL_GREEN_PYRAMID: ObjectId = ObjectId::from_raw(4);
const TALL_BLUE_BLOCK: ObjectId = ObjectId::from_raw(6);
const BIG_WHITE_BOX: ObjectId = ObjectId::from_raw(9);
const BLUE_PYRAMID: ObjectId = ObjectId::from_raw(10);

fn pick_up(controller: &mut Controller, x: f32, y: f32) {
    controller.raise_grasper(None).unwrap();
    controller.move_grasper(x, y, None).unwrap();
    controller.lower_grasper(None).unwrap();
    controller.close_grasper(None).unwrap();
    controller.raise_grasper(None).unwrap();
}

fn carry_to(controller: &mut Controller, x: f32, y: f32) -> Result<(), SceneError> {
    controller.raise_grasper(None)?;
    controller.move_grasper(x, y, None)?;
    controller.lower_grasper(None)?;
    controller.open_grasper(None)
}

#[test]
fn test_find_by_descriptors() {
    let controller = Controller::standard().unwrap();
    let filters = [(Tag::Color, TagValue::from("red")), (Tag::Kind, TagValue::from("block"))];

    let found: Vec<_> = controller.find_objects(&filters).collect();

    assert_eq!(found, vec![ObjectId::from_raw(2), SMALL_RED_BLOCK]);
}

#[test]
fn test_move_pyramid_onto_tall_blue_block() {
    let mut controller = Controller::standard().unwrap();

    pick_up(&mut controller, -0.25, -0.2);
    assert_eq!(controller.get_grasped_object(None).unwrap(), Some(SMALL_GREEN_PYRAMID));
    // Tallest stack is the red pyramid on the big green block, topping out at 0.35
    assert_relative_eq!(controller.get_object_position(SMALL_GREEN_PYRAMID).unwrap().z, 0.45, epsilon = 1e-5);

    carry_to(&mut controller, -0.1, 0.4).unwrap();

    let pyramid = controller.scene().registry().get(SMALL_GREEN_PYRAMID).unwrap();
    assert_eq!(pyramid.resting_on(), Some(Support::Object(TALL_BLUE_BLOCK)));
    assert_relative_eq!(pyramid.position().z, 0.2, epsilon = 1e-5);
    controller.check_invariants().unwrap();
}

#[test]
fn test_put_small_red_block_in_box() {
    let mut controller = Controller::standard().unwrap();
    pick_up(&mut controller, -0.25, -0.2);
    carry_to(&mut controller, -0.1, 0.4).unwrap();

    // With the pyramid gone the small red block can be lifted
    pick_up(&mut controller, -0.25, -0.2);
    assert_eq!(controller.get_grasped_object(None).unwrap(), Some(SMALL_RED_BLOCK));

    // Straight down onto the blue pyramid inside the box
    assert_eq!(
        carry_to(&mut controller, 0.25, 0.25),
        Err(SceneError::Drop {
            grasper: ObjectId::from_raw(0),
            object: SMALL_RED_BLOCK,
            reason: DropReason::Unstable(BLUE_PYRAMID),
        })
    );

    // Beside the pyramid, on the box floor
    carry_to(&mut controller, 0.13, 0.13).unwrap();
    let block = controller.scene().registry().get(SMALL_RED_BLOCK).unwrap();
    assert_eq!(block.resting_on(), Some(Support::Object(BIG_WHITE_BOX)));
    assert_relative_eq!(block.position().z, 0.0);
    controller.check_invariants().unwrap();
}

#[test]
fn test_box_cannot_be_grasped() {
    let mut controller = Controller::standard().unwrap();

    pick_up(&mut controller, 0.1, 0.4);

    assert_eq!(controller.get_grasped_object(None).unwrap(), None);
    assert_eq!(controller.get_object_tag(BIG_WHITE_BOX, Tag::Graspable).unwrap(), TagValue::Flag(false));
}
