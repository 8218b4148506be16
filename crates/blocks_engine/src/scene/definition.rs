//! Scene definitions
//!
//! Static data describing the initial arrangement of a scene. Definitions are
//! plain serde data so hosts can keep them in `.ron` or `.toml` files; object
//! IDs equal definition indices.

use super::object::{Descriptors, Dimensions, GrasperBounds, ObjectKind, ObjectTemplate};
use crate::config::Config;
use crate::foundation::math::Point3;
use serde::{Deserialize, Serialize};

/// One object in a scene definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDefinition {
    /// Object kind
    pub kind: ObjectKind,
    /// Physical extents
    pub dimensions: Dimensions,
    /// Initial point of support `(x, y, z)`
    pub position: [f32; 3],
    /// Whether a grasper may pick it up
    #[serde(default)]
    pub graspable: bool,
    /// Whether other objects may rest on it
    #[serde(default)]
    pub can_support: bool,
    /// Descriptive tags
    #[serde(default)]
    pub descriptors: Descriptors,
    /// Index of the definition this object rests on; absent means the ground
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resting_on: Option<usize>,
    /// Reach of a grasper
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<GrasperBounds>,
}

impl ObjectDefinition {
    /// Define a non-grasper object
    pub fn new(kind: ObjectKind, dimensions: Dimensions, position: [f32; 3]) -> Self {
        Self {
            kind,
            dimensions,
            position,
            graspable: false,
            can_support: false,
            descriptors: Descriptors::default(),
            resting_on: None,
            bounds: None,
        }
    }

    /// Define a grasper
    pub fn grasper(dimensions: Dimensions, position: [f32; 3], bounds: GrasperBounds) -> Self {
        Self {
            bounds: Some(bounds),
            ..Self::new(ObjectKind::Grasper, dimensions, position)
        }
    }

    /// Set whether the object may be picked up
    pub fn graspable(mut self, graspable: bool) -> Self {
        self.graspable = graspable;
        self
    }

    /// Set whether other objects may rest on it
    pub fn can_support(mut self, can_support: bool) -> Self {
        self.can_support = can_support;
        self
    }

    /// Set the descriptive tags
    pub fn described(mut self, descriptors: Descriptors) -> Self {
        self.descriptors = descriptors;
        self
    }

    /// Rest the object on another definition
    pub fn resting_on(mut self, index: usize) -> Self {
        self.resting_on = Some(index);
        self
    }

    /// Initial position as a point
    pub fn point(&self) -> Point3 {
        Point3::new(self.position[0], self.position[1], self.position[2])
    }

    pub(crate) fn template(&self) -> ObjectTemplate {
        ObjectTemplate {
            kind: self.kind,
            dimensions: self.dimensions,
            graspable: self.graspable,
            can_support: self.can_support,
            descriptors: self.descriptors.clone(),
            bounds: self.bounds.unwrap_or_default(),
        }
    }
}

/// Static description of a scene's initial arrangement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDefinition {
    /// Objects, in ID order
    pub objects: Vec<ObjectDefinition>,
}

impl SceneDefinition {
    /// Definition with no objects
    pub fn empty() -> Self {
        Self { objects: Vec::new() }
    }

    /// Append an object, returning its index
    pub fn push(&mut self, object: ObjectDefinition) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// The classic arrangement
    ///
    /// A grasper above a 1×1 table holding red, green and blue blocks, three
    /// pyramids and a big white box with a pyramid inside.
    pub fn standard() -> Self {
        let mut scene = Self::empty();
        let look = |color: &str, size: &str, height: &str, width: &str| {
            Descriptors::default().with_color(color).with_proportions(size, height, width)
        };

        scene.push(
            ObjectDefinition::grasper(Dimensions::new(0.05, 0.05, 1.0), [0.0, 0.0, 0.5], GrasperBounds::new(-0.5, 0.5, -0.5, 0.5))
                .described(Descriptors::default().with_color("yellow")),
        );
        let table = scene.push(
            ObjectDefinition::new(ObjectKind::Table, Dimensions::new(1.0, 1.0, 0.0), [0.0, 0.0, 0.0])
                .can_support(true)
                .described(Descriptors::default().with_color("black")),
        );
        let big_red_block = scene.push(
            ObjectDefinition::new(ObjectKind::Block, Dimensions::new(0.15, 0.15, 0.15), [-0.3, 0.1, 0.0])
                .graspable(true)
                .can_support(true)
                .described(look("red", "big", "tall", "wide"))
                .resting_on(table),
        );
        let small_red_block = scene.push(
            ObjectDefinition::new(ObjectKind::Block, Dimensions::new(0.1, 0.1, 0.08), [-0.25, -0.2, 0.0])
                .graspable(true)
                .can_support(true)
                .described(look("red", "small", "short", "narrow"))
                .resting_on(table),
        );
        scene.push(
            ObjectDefinition::new(ObjectKind::Pyramid, Dimensions::new(0.1, 0.1, 0.08), [-0.25, -0.2, 0.08])
                .graspable(true)
                .described(look("green", "small", "short", "narrow"))
                .resting_on(small_red_block),
        );
        scene.push(
            ObjectDefinition::new(ObjectKind::Block, Dimensions::new(0.15, 0.15, 0.1), [-0.3, 0.05, 0.15])
                .graspable(true)
                .can_support(true)
                .described(look("green", "medium", "medium", "wide"))
                .resting_on(big_red_block),
        );
        scene.push(
            ObjectDefinition::new(ObjectKind::Block, Dimensions::new(0.15, 0.15, 0.2), [-0.1, 0.4, 0.0])
                .graspable(true)
                .can_support(true)
                .described(look("blue", "big", "tall", "medium"))
                .resting_on(table),
        );
        let big_green_block = scene.push(
            ObjectDefinition::new(ObjectKind::Block, Dimensions::new(0.2, 0.2, 0.15), [0.1, -0.15, 0.0])
                .graspable(true)
                .can_support(true)
                .described(look("green", "big", "tall", "wide"))
                .resting_on(table),
        );
        scene.push(
            ObjectDefinition::new(ObjectKind::Pyramid, Dimensions::new(0.1, 0.1, 0.2), [0.15, -0.1, 0.15])
                .graspable(true)
                .described(look("red", "medium", "tall", "narrow"))
                .resting_on(big_green_block),
        );
        let big_white_box = scene.push(
            ObjectDefinition::new(ObjectKind::Box, Dimensions::new(0.35, 0.35, 0.2), [0.25, 0.25, 0.0])
                .can_support(true)
                .described(look("white", "big", "medium", "wide"))
                .resting_on(table),
        );
        scene.push(
            ObjectDefinition::new(ObjectKind::Pyramid, Dimensions::new(0.15, 0.15, 0.1), [0.25, 0.25, 0.0])
                .graspable(true)
                .described(look("blue", "medium", "medium", "medium"))
                .resting_on(big_white_box),
        );

        scene
    }
}

impl Default for SceneDefinition {
    fn default() -> Self {
        Self::standard()
    }
}

impl Config for SceneDefinition {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_scene_layout() {
        let scene = SceneDefinition::standard();

        assert_eq!(scene.objects.len(), 11);
        assert_eq!(scene.objects[0].kind, ObjectKind::Grasper);
        assert_eq!(scene.objects.iter().filter(|o| o.kind == ObjectKind::Pyramid).count(), 3);
        assert_eq!(scene.objects[10].resting_on, Some(9));
    }

    #[test]
    fn test_ron_round_trip_of_standard_scene() {
        let scene = SceneDefinition::standard();
        let text = scene.to_ron_string().unwrap();

        assert_eq!(SceneDefinition::from_ron_str(&text).unwrap(), scene);
    }

    #[test]
    fn test_parse_hand_written_ron() {
        let text = r#"(
            objects: [
                (
                    kind: grasper,
                    dimensions: (width: 0.05, depth: 0.05, height: 1.0),
                    position: (0.0, 0.0, 2.0),
                    bounds: Some((max_x: Some(6.0))),
                ),
                (
                    kind: block,
                    dimensions: (width: 1.0, depth: 1.0, height: 1.0),
                    position: (2.0, 0.0, 0.0),
                    graspable: true,
                    can_support: true,
                    descriptors: (color: Some("red")),
                ),
            ],
        )"#;

        let scene = SceneDefinition::from_ron_str(text).unwrap();
        assert_eq!(scene.objects.len(), 2);
        assert_eq!(scene.objects[0].bounds.and_then(|b| b.max_x), Some(6.0));
        assert_eq!(scene.objects[0].bounds.and_then(|b| b.min_x), None);
        assert_eq!(scene.objects[1].descriptors.color.as_deref(), Some("red"));
        assert_eq!(scene.objects[1].resting_on, None);
    }

    #[test]
    fn test_parse_toml() {
        let text = r#"
            [[objects]]
            kind = "table"
            dimensions = { width = 4.0, depth = 4.0 }
            position = [0.0, 0.0, 0.0]
            can_support = true

            [[objects]]
            kind = "pyramid"
            dimensions = { width = 1.0, depth = 1.0, height = 1.0 }
            position = [1.0, 1.0, 0.0]
            graspable = true
            resting_on = 0
            descriptors = { color = "green", size = "small" }
        "#;

        let scene = SceneDefinition::from_toml_str(text).unwrap();
        assert_eq!(scene.objects[0].dimensions.height, 0.0);
        assert_eq!(scene.objects[1].kind, ObjectKind::Pyramid);
        assert_eq!(scene.objects[1].resting_on, Some(0));
        assert_eq!(scene.objects[1].point(), Point3::new(1.0, 1.0, 0.0));
    }
}
