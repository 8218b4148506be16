//! Object records held by the registry
//!
//! Every object in a scene is a single [`SceneObject`] record discriminated by
//! its [`ObjectKind`]. Graspers carry an extra [`GrasperState`] extension;
//! nothing else does.

use crate::foundation::math::{planar, Point3, Rect, Vec2};
use crate::scene::tags::{Tag, TagValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable object identifier
///
/// Identifiers are assigned in creation order starting at zero and are never
/// reused. They carry no access to the object itself; every lookup goes
/// through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Identifier for a known creation index
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Get the numeric identifier
    pub fn index(self) -> u32 {
        self.0
    }
}

impl From<u32> for ObjectId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Mechanical hand; the only actuator in the scene
    Grasper,
    /// Flat slab that sits on the ground
    Table,
    /// Rectangular solid
    Block,
    /// Square pyramid; its apex is its top
    Pyramid,
    /// Open-topped container; things rest on its floor
    Box,
}

impl ObjectKind {
    /// All kinds, in declaration order
    pub const ALL: [ObjectKind; 5] = [
        ObjectKind::Grasper,
        ObjectKind::Table,
        ObjectKind::Block,
        ObjectKind::Pyramid,
        ObjectKind::Box,
    ];

    /// Tag value spelling of this kind
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grasper => "grasper",
            Self::Table => "table",
            Self::Block => "block",
            Self::Pyramid => "pyramid",
            Self::Box => "box",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown object kind `{s}`"))
    }
}

/// Physical extents of an object
///
/// The footprint is the `width × depth` rectangle centred on the object's
/// position. Tables are flat, so their height is usually zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Extent along x
    pub width: f32,
    /// Extent along y
    pub depth: f32,
    /// Extent along z
    #[serde(default)]
    pub height: f32,
}

impl Dimensions {
    /// Create dimensions
    pub fn new(width: f32, depth: f32, height: f32) -> Self {
        Self { width, depth, height }
    }

    /// Check that every extent is finite and non-negative
    pub fn is_valid(&self) -> bool {
        [self.width, self.depth, self.height]
            .iter()
            .all(|extent| extent.is_finite() && *extent >= 0.0)
    }
}

/// Descriptive tags an agent can refer to objects by
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Descriptors {
    /// Colour name, e.g. `red`
    pub color: Option<String>,
    /// Overall size, e.g. `big`
    pub size: Option<String>,
    /// Height class, e.g. `tall`
    pub height: Option<String>,
    /// Width class, e.g. `narrow`
    pub width: Option<String>,
}

impl Descriptors {
    /// Set the colour
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the size, height and width classes
    pub fn with_proportions(
        mut self,
        size: impl Into<String>,
        height: impl Into<String>,
        width: impl Into<String>,
    ) -> Self {
        self.size = Some(size.into());
        self.height = Some(height.into());
        self.width = Some(width.into());
        self
    }
}

/// Reachable region of a grasper; a missing bound leaves that side open
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrasperBounds {
    /// Lowest reachable x
    pub min_x: Option<f32>,
    /// Highest reachable x
    pub max_x: Option<f32>,
    /// Lowest reachable y
    pub min_y: Option<f32>,
    /// Highest reachable y
    pub max_y: Option<f32>,
}

impl GrasperBounds {
    /// Bounds that leave every side open
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Closed rectangle of reach
    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x: Some(min_x),
            max_x: Some(max_x),
            min_y: Some(min_y),
            max_y: Some(max_y),
        }
    }

    /// Every bound is a number and no minimum exceeds its maximum
    pub fn is_valid(&self) -> bool {
        let ordered = |min: Option<f32>, max: Option<f32>| match (min, max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        };
        [self.min_x, self.max_x, self.min_y, self.max_y]
            .iter()
            .flatten()
            .all(|bound| !bound.is_nan())
            && ordered(self.min_x, self.max_x)
            && ordered(self.min_y, self.max_y)
    }

    /// Check if `(x, y)` is reachable; bounds are inclusive
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x.is_finite()
            && y.is_finite()
            && self.min_x.map_or(true, |min| x >= min)
            && self.max_x.map_or(true, |max| x <= max)
            && self.min_y.map_or(true, |min| y >= min)
            && self.max_y.map_or(true, |max| y <= max)
    }
}

/// Mutable state carried only by graspers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrasperState {
    /// Fixed reachable region
    pub(crate) bounds: GrasperBounds,
    /// Whether the claw is closed
    pub(crate) closed: bool,
    /// Whether the grasper is lowered
    pub(crate) lowered: bool,
    /// Object currently held
    pub(crate) grasped: Option<ObjectId>,
}

impl GrasperState {
    /// Raised, open and empty
    pub fn new(bounds: GrasperBounds) -> Self {
        Self {
            bounds,
            closed: false,
            lowered: false,
            grasped: None,
        }
    }

    /// Reachable region
    pub fn bounds(&self) -> &GrasperBounds {
        &self.bounds
    }

    /// Whether the claw is closed
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether the grasper is lowered
    pub fn is_lowered(&self) -> bool {
        self.lowered
    }

    /// Object currently held, if any
    pub fn grasped(&self) -> Option<ObjectId> {
        self.grasped
    }
}

/// What bears the weight of a resting object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Support {
    /// The implicit ground plane
    Ground,
    /// Another object's top surface
    Object(ObjectId),
}

impl fmt::Display for Support {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ground => f.write_str("ground"),
            Self::Object(id) => write!(f, "object {id}"),
        }
    }
}

impl From<Support> for TagValue {
    fn from(support: Support) -> Self {
        match support {
            Support::Ground => TagValue::Ground,
            Support::Object(id) => TagValue::Object(id),
        }
    }
}

/// Immutable description of an object, fixed at creation
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTemplate {
    /// Object kind
    pub kind: ObjectKind,
    /// Physical extents
    pub dimensions: Dimensions,
    /// Whether a grasper may pick it up
    pub graspable: bool,
    /// Whether other objects may rest on it
    pub can_support: bool,
    /// Descriptive tags
    pub descriptors: Descriptors,
    /// Reach of a grasper; ignored for other kinds
    pub bounds: GrasperBounds,
}

impl ObjectTemplate {
    /// Template for a non-grasper object
    pub fn new(kind: ObjectKind, dimensions: Dimensions) -> Self {
        Self {
            kind,
            dimensions,
            graspable: false,
            can_support: false,
            descriptors: Descriptors::default(),
            bounds: GrasperBounds::unbounded(),
        }
    }

    /// Template for a grasper
    pub fn grasper(dimensions: Dimensions, bounds: GrasperBounds) -> Self {
        Self {
            bounds,
            ..Self::new(ObjectKind::Grasper, dimensions)
        }
    }

    /// Set whether the object may be picked up
    pub fn with_graspable(mut self, graspable: bool) -> Self {
        self.graspable = graspable;
        self
    }

    /// Set whether other objects may rest on it
    pub fn with_can_support(mut self, can_support: bool) -> Self {
        self.can_support = can_support;
        self
    }

    /// Set the descriptive tags
    pub fn with_descriptors(mut self, descriptors: Descriptors) -> Self {
        self.descriptors = descriptors;
        self
    }
}

/// A physical object within the scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub(crate) id: ObjectId,
    pub(crate) kind: ObjectKind,
    pub(crate) dimensions: Dimensions,
    pub(crate) position: Point3,
    pub(crate) graspable: bool,
    pub(crate) can_support: bool,
    pub(crate) descriptors: Descriptors,
    pub(crate) resting_on: Option<Support>,
    pub(crate) grasped_by: Option<ObjectId>,
    pub(crate) grasper: Option<GrasperState>,
}

impl SceneObject {
    pub(crate) fn new(id: ObjectId, template: ObjectTemplate, position: Point3, resting_on: Option<Support>) -> Self {
        let grasper = (template.kind == ObjectKind::Grasper).then(|| GrasperState::new(template.bounds));
        Self {
            id,
            kind: template.kind,
            dimensions: template.dimensions,
            position,
            graspable: template.graspable,
            can_support: template.can_support,
            descriptors: template.descriptors,
            resting_on: if grasper.is_some() { None } else { resting_on },
            grasped_by: None,
            grasper,
        }
    }

    /// Object identifier
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Object kind
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Physical extents
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Point of support (bottom centre)
    pub fn position(&self) -> Point3 {
        self.position
    }

    /// Whether a grasper may pick it up
    pub fn is_graspable(&self) -> bool {
        self.graspable
    }

    /// Whether other objects may rest on it
    pub fn can_support(&self) -> bool {
        self.can_support
    }

    /// Descriptive tags
    pub fn descriptors(&self) -> &Descriptors {
        &self.descriptors
    }

    /// What bears the object's weight, while it rests
    pub fn resting_on(&self) -> Option<Support> {
        self.resting_on
    }

    /// Grasper holding the object, if any
    pub fn grasped_by(&self) -> Option<ObjectId> {
        self.grasped_by
    }

    /// Grasper extension, for graspers only
    pub fn grasper(&self) -> Option<&GrasperState> {
        self.grasper.as_ref()
    }

    /// Whether this object is a grasper
    pub fn is_grasper(&self) -> bool {
        self.kind == ObjectKind::Grasper
    }

    /// Whether this object currently rests on something
    pub fn is_resting(&self) -> bool {
        self.resting_on.is_some()
    }

    /// Footprint at the current position
    pub fn footprint(&self) -> Rect {
        self.footprint_at(planar(&self.position))
    }

    /// Footprint if the object were centred on `center`
    pub fn footprint_at(&self, center: Vec2) -> Rect {
        Rect::from_center_size(center, self.dimensions.width, self.dimensions.depth)
    }

    /// Height of the top surface above the point of support
    ///
    /// Boxes are open, so their top surface is their floor. Tables are flat
    /// slabs whose top is their position.
    pub fn top_offset(&self) -> f32 {
        match self.kind {
            ObjectKind::Box | ObjectKind::Table | ObjectKind::Grasper => 0.0,
            ObjectKind::Block | ObjectKind::Pyramid => self.dimensions.height,
        }
    }

    /// Elevation of the top surface
    pub fn top(&self) -> f32 {
        self.position.z + self.top_offset()
    }

    /// Look up a tag value; `None` means the object does not carry the tag
    pub fn tag(&self, tag: Tag) -> Option<TagValue> {
        let text = |value: &Option<String>| value.clone().map(TagValue::Text);
        let bound = |value: Option<f32>| value.map(TagValue::Number);
        let grasper = self.grasper.as_ref();

        match tag {
            Tag::Kind => Some(TagValue::Text(self.kind.as_str().to_string())),
            Tag::Graspable => Some(TagValue::Flag(self.graspable)),
            Tag::CanSupport => Some(TagValue::Flag(self.can_support)),
            Tag::Color => text(&self.descriptors.color),
            Tag::Size => text(&self.descriptors.size),
            Tag::Height => text(&self.descriptors.height),
            Tag::Width => text(&self.descriptors.width),
            Tag::MinX => grasper.and_then(|g| bound(g.bounds.min_x)),
            Tag::MaxX => grasper.and_then(|g| bound(g.bounds.max_x)),
            Tag::MinY => grasper.and_then(|g| bound(g.bounds.min_y)),
            Tag::MaxY => grasper.and_then(|g| bound(g.bounds.max_y)),
            Tag::Closed => grasper.map(|g| TagValue::Flag(g.closed)),
            Tag::Lowered => grasper.map(|g| TagValue::Flag(g.lowered)),
            Tag::Grasped => grasper.map(|g| g.grasped.map_or(TagValue::Empty, TagValue::Object)),
            Tag::GraspedBy => (!self.is_grasper()).then(|| self.grasped_by.map_or(TagValue::Empty, TagValue::Object)),
            Tag::RestingOn => (!self.is_grasper()).then(|| self.resting_on.map_or(TagValue::Empty, TagValue::from)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> SceneObject {
        let template = ObjectTemplate::new(ObjectKind::Block, Dimensions::new(0.1, 0.1, 0.08))
            .with_graspable(true)
            .with_can_support(true)
            .with_descriptors(Descriptors::default().with_color("red"));
        SceneObject::new(ObjectId::from(2), template, Point3::new(0.5, 0.0, 0.0), Some(Support::Ground))
    }

    #[test]
    fn test_kind_round_trips_through_text() {
        for kind in ObjectKind::ALL {
            assert_eq!(kind.as_str().parse::<ObjectKind>(), Ok(kind));
        }
        assert!("sphere".parse::<ObjectKind>().is_err());
    }

    #[test]
    fn test_bounds_are_inclusive_and_open_when_missing() {
        let bounds = GrasperBounds {
            min_x: Some(-1.0),
            max_x: Some(1.0),
            ..GrasperBounds::unbounded()
        };

        assert!(bounds.contains(1.0, 1000.0));
        assert!(bounds.contains(-1.0, -1000.0));
        assert!(!bounds.contains(2.0, 0.0));
        assert!(!bounds.contains(f32::NAN, 0.0));
    }

    #[test]
    fn test_block_tags() {
        let block = block();

        assert_eq!(block.tag(Tag::Kind), Some(TagValue::Text("block".to_string())));
        assert_eq!(block.tag(Tag::Color), Some(TagValue::Text("red".to_string())));
        assert_eq!(block.tag(Tag::Size), None);
        assert_eq!(block.tag(Tag::RestingOn), Some(TagValue::Ground));
        assert_eq!(block.tag(Tag::GraspedBy), Some(TagValue::Empty));
        assert_eq!(block.tag(Tag::Closed), None);
        assert_eq!(block.tag(Tag::MinX), None);
    }

    #[test]
    fn test_grasper_tags() {
        let template = ObjectTemplate::grasper(
            Dimensions::new(0.05, 0.05, 1.0),
            GrasperBounds { max_x: Some(3.0), ..GrasperBounds::unbounded() },
        );
        let grasper = SceneObject::new(ObjectId::from(0), template, Point3::new(0.0, 0.0, 1.0), Some(Support::Ground));

        assert_eq!(grasper.resting_on(), None);
        assert_eq!(grasper.tag(Tag::RestingOn), None);
        assert_eq!(grasper.tag(Tag::MaxX), Some(TagValue::Number(3.0)));
        assert_eq!(grasper.tag(Tag::MinX), None);
        assert_eq!(grasper.tag(Tag::Closed), Some(TagValue::Flag(false)));
        assert_eq!(grasper.tag(Tag::Grasped), Some(TagValue::Empty));
    }

    #[test]
    fn test_top_surfaces() {
        let block = block();
        assert!((block.top() - 0.08).abs() < 1e-6);

        let open_box = SceneObject::new(
            ObjectId::from(5),
            ObjectTemplate::new(ObjectKind::Box, Dimensions::new(0.35, 0.35, 0.2)),
            Point3::new(0.25, 0.25, 0.0),
            Some(Support::Ground),
        );
        assert_eq!(open_box.top(), 0.0);
        assert!(open_box.footprint().contains_point(Vec2::new(0.1, 0.4), 0.0));
    }
}
