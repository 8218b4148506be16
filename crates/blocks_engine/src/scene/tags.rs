//! Tag names and values
//!
//! Tags form a closed vocabulary. Which tags an object carries depends on its
//! kind: graspers carry the claw state and reach bounds, everything else
//! carries `resting_on` and `grasped_by`.

use crate::error::SceneError;
use crate::scene::ObjectId;
use std::fmt;
use std::str::FromStr;

/// Recognised tag names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    /// Object kind
    Kind,
    /// Whether a grasper may pick the object up
    Graspable,
    /// Whether other objects may rest on the object
    CanSupport,
    /// Colour descriptor
    Color,
    /// Size descriptor
    Size,
    /// Height descriptor
    Height,
    /// Width descriptor
    Width,
    /// Grasper reach, lower x bound
    MinX,
    /// Grasper reach, upper x bound
    MaxX,
    /// Grasper reach, lower y bound
    MinY,
    /// Grasper reach, upper y bound
    MaxY,
    /// Whether the grasper claw is closed
    Closed,
    /// Whether the grasper is lowered
    Lowered,
    /// Object held by the grasper
    Grasped,
    /// Grasper holding the object
    GraspedBy,
    /// Surface bearing the object
    RestingOn,
}

impl Tag {
    /// Every tag, in iteration order
    pub const ALL: [Tag; 16] = [
        Tag::Kind,
        Tag::Graspable,
        Tag::CanSupport,
        Tag::Color,
        Tag::Size,
        Tag::Height,
        Tag::Width,
        Tag::MinX,
        Tag::MaxX,
        Tag::MinY,
        Tag::MaxY,
        Tag::Closed,
        Tag::Lowered,
        Tag::Grasped,
        Tag::GraspedBy,
        Tag::RestingOn,
    ];

    /// Tag name as used by agents
    pub fn name(self) -> &'static str {
        match self {
            Self::Kind => "kind",
            Self::Graspable => "graspable",
            Self::CanSupport => "can_support",
            Self::Color => "color",
            Self::Size => "size",
            Self::Height => "height",
            Self::Width => "width",
            Self::MinX => "min_x",
            Self::MaxX => "max_x",
            Self::MinY => "min_y",
            Self::MaxY => "max_y",
            Self::Closed => "closed",
            Self::Lowered => "lowered",
            Self::Grasped => "grasped",
            Self::GraspedBy => "grasped_by",
            Self::RestingOn => "resting_on",
        }
    }

    /// Whether grasper actions can change this tag
    pub fn is_mutable(self) -> bool {
        matches!(
            self,
            Self::Closed | Self::Lowered | Self::Grasped | Self::GraspedBy | Self::RestingOn
        )
    }

    /// Parse a textual value of the type this tag holds
    ///
    /// Object references are plain integers; `none` means no object and
    /// `ground` is accepted for `resting_on`.
    pub fn parse_value(self, text: &str) -> Option<TagValue> {
        match self {
            Self::Kind | Self::Color | Self::Size | Self::Height | Self::Width => {
                Some(TagValue::Text(text.to_string()))
            }
            Self::Graspable | Self::CanSupport | Self::Closed | Self::Lowered => {
                text.parse().ok().map(TagValue::Flag)
            }
            Self::MinX | Self::MaxX | Self::MinY | Self::MaxY => text.parse().ok().map(TagValue::Number),
            Self::Grasped | Self::GraspedBy | Self::RestingOn => match text {
                "none" => Some(TagValue::Empty),
                "ground" if self == Self::RestingOn => Some(TagValue::Ground),
                _ => text.parse::<u32>().ok().map(|id| TagValue::Object(ObjectId::from(id))),
            },
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tag {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.name() == s)
            .ok_or_else(|| SceneError::UnknownTag { tag: s.to_string(), object: None })
    }
}

/// Value of a tag
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// Free text (kind and descriptors)
    Text(String),
    /// Boolean flag
    Flag(bool),
    /// Number (grasper bounds)
    Number(f32),
    /// Reference to another object
    Object(ObjectId),
    /// The ground plane (only for `resting_on`)
    Ground,
    /// An optional reference that is currently unset
    Empty,
}

impl TagValue {
    /// Referenced object, if this value is a reference
    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Self::Object(id) => Some(*id),
            _ => None,
        }
    }

    /// Text value, if this value is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Flag(flag) => write!(f, "{flag}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::Object(id) => write!(f, "{id}"),
            Self::Ground => f.write_str("ground"),
            Self::Empty => f.write_str("none"),
        }
    }
}

impl From<&str> for TagValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<bool> for TagValue {
    fn from(flag: bool) -> Self {
        Self::Flag(flag)
    }
}

impl From<ObjectId> for TagValue {
    fn from(id: ObjectId) -> Self {
        Self::Object(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for tag in Tag::ALL {
            assert_eq!(tag.name().parse::<Tag>(), Ok(tag));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(
            "flavor".parse::<Tag>(),
            Err(SceneError::UnknownTag { tag: "flavor".to_string(), object: None })
        );
    }

    #[test]
    fn test_mutable_split() {
        let mutable: Vec<_> = Tag::ALL.into_iter().filter(|tag| tag.is_mutable()).collect();
        assert_eq!(mutable, vec![Tag::Closed, Tag::Lowered, Tag::Grasped, Tag::GraspedBy, Tag::RestingOn]);
    }

    #[test]
    fn test_parse_value_by_tag_type() {
        assert_eq!(Tag::Color.parse_value("red"), Some(TagValue::from("red")));
        assert_eq!(Tag::Graspable.parse_value("true"), Some(TagValue::Flag(true)));
        assert_eq!(Tag::Graspable.parse_value("yes"), None);
        assert_eq!(Tag::MaxX.parse_value("2.5"), Some(TagValue::Number(2.5)));
        assert_eq!(Tag::RestingOn.parse_value("ground"), Some(TagValue::Ground));
        assert_eq!(Tag::GraspedBy.parse_value("ground"), None);
        assert_eq!(Tag::RestingOn.parse_value("4"), Some(TagValue::Object(ObjectId::from(4))));
        assert_eq!(Tag::Grasped.parse_value("none"), Some(TagValue::Empty));
    }

    #[test]
    fn test_value_accessors() {
        let id = ObjectId::from(3);

        assert_eq!(TagValue::from(id).as_object(), Some(id));
        assert_eq!(TagValue::Ground.as_object(), None);
        assert_eq!(TagValue::from("box").as_text(), Some("box"));
        assert_eq!(TagValue::Flag(true).as_text(), None);
    }
}
