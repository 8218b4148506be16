//! Error types for scene queries and grasper actions
//!
//! Every failure leaves the scene exactly as it was before the call.

use crate::scene::{ObjectId, ObjectKind};
use std::fmt;
use thiserror::Error;

/// Scene and controller errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// An ID does not resolve to any object in the registry
    #[error("object {0} not found")]
    UnknownObject(ObjectId),

    /// An operation received an object of the wrong kind
    #[error("object {id} is a {found}, expected a {expected}")]
    WrongKind {
        /// Offending object
        id: ObjectId,
        /// Kind the operation requires
        expected: ObjectKind,
        /// Kind the object actually has
        found: ObjectKind,
    },

    /// A tag lookup referenced a tag the object does not carry
    #[error("unknown tag `{tag}`{}", .object.map(|id| format!(" on object {id}")).unwrap_or_default())]
    UnknownTag {
        /// Tag name as requested
        tag: String,
        /// Object the lookup was made against, if any
        object: Option<ObjectId>,
    },

    /// Requested grasper position lies outside its reachable bounds
    #[error("grasper {grasper} cannot reach ({x}, {y})")]
    OutOfReach {
        /// Grasper asked to move
        grasper: ObjectId,
        /// Requested x coordinate
        x: f32,
        /// Requested y coordinate
        y: f32,
    },

    /// Lateral move attempted while the grasper is lowered
    #[error("grasper {0} must be raised before it can be moved")]
    CannotMoveWhileLowered(ObjectId),

    /// Release attempted where the held object would have no valid support
    #[error("grasper {grasper} cannot drop object {object}: {reason}")]
    Drop {
        /// Grasper asked to open
        grasper: ObjectId,
        /// Object it is holding
        object: ObjectId,
        /// Why the release is not allowed
        reason: DropReason,
    },

    /// Two graspers would occupy the same landing spot
    #[error("grasper {grasper} would land on grasper {other}")]
    Conflict {
        /// Grasper asked to lower
        grasper: ObjectId,
        /// Lowered grasper already occupying the spot
        other: ObjectId,
    },

    /// A controller was built over a scene with no graspers
    #[error("scene contains no graspers")]
    NoGraspers,

    /// Scene definition data is inconsistent
    #[error("invalid scene definition: {0}")]
    InvalidScene(String),

    /// A scene invariant does not hold
    #[error("scene invariant violated: {0}")]
    InvariantViolation(String),

    /// Controller configuration rejected
    #[error("invalid controller configuration: {0}")]
    Config(String),
}

/// Reason a held object cannot be released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The grasper is raised, so the object is in mid-air
    NotLowered,
    /// Nothing bears weight at the object's resting point
    NoSupport,
    /// The surface underneath cannot support the object
    Unstable(ObjectId),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotLowered => write!(f, "the grasper must be lowered first"),
            Self::NoSupport => write!(f, "nothing underneath can support it"),
            Self::Unstable(surface) => write!(f, "object {surface} cannot support it"),
        }
    }
}

impl From<crate::config::ConfigError> for SceneError {
    fn from(error: crate::config::ConfigError) -> Self {
        Self::Config(error.to_string())
    }
}
