//! # Blocks Engine
//!
//! A discrete blocks-world scene driven through a grasper controller.
//!
//! ## Features
//!
//! - **Object Registry**: Stable integer IDs with typed tag lookup
//! - **Support Graph**: Derived `resting_on` relation with contact queries
//! - **Grasper State Machine**: Lower, raise, close, open and move with
//!   all-or-nothing semantics
//! - **Scene Definitions**: Load arrangements from `.ron` or `.toml` files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use blocks_engine::prelude::*;
//!
//! fn main() -> Result<(), SceneError> {
//!     let mut controller = Controller::new(Scene::standard()?, ControllerConfig::default())?;
//!
//!     controller.move_grasper(-0.25, -0.2, None)?;
//!     controller.lower_grasper(None)?;
//!     controller.close_grasper(None)?;
//!     controller.raise_grasper(None)?;
//!
//!     let held = controller.get_grasped_object(None)?;
//!     println!("holding {held:?}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::cast_possible_truncation)]

pub mod config;
pub mod control;
pub mod error;
pub mod foundation;
pub mod scene;
pub mod view;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ControllerConfig},
        control::{Controller, ResponseCallback, SharedController},
        error::{DropReason, SceneError},
        foundation::math::{Point3, Vec2, Vec3},
        scene::{ObjectId, ObjectKind, Scene, SceneDefinition, Support, Tag, TagValue},
        view::{ObjectView, SceneSnapshot},
    };
}
