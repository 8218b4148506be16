//! Grasper control
//!
//! [`Controller`] is the public facade; [`GrasperProtocol`] implements the
//! per-grasper state machine underneath it.

mod callback;
mod controller;
mod grasper;
mod shared;

pub use callback::ResponseCallback;
pub use controller::Controller;
pub use grasper::GrasperProtocol;
pub use shared::SharedController;

#[cfg(test)]
mod tests;
