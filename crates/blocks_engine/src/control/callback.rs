//! Host callback contract
//!
//! The host loop hands each line of user input to a [`ResponseCallback`]
//! together with the controller, and prints whatever text comes back.

use super::Controller;

/// Turns user input into controller calls and an optional reply
pub trait ResponseCallback {
    /// Handle one input event
    fn respond(&mut self, controller: &mut Controller, input: &str) -> Option<String>;
}

impl<F> ResponseCallback for F
where
    F: FnMut(&mut Controller, &str) -> Option<String>,
{
    fn respond(&mut self, controller: &mut Controller, input: &str) -> Option<String> {
        self(controller, input)
    }
}
