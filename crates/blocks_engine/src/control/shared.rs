//! Thread-safe controller handle
//!
//! Multi-threaded hosts share one [`Controller`] behind a mutex. Each call to
//! [`SharedController::with`] is a single exclusion region, so an action and
//! the reads around it never interleave with another thread's action.

use super::Controller;
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable handle to a controller shared between threads
#[derive(Debug, Clone)]
pub struct SharedController {
    inner: Arc<Mutex<Controller>>,
}

impl SharedController {
    /// Wrap a controller
    pub fn new(controller: Controller) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    /// Run `f` with exclusive access to the controller
    pub fn with<R>(&self, f: impl FnOnce(&mut Controller) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Controller> {
        // Actions are all-or-nothing, so a panic elsewhere cannot leave a
        // half-applied change behind.
        self.inner.lock().unwrap_or_else(|poisoned| {
            log::warn!("Controller lock was poisoned; recovering");
            poisoned.into_inner()
        })
    }
}

impl From<Controller> for SharedController {
    fn from(controller: Controller) -> Self {
        Self::new(controller)
    }
}
