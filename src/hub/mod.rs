//! The `hub` module owns room membership and message fan-out.

pub mod engine;
pub mod message;
pub mod room;

use std::sync::{Arc, Mutex, MutexGuard};

pub use engine::Hub;
pub use message::{ChatMessage, SYSTEM_SENDER, ServerMessage};

use crate::utils::{HubError, Result};

/// The hub as shared between connection tasks.
pub type SharedHub = Arc<Mutex<Hub>>;

pub fn shared(hub: Hub) -> SharedHub {
    Arc::new(Mutex::new(hub))
}

/// Locks the shared hub, turning a poisoned lock into an error.
pub fn lock(hub: &SharedHub) -> Result<MutexGuard<'_, Hub>> {
    hub.lock().map_err(|_| HubError::LockPoisoned)
}
