use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque handle of one user's interaction context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SessionId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session:{}", self.0)
    }
}

/// Tells the flow which session the current call belongs to.
pub trait SessionProvider: Send + Sync {
    fn active_session(&self) -> Option<SessionId>;
}

/// Minimal provider: one explicitly activated session.
#[derive(Debug, Default)]
pub struct SessionTracker {
    active: Mutex<Option<SessionId>>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&self, session: SessionId) {
        *self.active.lock() = Some(session);
    }

    pub fn deactivate(&self) -> Option<SessionId> {
        self.active.lock().take()
    }
}

impl SessionProvider for SessionTracker {
    fn active_session(&self) -> Option<SessionId> {
        *self.active.lock()
    }
}
