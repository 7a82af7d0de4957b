//! Auth session store
//!
//! Explicit object holding the anonymous/authenticated state, passed to
//! whatever needs it, never an ambient singleton. The session survives
//! restarts through a single JSON file in local storage; a corrupt file
//! degrades to anonymous.

use crate::models::{Session, User};
use crate::storage::{Storage, SESSION_FILE};

/// Login/logout/register state holder backed by local storage
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Storage,
    session: Option<Session>,
}

impl SessionStore {
    /// Load the persisted session (if any) from storage
    pub fn load(storage: Storage) -> Self {
        let session: Option<Session> = storage.load(SESSION_FILE);
        Self { storage, session }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    /// Transition to authenticated and persist the session.
    /// A failed write is logged; the in-memory state still transitions so
    /// the running app works for this process.
    pub fn set(&mut self, session: Session) {
        if let Err(e) = self.storage.save(SESSION_FILE, &Some(&session)) {
            tracing::warn!(error = %e, "failed to persist session");
        }
        self.session = Some(session);
    }

    /// Return to anonymous unconditionally, clearing the persisted session
    pub fn clear(&mut self) {
        self.storage.delete(SESSION_FILE);
        self.session = None;
    }
}
