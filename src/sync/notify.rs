//! Notification poller
//!
//! Diffs each catalog fetch against the persisted set of already-seen
//! titles; anything unseen becomes a transient notification and joins the
//! known set. Best-effort by design: a failed fetch is logged by the
//! caller and the next tick proceeds unaffected. No retry, no backoff.

use std::time::{Duration, Instant};

use crate::models::{Movie, Notification};
use crate::storage::{Storage, KNOWN_TITLES_FILE};

/// Catalog poller state: interval scheduling plus the known-title set
#[derive(Debug, Clone)]
pub struct NotificationPoller {
    interval: Duration,
    next_poll: Option<Instant>,
    known: Vec<String>,
    storage: Storage,
}

impl NotificationPoller {
    /// Load the persisted known-title set and arm an immediate first poll
    pub fn load(storage: Storage, interval: Duration) -> Self {
        let known: Vec<String> = storage.load(KNOWN_TITLES_FILE);
        Self {
            interval,
            next_poll: None,
            known,
            storage,
        }
    }

    /// Whether a poll is due. The first call is always due (startup
    /// poll); each due call arms the next interval.
    pub fn due_at(&mut self, now: Instant) -> bool {
        match self.next_poll {
            Some(next) if now < next => false,
            _ => {
                self.next_poll = Some(now + self.interval);
                true
            }
        }
    }

    pub fn due(&mut self) -> bool {
        self.due_at(Instant::now())
    }

    /// Diff a fetched catalog against the known set. Unseen titles come
    /// back as notifications and the persisted set grows to include them.
    pub fn observe(&mut self, movies: &[Movie]) -> Vec<Notification> {
        let fresh: Vec<&str> = movies
            .iter()
            .map(|m| m.title.as_str())
            .filter(|t| !t.is_empty() && !self.known.iter().any(|k| k == t))
            .collect();

        if fresh.is_empty() {
            return Vec::new();
        }

        let notifications: Vec<Notification> =
            fresh.iter().map(|t| Notification::new(*t)).collect();
        self.known.extend(fresh.iter().map(|t| t.to_string()));

        if let Err(e) = self.storage.save(KNOWN_TITLES_FILE, &self.known) {
            tracing::warn!(error = %e, "failed to persist known titles");
        }

        notifications
    }

    pub fn known_titles(&self) -> &[String] {
        &self.known
    }
}
