//! Data structures and types for mflix
//!
//! Contains all shared models used across the application organized by domain:
//! - **Catalog**: movies, genres and the shared catalog contract
//! - **Playback**: resumable progress records
//! - **Auth**: users and sessions
//! - **Notifications**: transient "new title" entries

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// Catalog Models
// =============================================================================

/// A movie genre (id + name pair as served by the catalog API)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// A catalog title. One shape shared by every consumer: home rows, the
/// library grid, search results, the detail view and the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    /// Average rating on a 0-10 scale
    pub vote_average: f32,
    pub release_date: Option<String>,
    /// Runtime in minutes
    pub runtime: Option<u32>,
    pub genres: Vec<Genre>,
}

impl Movie {
    /// Release year, if the release date carries one
    pub fn year(&self) -> Option<u16> {
        self.release_date.as_deref().and_then(extract_year)
    }

    /// Total playback length in seconds (0 when runtime is unknown)
    pub fn duration_secs(&self) -> f64 {
        f64::from(self.runtime.unwrap_or(0)) * 60.0
    }

    /// Genre names joined for display
    pub fn genre_line(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year().map(|y| format!(" ({})", y)).unwrap_or_default();
        match self.runtime {
            Some(runtime) => {
                let hours = runtime / 60;
                let mins = runtime % 60;
                write!(
                    f,
                    "{}{} - {}h {}m - ★ {:.1}",
                    self.title, year_str, hours, mins, self.vote_average
                )
            }
            None => write!(f, "{}{} - ★ {:.1}", self.title, year_str, self.vote_average),
        }
    }
}

/// Extract year from a date string like "2022-03-04"
pub fn extract_year(date: &str) -> Option<u16> {
    if date.len() >= 4 {
        date[..4].parse().ok()
    } else {
        None
    }
}

// =============================================================================
// Playback Progress Models
// =============================================================================

/// A stored record older than this is stale and ignored on load
pub const PROGRESS_STALE_AFTER_MS: u64 = 7 * 24 * 60 * 60 * 1000;

/// A record within this many seconds of the end counts as finished
pub const PROGRESS_FINISHED_WINDOW_SECS: f64 = 30.0;

/// Persisted playback position for resuming a title, keyed by movie id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Playback position in seconds
    pub position_secs: f64,
    /// Total duration in seconds
    pub duration_secs: f64,
    /// Wall-clock write time, epoch milliseconds
    pub saved_at_ms: u64,
}

impl ProgressRecord {
    pub fn new(position_secs: f64, duration_secs: f64, saved_at_ms: u64) -> Self {
        Self {
            position_secs,
            duration_secs,
            saved_at_ms,
        }
    }

    /// Whether this record is older than the 7-day staleness horizon
    pub fn is_stale(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.saved_at_ms) > PROGRESS_STALE_AFTER_MS
    }

    /// Whether playback stopped inside the final 30 seconds
    pub fn is_finished(&self) -> bool {
        self.duration_secs > 0.0
            && self.duration_secs - self.position_secs <= PROGRESS_FINISHED_WINDOW_SECS
    }

    /// Position to resume from: 0 for stale or finished records,
    /// otherwise the stored position.
    pub fn resume_position(&self, now_ms: u64) -> f64 {
        if self.is_stale(now_ms) || self.is_finished() {
            0.0
        } else {
            self.position_secs
        }
    }

    /// Watched fraction (0.0-1.0) for progress bars
    pub fn fraction(&self) -> f64 {
        if self.duration_secs > 0.0 {
            (self.position_secs / self.duration_secs).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl fmt::Display for ProgressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} ({:.0}%)",
            format_secs(self.position_secs),
            format_secs(self.duration_secs),
            self.fraction() * 100.0
        )
    }
}

/// Format seconds as HH:MM:SS or MM:SS
pub fn format_secs(secs: f64) -> String {
    let total_secs = secs.max(0.0) as u64;
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

// =============================================================================
// Auth Models
// =============================================================================

/// Account profile as returned by the auth endpoints (or decoded from the
/// session token payload when the response omits it)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// An authenticated session: the bearer token plus its decoded user.
/// Absent session ⇒ anonymous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

// =============================================================================
// Notification Models
// =============================================================================

/// Transient "new in the catalog" entry surfaced by the poller.
/// Never persisted; the known-title set is what survives restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
}

impl Notification {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "New: {}", self.title)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
