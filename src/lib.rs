//! mflix - terminal client for the mflix streaming catalog
//!
//! Browse, search and resume titles from a terminal: an interactive
//! ratatui UI plus a scriptable CLI over the same core.
//!
//! # Modules
//!
//! - `models` - Shared data contract (movies, progress records, sessions)
//! - `api` - REST clients (catalog, auth)
//! - `storage` - JSON-file local storage (the browser-storage analog)
//! - `session` - Auth session store
//! - `sync` - Progress tracking, notification polling, timer objects
//! - `ui` - View state and theme
//! - `app` - Application state machine and navigation
//! - `cli` / `commands` - Scriptable command surface

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod session;
pub mod storage;
pub mod sync;
pub mod ui;

// Re-export commonly used types
pub use api::{ApiError, AuthClient, CatalogClient};
pub use app::{Action, App, AppState, InputMode, UiMessage};
pub use models::{Genre, Movie, Notification, ProgressRecord, Session, User};
pub use session::SessionStore;
pub use storage::Storage;
pub use sync::{Debouncer, NotificationPoller, ProgressStore, ProgressTracker, WriteThrottle};
