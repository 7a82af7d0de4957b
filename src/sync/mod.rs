//! Client-side playback-progress and catalog-sync subsystem
//!
//! - `timer`: explicit debounce/throttle objects driven by the event loop
//! - `progress`: persisted, throttled playback positions
//! - `notify`: periodic catalog diffing for "new title" notifications

pub mod notify;
pub mod progress;
pub mod timer;

pub use notify::NotificationPoller;
pub use progress::{ProgressStore, ProgressTracker};
pub use timer::{Debouncer, WriteThrottle};
