//! Terminal UI components
//!
//! Built with ratatui. Keyboard-first navigation throughout; each view
//! module owns its state object, rendering lives in main.rs.

pub mod auth_form;
pub mod browser;
pub mod detail;
pub mod player;
pub mod search;
pub mod theme;

pub use theme::Theme;
