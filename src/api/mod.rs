//! HTTP clients for the mflix REST API
//!
//! - Catalog: movie list/detail/search/suggestions and curated rows
//! - Auth: login and registration

pub mod auth;
pub mod catalog;

use thiserror::Error;

pub use auth::AuthClient;
pub use catalog::CatalogClient;

/// API error taxonomy shared by both clients.
///
/// There is deliberately no retry/backoff variant anywhere: a failed
/// request surfaces immediately and the caller decides what stale or
/// empty state to show.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Authentication failed (401)")]
    Unauthorized,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}
