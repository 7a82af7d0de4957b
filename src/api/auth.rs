//! Auth API client
//!
//! Login and registration against the mflix auth endpoints. A successful
//! response carries a token and usually the user object; when the user is
//! missing it is decoded from the token's JWT payload instead. The client
//! never refreshes tokens or checks expiry; the server owns that.

use anyhow::Result;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ApiError;
use crate::models::{Session, User};

/// Auth API client
#[derive(Debug, Clone)]
pub struct AuthClient {
    base_url: String,
    client: reqwest::Client,
}

impl AuthClient {
    /// Create a new client against the given API base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Log in with credentials. Invalid credentials surface as
    /// [`ApiError::Unauthorized`]; no state is touched here; the caller
    /// owns session persistence.
    pub async fn login(&self, login: &str, password: &str) -> Result<Session> {
        self.post(
            "/auth/login",
            &LoginRequest {
                login: login.to_string(),
                password: password.to_string(),
            },
        )
        .await
    }

    /// Register a new account. Mirrors login: success yields a session.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<Session> {
        self.post(
            "/auth/register",
            &RegisterRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await
    }

    async fn post<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<Session> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(ApiError::RequestFailed)?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                let body = response.text().await.map_err(ApiError::RequestFailed)?;
                let parsed: AuthResponse = serde_json::from_str(&body)
                    .map_err(|e| ApiError::InvalidResponse(format!("JSON parse error: {}", e)))?;
                parsed.into_session()
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::BAD_REQUEST => {
                Err(ApiError::Unauthorized.into())
            }
            StatusCode::NOT_FOUND => Err(ApiError::NotFound.into()),
            status => Err(ApiError::ServerError(status.as_u16()).into()),
        }
    }
}

// =============================================================================
// Request / Response Structures
// =============================================================================

#[derive(Debug, Serialize)]
struct LoginRequest {
    login: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct RegisterRequest {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    user: Option<User>,
}

impl AuthResponse {
    fn into_session(self) -> Result<Session> {
        let user = match self.user {
            Some(user) => user,
            None => decode_user_claims(&self.token).ok_or_else(|| {
                ApiError::InvalidResponse("response carried neither user nor decodable token".into())
            })?,
        };
        Ok(Session {
            token: self.token,
            user,
        })
    }
}

// =============================================================================
// JWT Payload Decoding
// =============================================================================

/// Claims carried in the token payload. Field names follow the server's
/// JWT convention (`sub` for the user id).
#[derive(Debug, Deserialize)]
struct TokenClaims {
    sub: String,
    name: String,
    email: String,
    #[serde(default)]
    avatar: Option<String>,
}

/// Decode the user object out of a JWT payload segment without verifying
/// the signature: the client has no key and the server re-checks every
/// request anyway. Returns None for anything that is not a decodable
/// three-segment token.
pub fn decode_user_claims(token: &str) -> Option<User> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: TokenClaims = serde_json::from_slice(&bytes).ok()?;
    Some(User {
        id: claims.sub,
        name: claims.name,
        email: claims.email,
        avatar: claims.avatar,
    })
}
