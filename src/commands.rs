//! CLI Command Handlers
//!
//! Implements all CLI commands against the catalog/auth clients and the
//! local stores. Each handler takes CLI args and Output, returns ExitCode.

use serde::Serialize;

use crate::api::{ApiError, AuthClient, CatalogClient};
use crate::cli::{
    BrowseCmd, ExitCode, InfoCmd, ListCmd, LoginCmd, NotificationsCmd, Output, ProgressCmd,
    RegisterCmd, SearchCmd, StreamUrlCmd, SuggestCmd,
};
use crate::config::Config;
use crate::models::{Notification, User};
use crate::session::SessionStore;
use crate::storage::{epoch_ms, Storage};
use crate::sync::notify::NotificationPoller;
use crate::sync::progress::ProgressStore;

/// Map an API failure onto the CLI exit code taxonomy
fn api_exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<ApiError>() {
        Some(ApiError::NotFound) => ExitCode::NotFound,
        Some(ApiError::Unauthorized) => ExitCode::AuthError,
        Some(ApiError::ServerError(_)) | Some(ApiError::RequestFailed(_)) => ExitCode::NetworkError,
        Some(ApiError::InvalidResponse(_)) => ExitCode::Error,
        None => ExitCode::Error,
    }
}

fn open_storage(output: &Output) -> Result<Storage, ExitCode> {
    Storage::open_default()
        .ok_or_else(|| output.error("Could not open the local data directory", ExitCode::Error))
}

// =============================================================================
// Catalog Commands
// =============================================================================

pub async fn list_cmd(cmd: ListCmd, config: &Config, output: &Output) -> ExitCode {
    let client = CatalogClient::new(config.api_base_url());

    match client.list().await {
        Ok(mut movies) => {
            movies.truncate(cmd.limit);
            if let Err(e) = output.print(&movies) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => {
            let code = api_exit_code(&e);
            output.error(format!("Catalog fetch failed: {}", e), code)
        }
    }
}

pub async fn browse_cmd(cmd: BrowseCmd, config: &Config, output: &Output) -> ExitCode {
    let client = CatalogClient::new(config.api_base_url());
    let category = cmd.category.into();

    match client.category(category).await {
        Ok(mut movies) => {
            movies.truncate(cmd.limit);
            if let Err(e) = output.print(&movies) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => {
            let code = api_exit_code(&e);
            output.error(format!("Browse failed: {}", e), code)
        }
    }
}

pub async fn search_cmd(cmd: SearchCmd, config: &Config, output: &Output) -> ExitCode {
    let client = CatalogClient::new(config.api_base_url());

    output.info(format!("Searching for: {}", cmd.query));

    match client.search(&cmd.query).await {
        Ok(mut results) => {
            results.truncate(cmd.limit);
            if let Err(e) = output.print(&results) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => {
            let code = api_exit_code(&e);
            output.error(format!("Search failed: {}", e), code)
        }
    }
}

pub async fn suggest_cmd(cmd: SuggestCmd, config: &Config, output: &Output) -> ExitCode {
    let client = CatalogClient::new(config.api_base_url());

    match client.suggestions(&cmd.query).await {
        Ok(suggestions) => {
            if let Err(e) = output.print(&suggestions) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => {
            let code = api_exit_code(&e);
            output.error(format!("Suggestions failed: {}", e), code)
        }
    }
}

pub async fn info_cmd(cmd: InfoCmd, config: &Config, output: &Output) -> ExitCode {
    let client = CatalogClient::new(config.api_base_url());

    match client.detail(cmd.id).await {
        Ok(movie) => {
            if let Err(e) = output.print(&movie) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => {
            let code = api_exit_code(&e);
            output.error(format!("Movie {} lookup failed: {}", cmd.id, e), code)
        }
    }
}

#[derive(Debug, Serialize)]
struct StreamUrlResponse {
    id: u64,
    url: String,
}

pub async fn stream_url_cmd(cmd: StreamUrlCmd, config: &Config, output: &Output) -> ExitCode {
    let storage = match open_storage(output) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let sessions = SessionStore::load(storage);

    let mut client = CatalogClient::new(config.api_base_url());
    if let Some(token) = sessions.token() {
        client = client.with_token(token);
    }

    match client.stream_url(cmd.id).await {
        Ok(url) => {
            if let Err(e) = output.print(StreamUrlResponse { id: cmd.id, url }) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => {
            let code = api_exit_code(&e);
            output.error(format!("Stream lookup failed: {}", e), code)
        }
    }
}

// =============================================================================
// Account Commands
// =============================================================================

pub async fn login_cmd(cmd: LoginCmd, config: &Config, output: &Output) -> ExitCode {
    let storage = match open_storage(output) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let client = AuthClient::new(config.api_base_url());
    match client.login(&cmd.login, &cmd.password).await {
        Ok(session) => {
            let user = session.user.clone();
            SessionStore::load(storage).set(session);
            output.line(format!("Signed in as {}", user));
            if output.json {
                if let Err(e) = output.print(&user) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
            }
            ExitCode::Success
        }
        Err(e) => match e.downcast_ref::<ApiError>() {
            Some(ApiError::Unauthorized) => {
                output.error("Invalid credentials", ExitCode::AuthError)
            }
            _ => {
                let code = api_exit_code(&e);
                output.error(format!("Login failed: {}", e), code)
            }
        },
    }
}

pub async fn register_cmd(cmd: RegisterCmd, config: &Config, output: &Output) -> ExitCode {
    let storage = match open_storage(output) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let client = AuthClient::new(config.api_base_url());
    match client.register(&cmd.name, &cmd.email, &cmd.password).await {
        Ok(session) => {
            let user = session.user.clone();
            SessionStore::load(storage).set(session);
            output.line(format!("Registered as {}", user));
            if output.json {
                if let Err(e) = output.print(&user) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
            }
            ExitCode::Success
        }
        Err(e) => match e.downcast_ref::<ApiError>() {
            Some(ApiError::Unauthorized) => {
                output.error("Registration rejected", ExitCode::AuthError)
            }
            _ => {
                let code = api_exit_code(&e);
                output.error(format!("Registration failed: {}", e), code)
            }
        },
    }
}

pub async fn logout_cmd(output: &Output) -> ExitCode {
    let storage = match open_storage(output) {
        Ok(s) => s,
        Err(code) => return code,
    };

    SessionStore::load(storage).clear();
    output.line("Signed out");
    ExitCode::Success
}

#[derive(Debug, Serialize)]
struct WhoamiResponse {
    user: User,
}

pub async fn whoami_cmd(output: &Output) -> ExitCode {
    let storage = match open_storage(output) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let sessions = SessionStore::load(storage);
    match sessions.user() {
        Some(user) => {
            if output.json {
                if let Err(e) = output.print(WhoamiResponse { user: user.clone() }) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
            } else {
                output.line(user);
            }
            ExitCode::Success
        }
        None => output.error("Not signed in", ExitCode::AuthError),
    }
}

// =============================================================================
// Sync Commands
// =============================================================================

#[derive(Debug, Serialize)]
struct ProgressResponse {
    movie_id: u64,
    position_secs: f64,
    duration_secs: f64,
    /// Where playback would resume, after staleness/finished rules
    resume_secs: f64,
}

pub async fn progress_cmd(cmd: ProgressCmd, output: &Output) -> ExitCode {
    let storage = match open_storage(output) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let store = ProgressStore::load(storage);
    match store.get(cmd.id) {
        Some(record) => {
            let response = ProgressResponse {
                movie_id: cmd.id,
                position_secs: record.position_secs,
                duration_secs: record.duration_secs,
                resume_secs: record.resume_position(epoch_ms()),
            };
            if let Err(e) = output.print(&response) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        None => output.error(
            format!("No saved progress for movie {}", cmd.id),
            ExitCode::NotFound,
        ),
    }
}

#[derive(Debug, Serialize)]
struct NotificationsResponse {
    new_titles: Vec<Notification>,
    known_count: usize,
}

pub async fn notifications_cmd(
    cmd: NotificationsCmd,
    config: &Config,
    output: &Output,
) -> ExitCode {
    let storage = match open_storage(output) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let mut poller = NotificationPoller::load(storage, config.poll_interval());

    if !cmd.check {
        output.line(format!("{} known titles", poller.known_titles().len()));
        if output.json {
            if let Err(e) = output.print(poller.known_titles()) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
        }
        return ExitCode::Success;
    }

    let client = CatalogClient::new(config.api_base_url());
    match client.list().await {
        Ok(movies) => {
            let fresh = poller.observe(&movies);
            for n in &fresh {
                output.line(n);
            }
            if fresh.is_empty() {
                output.info("Nothing new");
            }
            if output.json {
                let response = NotificationsResponse {
                    known_count: poller.known_titles().len(),
                    new_titles: fresh,
                };
                if let Err(e) = output.print(&response) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
            }
            ExitCode::Success
        }
        Err(e) => {
            let code = api_exit_code(&e);
            output.error(format!("Catalog poll failed: {}", e), code)
        }
    }
}
