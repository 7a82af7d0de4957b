//! CLI - Command Line Interface for mflix
//!
//! Every catalog and account operation is scriptable; all output is
//! JSON-parseable with `--json`.
//!
//! # Examples
//!
//! ```bash
//! # Search the catalog
//! mflix search "the matrix" --json
//!
//! # Curated rows and details
//! mflix browse trending
//! mflix info 42
//!
//! # Account
//! mflix login ada secret
//! mflix whoami
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::api::catalog::Category;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Authentication required or failed
    AuthError = 4,
    /// Entity not found
    NotFound = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// mflix - terminal client for the mflix streaming catalog
///
/// Run without arguments to launch the interactive TUI.
/// Use subcommands for automation and scripting.
#[derive(Parser, Debug)]
#[command(
    name = "mflix",
    version,
    author = "Gorka & Hermes",
    about = "Terminal client for the mflix streaming catalog",
    long_about = "Browse, search and resume titles from the mflix catalog.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  mflix                        Launch interactive TUI\n\
                  mflix search \"the matrix\"    Search the catalog\n\
                  mflix browse trending        Curated row\n\
                  mflix login ada secret       Sign in\n\
                  mflix progress 42            Saved resume position"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the full catalog
    #[command(visible_alias = "ls")]
    List(ListCmd),

    /// Show a curated catalog row
    #[command(visible_alias = "b")]
    Browse(BrowseCmd),

    /// Search the catalog
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Get search suggestions for a query prefix
    Suggest(SuggestCmd),

    /// Get details for a movie
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// Resolve the stream URL for a movie
    #[command(visible_alias = "url")]
    StreamUrl(StreamUrlCmd),

    /// Sign in and persist the session
    Login(LoginCmd),

    /// Create an account and persist the session
    Register(RegisterCmd),

    /// Clear the persisted session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Show the saved resume position for a movie
    #[command(visible_alias = "pr")]
    Progress(ProgressCmd),

    /// Run one notification poll cycle against the known-title set
    #[command(visible_alias = "n")]
    Notifications(NotificationsCmd),
}

// =============================================================================
// Catalog Commands
// =============================================================================

/// List the full catalog
#[derive(Args, Debug)]
pub struct ListCmd {
    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "50")]
    pub limit: usize,
}

/// Show a curated catalog row
#[derive(Args, Debug)]
pub struct BrowseCmd {
    /// Which curated row to fetch
    #[arg(value_enum)]
    pub category: CategoryArg,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Curated row selector
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryArg {
    Featured,
    Trending,
    Popular,
    #[value(name = "top-rated")]
    TopRated,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Category {
        match arg {
            CategoryArg::Featured => Category::Featured,
            CategoryArg::Trending => Category::Trending,
            CategoryArg::Popular => Category::Popular,
            CategoryArg::TopRated => Category::TopRated,
        }
    }
}

/// Search the catalog by title
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title, keywords)
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Get suggestion strings for a query prefix
#[derive(Args, Debug)]
pub struct SuggestCmd {
    /// Query prefix
    #[arg(required = true)]
    pub query: String,
}

/// Get details for one movie
#[derive(Args, Debug)]
pub struct InfoCmd {
    /// Movie id
    #[arg(required = true)]
    pub id: u64,
}

/// Resolve the playable stream URL
#[derive(Args, Debug)]
pub struct StreamUrlCmd {
    /// Movie id
    #[arg(required = true)]
    pub id: u64,
}

// =============================================================================
// Account Commands
// =============================================================================

/// Sign in with credentials
#[derive(Args, Debug)]
pub struct LoginCmd {
    /// Login (username or email)
    #[arg(required = true)]
    pub login: String,

    /// Password
    #[arg(required = true)]
    pub password: String,
}

/// Create an account
#[derive(Args, Debug)]
pub struct RegisterCmd {
    /// Display name
    #[arg(required = true)]
    pub name: String,

    /// Email address
    #[arg(required = true)]
    pub email: String,

    /// Password
    #[arg(required = true)]
    pub password: String,
}

// =============================================================================
// Sync Commands
// =============================================================================

/// Show the saved resume position for a movie
#[derive(Args, Debug)]
pub struct ProgressCmd {
    /// Movie id
    #[arg(required = true)]
    pub id: u64,
}

/// Run one notification poll cycle
#[derive(Args, Debug)]
pub struct NotificationsCmd {
    /// Fetch the catalog and diff it against the known-title set
    #[arg(long)]
    pub check: bool,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print a plain line (human mode) or nothing (JSON mode handles data)
    pub fn line(&self, msg: impl std::fmt::Display) {
        if !self.json {
            println!("{}", msg);
        }
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
