//! CLI error types with miette diagnostics.
//!
//! Maps session, decode, config and format failures into user-facing
//! errors with help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use unictl_api::Cause;
use unictl_config::ConfigError;
use unictl_core::{DecodeError, UnknownSortKey};

use crate::output::FormatError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the controller: {message}")]
    #[diagnostic(
        code(unictl::connection_failed),
        help(
            "Check that the controller is running and reachable.\n\
             Endpoint: {endpoint}"
        )
    )]
    ConnectionFailed { endpoint: String, message: String },

    #[error("Request timed out: {message}")]
    #[diagnostic(
        code(unictl::timeout),
        help("Increase the timeout with --timeout or check controller responsiveness.")
    )]
    Timeout { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(unictl::auth_failed),
        help("Verify the username and password for profile '{profile}'.")
    )]
    AuthFailed { profile: String, message: String },

    #[error("Incomplete session settings: {message}")]
    #[diagnostic(
        code(unictl::no_credentials),
        help(
            "Pass --endpoint, --username and --password, set UNICTL_USERNAME and\n\
             UNICTL_PASSWORD, or add them to profile '{profile}' in {path}."
        )
    )]
    NoCredentials {
        profile: String,
        path: String,
        message: String,
    },

    // ── Controller ───────────────────────────────────────────────────
    #[error("Controller error: {message}")]
    #[diagnostic(code(unictl::api_error))]
    ApiError {
        message: String,
        #[help]
        body: Option<String>,
    },

    #[error(transparent)]
    #[diagnostic(code(unictl::decode))]
    Decode(#[from] DecodeError),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(unictl::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(unictl::sort))]
    Sort(#[from] UnknownSortKey),

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(unictl::config))]
    Config(#[from] ConfigError),

    // ── Output ───────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(unictl::output))]
    Format(#[from] FormatError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Validation { .. }
            | Self::Sort(_)
            | Self::Config(ConfigError::UnknownProfile { .. })
            | Self::Format(FormatError::Unsupported(_)) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Classify an accumulated session error by its most recent cause.
    pub fn from_session(err: &unictl_api::Error, profile: &str, path: &str) -> Self {
        let message = err.to_string();
        match err.latest() {
            Cause::Missing(_) => Self::NoCredentials {
                profile: profile.to_owned(),
                path: path.to_owned(),
                message,
            },
            Cause::InvalidEndpoint { .. } | Cause::TooManyStreams(_) | Cause::Transport(_) => {
                Self::Validation {
                    field: "session".into(),
                    reason: message,
                }
            }
            Cause::Request { url, .. } => Self::ConnectionFailed {
                endpoint: url.clone(),
                message,
            },
            Cause::Timeout { .. } => Self::Timeout { message },
            Cause::Status { code: 401 | 403, .. } => Self::AuthFailed {
                profile: profile.to_owned(),
                message,
            },
            Cause::Status { body, .. } => Self::ApiError {
                message,
                body: (!body.is_empty()).then(|| body.clone()),
            },
        }
    }
}
