//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use taskly_config::ConfigError;
use taskly_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the task service")]
    #[diagnostic(
        code(taskly::connection_failed),
        help(
            "Check that the service is running and the endpoint is right.\n\
             Cause: {message}\n\
             Try: taskly --endpoint http://localhost:3000/api/tasks list"
        )
    )]
    ConnectionFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Task '{id}' not found")]
    #[diagnostic(
        code(taskly::not_found),
        help("Run: taskly list to see available tasks")
    )]
    NotFound { id: String },

    // ── Service ──────────────────────────────────────────────────────
    #[error("Task service rejected the request (HTTP {status}, {category})")]
    #[diagnostic(code(taskly::rejected), help("{message}"))]
    Rejected {
        status: u16,
        category: String,
        message: String,
    },

    #[error("Task service returned inconsistent data: {message}")]
    #[diagnostic(code(taskly::inconsistent_data))]
    InconsistentData { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(taskly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(taskly::profile_not_found),
        help("Add a [profiles.{name}] table to {path}")
    )]
    ProfileNotFound { name: String, path: String },

    #[error("{message}")]
    #[diagnostic(code(taskly::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(taskly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Internal error: {message}")]
    #[diagnostic(code(taskly::internal))]
    Internal { message: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(taskly::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(taskly::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to render TOML: {0}")]
    #[diagnostic(code(taskly::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<&CoreError> for CliError {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::Validation { field, message } => CliError::Validation {
                field: field.clone(),
                reason: message.clone(),
            },

            CoreError::Transport { message } => CliError::ConnectionFailed {
                message: message.clone(),
            },

            CoreError::RemoteRejection {
                status,
                category,
                message,
            } => CliError::Rejected {
                status: *status,
                category: category.to_string(),
                message: message.clone(),
            },

            CoreError::NotFound { id } => CliError::NotFound { id: id.clone() },

            CoreError::DuplicateId { .. } => CliError::InconsistentData {
                message: err.to_string(),
            },

            CoreError::Config { message } => CliError::Config {
                message: message.clone(),
            },

            CoreError::Internal(message) => CliError::Internal {
                message: message.clone(),
            },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        Self::from(&err)
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                path: taskly_config::config_path().display().to_string(),
            },
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
