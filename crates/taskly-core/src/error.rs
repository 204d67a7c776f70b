// ── Core error types ──
//
// Errors surfaced to presentation code. Callers branch on `kind()`,
// never on message text. The `From<taskly_api::Error>` impl translates
// transport-layer errors into this taxonomy.

use taskly_api::StatusCategory;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Client-side ──────────────────────────────────────────────────
    /// Input rejected before any request was sent.
    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    // ── Remote ───────────────────────────────────────────────────────
    /// The task service could not be reached.
    #[error("Cannot reach task service: {message}")]
    Transport { message: String },

    /// The task service answered with a non-success status.
    #[error("Task service rejected the request ({category}, HTTP {status}): {message}")]
    RemoteRejection {
        status: u16,
        category: StatusCategory,
        message: String,
    },

    // ── Data ─────────────────────────────────────────────────────────
    /// The record is not present in the current snapshot.
    #[error("Task not found: {id}")]
    NotFound { id: String },

    /// A list response carried the same id twice.
    #[error("List response contains duplicate task id {id}")]
    DuplicateId { id: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Discriminant of [`CoreError`], for callers that only need the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    RemoteRejection,
    NotFound,
    DuplicateId,
    Config,
    Internal,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::RemoteRejection { .. } => ErrorKind::RemoteRejection,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::DuplicateId { .. } => ErrorKind::DuplicateId,
            Self::Config { .. } => ErrorKind::Config,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn blank_title() -> Self {
        Self::Validation {
            field: "title".into(),
            message: "title must not be blank".into(),
        }
    }

    pub(crate) fn not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound { id: id.to_string() }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<taskly_api::Error> for CoreError {
    fn from(err: taskly_api::Error) -> Self {
        match err {
            taskly_api::Error::Transport(e) => CoreError::Transport {
                message: e.to_string(),
            },
            taskly_api::Error::RemoteRejection { status, message } => CoreError::RemoteRejection {
                status,
                category: StatusCategory::from_status(status),
                message,
            },
            taskly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            taskly_api::Error::InvalidEndpoint(url) => CoreError::Config {
                message: format!("Invalid endpoint: {url}"),
            },
            taskly_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            taskly_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
