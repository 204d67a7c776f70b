use thiserror::Error;

/// Top-level error type for the `taskly-api` crate.
///
/// Covers every failure mode of the task collection endpoint: transport,
/// endpoint construction, TLS setup, non-success responses, and malformed
/// bodies. `taskly-core` maps these into its own taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The endpoint parsed, but cannot carry an item path segment
    /// (e.g. `mailto:` or `data:` URLs).
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Remote ──────────────────────────────────────────────────────
    /// The service answered with a non-success status.
    #[error("Remote rejected request (HTTP {status}): {message}")]
    RemoteRejection { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

/// Coarse class of a non-success HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    Informational,
    Redirection,
    ClientError,
    ServerError,
    /// Anything outside 100..=599.
    Unknown,
}

impl StatusCategory {
    pub fn from_status(status: u16) -> Self {
        match status {
            100..=199 => Self::Informational,
            300..=399 => Self::Redirection,
            400..=499 => Self::ClientError,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Informational => "informational",
            Self::Redirection => "redirection",
            Self::ClientError => "client error",
            Self::ServerError => "server error",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

impl Error {
    /// Returns `true` if the service could not be reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if this is a "not found" response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RemoteRejection { status: 404, .. })
    }

    /// The status category of a remote rejection, if this is one.
    pub fn status_category(&self) -> Option<StatusCategory> {
        match self {
            Self::RemoteRejection { status, .. } => Some(StatusCategory::from_status(*status)),
            _ => None,
        }
    }
}
