// ── Runtime store configuration ──
//
// Describes *where* the task collection lives and how to reach it.
// Never touches disk: `taskly-config` or the CLI builds a `StoreConfig`
// and hands it in.

use std::time::Duration;

use url::Url;

/// Endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://10.0.2.2:3000/api/tasks";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed development servers).
    DangerAcceptInvalid,
}

/// Configuration for one task collection.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Collection URL (`GET`/`POST` target; items live under it).
    pub endpoint: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout. `None` lets requests run to completion.
    pub timeout: Option<Duration>,
    /// Background refresh period in seconds. 0 = never.
    pub refresh_interval_secs: u64,
}

impl StoreConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            tls: TlsVerification::default(),
            timeout: None,
            refresh_interval_secs: 0,
        }
    }

    pub(crate) fn transport(&self) -> taskly_api::TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => taskly_api::TlsMode::System,
            TlsVerification::CustomCa(path) => taskly_api::TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => taskly_api::TlsMode::DangerAcceptInvalid,
        };
        taskly_api::TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        // The constant is a valid absolute URL; parsing cannot fail.
        #[allow(clippy::expect_used)]
        let endpoint = Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL");
        Self::new(endpoint)
    }
}
