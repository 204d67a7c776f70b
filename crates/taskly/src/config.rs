//! CLI configuration -- thin wrapper around `taskly_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--endpoint, --insecure, --timeout).

use taskly_core::StoreConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use taskly_config::{Config, Profile, config_path, load_config};

/// Everything a service-bound command needs from configuration.
#[derive(Debug)]
pub struct Resolved {
    pub profile_name: String,
    pub store: StoreConfig,
}

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile and apply flag overrides.
///
/// CLI flags take priority over profile values, which take priority over
/// `[defaults]`.
pub fn resolve(global: &GlobalOpts, config: &Config) -> Result<(String, Profile), CliError> {
    let (name, mut profile) = config.resolve_profile(global.profile.as_deref())?;

    if let Some(ref endpoint) = global.endpoint {
        profile.endpoint.clone_from(endpoint);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }

    Ok((name, profile))
}

/// Load the config file and build a `StoreConfig` for the active profile.
pub fn build_store_config(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let config = load_config()?;
    let (profile_name, profile) = resolve(global, &config)?;
    let store = taskly_config::profile_to_store_config(&profile, &config.defaults)?;

    Ok(Resolved {
        profile_name,
        store,
    })
}
