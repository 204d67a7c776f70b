//! Shared helpers for command handlers.

use std::io::IsTerminal;

use taskly_core::StoreConsumer;

use crate::error::CliError;

/// Reload the collection, surfacing a failed reload as an error.
///
/// The store itself never returns reload failures; they arrive on the
/// refresh error channel, which is drained here.
pub async fn load(consumer: &StoreConsumer) -> Result<(), CliError> {
    let mut errors = consumer.subscribe_refresh_errors();
    consumer.refresh().await;
    match errors.try_recv() {
        Ok(err) => Err(CliError::from(err.as_ref())),
        Err(_) => Ok(()),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Trim `text`, mapping an empty result to `None`.
pub fn trimmed(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}
