//! Command dispatch: bridges CLI args -> store operations -> output formatting.

pub mod config_cmd;
pub mod tasks;
pub mod util;

use taskly_core::CollectionStore;

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    store: &CollectionStore,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let consumer = store.consumer();
    match cmd {
        Command::List(args) => tasks::list(store, &consumer, args, resolved, global).await,
        Command::Show { id } => tasks::show(&consumer, &id, global).await,
        Command::Add { title, description } => {
            tasks::add(&consumer, &title, description.as_deref(), global).await
        }
        Command::Edit(args) => tasks::edit(&consumer, args, global).await,
        Command::Toggle { id } => tasks::toggle(&consumer, &id, global).await,
        Command::Delete { id } => tasks::delete(&consumer, &id, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal {
            message: "command does not use the task service".into(),
        }),
    }
}
