// taskly-core: Write-through task store between taskly-api and consumers.
//!
//! The [`CollectionStore`] holds the canonical snapshot of the remote task
//! collection. Every mutation goes to the server first and is followed by a
//! full reload; the snapshot is never patched locally. Presentation code
//! talks to it through a [`StoreConsumer`] and edits single records through
//! an [`EditBuffer`].

pub mod config;
pub mod consumer;
pub mod convert;
pub mod edit;
pub mod error;
pub mod model;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_ENDPOINT, StoreConfig, TlsVerification};
pub use consumer::StoreConsumer;
pub use edit::{CommitOutcome, DeleteOutcome, EditBuffer, Reconcile};
pub use error::{CoreError, ErrorKind};
pub use model::{Task, TaskId, TaskPatch};
pub use store::{CollectionStore, Snapshot};
pub use stream::{TaskStream, TaskWatchStream};
