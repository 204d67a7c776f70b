// ── Canonical task store ──
//
// Write-through collection store with push-based change notification.

mod collection_store;
mod refresh;

use std::sync::Arc;

use crate::model::Task;

pub use collection_store::CollectionStore;

/// One immutable copy of the collection, in server order.
pub type Snapshot = Arc<Vec<Arc<Task>>>;
