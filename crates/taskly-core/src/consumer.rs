// ── Presentation-facing store handle ──
//
// What list, add and detail views are allowed to do with the store:
// read the snapshot, watch it, and request mutations. Consumers never
// touch the snapshot directly.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use crate::edit::EditBuffer;
use crate::error::CoreError;
use crate::model::{Task, TaskId, TaskPatch};
use crate::store::{CollectionStore, Snapshot};
use crate::stream::TaskStream;

#[derive(Clone)]
pub struct StoreConsumer {
    store: CollectionStore,
}

impl StoreConsumer {
    pub(crate) fn new(store: CollectionStore) -> Self {
        Self { store }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    pub fn record(&self, id: &TaskId) -> Option<Arc<Task>> {
        self.store.get(id)
    }

    pub fn subscribe(&self) -> TaskStream {
        self.store.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.store.subscribe_loading()
    }

    pub fn subscribe_refresh_errors(&self) -> broadcast::Receiver<Arc<CoreError>> {
        self.store.subscribe_refresh_errors()
    }

    /// Manual pull-to-refresh. Failures surface on the error channel.
    pub async fn refresh(&self) {
        self.store.refresh().await;
    }

    pub async fn add_record(&self, title: &str, description: Option<&str>) -> Result<Task, CoreError> {
        self.store.create(title, description).await
    }

    pub async fn update_record(&self, id: &TaskId, patch: TaskPatch) -> Result<Option<Task>, CoreError> {
        self.store.update(id, patch).await
    }

    pub async fn delete_record(&self, id: &TaskId) -> Result<(), CoreError> {
        self.store.delete(id).await
    }

    /// Open an edit buffer over the record with `id`.
    ///
    /// Fails with [`CoreError::NotFound`] if the current snapshot does not
    /// hold that record.
    pub fn edit(&self, id: &TaskId) -> Result<EditBuffer, CoreError> {
        EditBuffer::open(self.clone(), id.clone())
    }
}
