// ── Per-record edit buffer ──
//
// A detail view's working copy of one task. `seed` is the record as last
// adopted from the snapshot, `draft` is what the user sees and types into.
// While editing, snapshot changes never overwrite the text fields.

use std::sync::Arc;

use tracing::debug;

use crate::consumer::StoreConsumer;
use crate::error::CoreError;
use crate::model::{Task, TaskId, TaskPatch, is_blank};
use crate::stream::TaskStream;

/// What a snapshot change did to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    /// The record is unchanged.
    Unchanged,
    /// Not editing: seed and draft were replaced by the server record.
    Reseeded,
    /// Editing: the record changed, text fields kept. Status and
    /// `updatedAt` were adopted.
    Deferred,
    /// The record is gone. The buffer is closed.
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Nothing differed from the seed; no request was sent.
    Unchanged,
    /// This patch was sent and accepted.
    Saved(TaskPatch),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted,
}

pub struct EditBuffer {
    consumer: StoreConsumer,
    changes: TaskStream,
    id: TaskId,
    seed: Task,
    draft: Task,
    editing: bool,
    closed: bool,
}

impl EditBuffer {
    pub(crate) fn open(consumer: StoreConsumer, id: TaskId) -> Result<Self, CoreError> {
        let changes = consumer.subscribe();
        let seed = changes
            .current()
            .iter()
            .find(|task| task.id == id)
            .map(|task| (**task).clone())
            .ok_or_else(|| CoreError::not_found(&id))?;

        Ok(Self {
            consumer,
            changes,
            id,
            draft: seed.clone(),
            seed,
            editing: false,
            closed: false,
        })
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn seed(&self) -> &Task {
        &self.seed
    }

    pub fn draft(&self) -> &Task {
        &self.draft
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // ── Local edits ──────────────────────────────────────────────────

    pub fn begin_edit(&mut self) -> Result<(), CoreError> {
        self.ensure_open()?;
        self.editing = true;
        Ok(())
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), CoreError> {
        self.begin_edit()?;
        self.draft.title = title.into();
        Ok(())
    }

    /// Set or clear the description. An empty string clears it.
    pub fn set_description(&mut self, description: Option<String>) -> Result<(), CoreError> {
        self.begin_edit()?;
        self.draft.description = description.filter(|d| !d.is_empty());
        Ok(())
    }

    /// Drop local edits, leave editing mode and adopt the latest snapshot.
    pub fn discard(&mut self) -> Reconcile {
        self.draft = self.seed.clone();
        self.editing = false;
        self.resync()
    }

    // ── Snapshot reconciliation ──────────────────────────────────────

    /// Apply a snapshot change if one is pending. Never blocks.
    pub fn sync(&mut self) -> Reconcile {
        match self.changes.try_changed() {
            Some(snapshot) => self.reconcile(&snapshot),
            None if self.closed => Reconcile::Removed,
            None => Reconcile::Unchanged,
        }
    }

    /// Wait for the next snapshot change and apply it. `None` once the
    /// store is gone.
    pub async fn changed(&mut self) -> Option<Reconcile> {
        let snapshot = self.changes.changed().await?;
        Some(self.reconcile(&snapshot))
    }

    fn resync(&mut self) -> Reconcile {
        let snapshot = self.changes.catch_up();
        self.reconcile(&snapshot)
    }

    fn reconcile(&mut self, snapshot: &[Arc<Task>]) -> Reconcile {
        if self.closed {
            return Reconcile::Removed;
        }

        let Some(server) = snapshot.iter().find(|task| task.id == self.id) else {
            debug!(id = %self.id, "record left the snapshot, closing edit buffer");
            self.closed = true;
            self.editing = false;
            return Reconcile::Removed;
        };

        if **server == self.seed && (self.editing || self.draft == self.seed) {
            return Reconcile::Unchanged;
        }

        if !self.editing {
            self.seed = Task::clone(server);
            self.draft = self.seed.clone();
            return Reconcile::Reseeded;
        }

        debug!(id = %self.id, "snapshot changed while editing, keeping draft");
        self.seed.is_completed = server.is_completed;
        self.seed.updated_at = server.updated_at;
        self.draft.is_completed = server.is_completed;
        self.draft.updated_at = server.updated_at;
        Reconcile::Deferred
    }

    // ── Remote operations ────────────────────────────────────────────

    /// Flip the status and commit it on its own, whether or not text
    /// edits are pending. Returns the new status. On failure the draft's
    /// status is reverted.
    pub async fn toggle_status(&mut self) -> Result<bool, CoreError> {
        self.ensure_open()?;
        let target = !self.draft.is_completed;
        self.draft.is_completed = target;

        match self
            .consumer
            .update_record(&self.id, TaskPatch::completed(target))
            .await
        {
            Ok(_) => {
                self.seed.is_completed = target;
                self.resync();
                Ok(target)
            }
            Err(e) => {
                self.draft.is_completed = !target;
                Err(e)
            }
        }
    }

    /// Send the minimal title/description diff between draft and seed.
    ///
    /// A blank title reverts the draft, leaves editing mode and fails
    /// without a request. Leaving editing mode without a request adopts
    /// the latest snapshot. A failed request keeps the draft and editing
    /// mode so the user can retry.
    pub async fn commit(&mut self) -> Result<CommitOutcome, CoreError> {
        self.ensure_open()?;

        if is_blank(&self.draft.title) {
            self.discard();
            return Err(CoreError::blank_title());
        }

        let patch = TaskPatch::diff(&self.seed, &self.draft);
        if patch.is_empty() {
            self.editing = false;
            self.resync();
            return Ok(CommitOutcome::Unchanged);
        }

        self.consumer.update_record(&self.id, patch.clone()).await?;
        self.editing = false;
        self.resync();
        Ok(CommitOutcome::Saved(patch))
    }

    /// Ask `confirm`, then delete the record. On success the buffer is
    /// closed; on failure it stays as it was.
    pub async fn delete<F>(&mut self, confirm: F) -> Result<DeleteOutcome, CoreError>
    where
        F: FnOnce(&Task) -> bool,
    {
        self.ensure_open()?;
        if !confirm(&self.seed) {
            return Ok(DeleteOutcome::Cancelled);
        }

        self.consumer.delete_record(&self.id).await?;
        self.closed = true;
        self.editing = false;
        Ok(DeleteOutcome::Deleted)
    }

    fn ensure_open(&self) -> Result<(), CoreError> {
        if self.closed {
            Err(CoreError::not_found(&self.id))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;
    use taskly_api::{TaskClient, TransportConfig};

    use super::*;
    use crate::store::CollectionStore;

    fn task(id: &str, title: &str) -> Task {
        let now = Utc::now();
        Task {
            id: TaskId::from(id),
            title: title.into(),
            description: Some("B".into()),
            is_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn buffer(seed: Task) -> EditBuffer {
        let client =
            TaskClient::new("http://127.0.0.1:9/api/tasks", &TransportConfig::default()).unwrap();
        let consumer = CollectionStore::new(client).consumer();
        EditBuffer {
            changes: consumer.subscribe(),
            consumer,
            id: seed.id.clone(),
            draft: seed.clone(),
            seed,
            editing: false,
            closed: false,
        }
    }

    fn snapshot(tasks: &[Task]) -> Vec<Arc<Task>> {
        tasks.iter().cloned().map(Arc::new).collect()
    }

    #[test]
    fn identical_record_is_unchanged() {
        let seed = task("t1", "A");
        let mut buf = buffer(seed.clone());
        assert_eq!(buf.reconcile(&snapshot(&[seed])), Reconcile::Unchanged);
    }

    #[test]
    fn idle_buffer_is_reseeded() {
        let mut buf = buffer(task("t1", "A"));
        let server = task("t1", "A from elsewhere");
        assert_eq!(buf.reconcile(&snapshot(&[server.clone()])), Reconcile::Reseeded);
        assert_eq!(buf.seed(), &server);
        assert_eq!(buf.draft(), &server);
    }

    #[test]
    fn editing_buffer_keeps_text_and_adopts_status() {
        let seed = task("t1", "A");
        let mut buf = buffer(seed.clone());
        buf.set_title("A2").unwrap();

        let mut server = task("t1", "A from elsewhere");
        server.is_completed = true;
        server.updated_at = seed.updated_at + Duration::seconds(5);

        assert_eq!(buf.reconcile(&snapshot(&[server.clone()])), Reconcile::Deferred);
        assert_eq!(buf.draft().title, "A2");
        assert_eq!(buf.seed().title, "A");
        assert!(buf.draft().is_completed);
        assert!(buf.seed().is_completed);
        assert_eq!(buf.draft().updated_at, server.updated_at);
        assert!(buf.is_editing());
    }

    #[test]
    fn removed_record_closes_buffer() {
        let mut buf = buffer(task("t1", "A"));
        buf.begin_edit().unwrap();
        assert_eq!(buf.reconcile(&snapshot(&[task("t2", "other")])), Reconcile::Removed);
        assert!(buf.is_closed());
        assert!(!buf.is_editing());
        assert_eq!(
            buf.set_title("x").unwrap_err().kind(),
            crate::error::ErrorKind::NotFound
        );
    }

    #[test]
    fn empty_description_clears() {
        let mut buf = buffer(task("t1", "A"));
        buf.set_description(Some(String::new())).unwrap();
        assert_eq!(buf.draft().description, None);
        assert!(buf.is_editing());
    }
}
