// ── Write-through collection store ──
//
// Owns the canonical snapshot and the loading flag. Every mutation is
// sent to the server first and followed by an unconditional full reload;
// the snapshot is never patched locally.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::time::Duration;

use chrono::{DateTime, Utc};
use taskly_api::{NewTask, TaskClient, TaskUpdate};
use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::Snapshot;
use crate::config::StoreConfig;
use crate::consumer::StoreConsumer;
use crate::error::CoreError;
use crate::model::{Task, TaskId, TaskPatch, is_blank};
use crate::stream::TaskStream;

const REFRESH_ERROR_CHANNEL_SIZE: usize = 16;

/// The canonical, in-memory view of the remote task collection.
///
/// Cheaply cloneable via `Arc<StoreInner>`; clones share one snapshot.
/// Construct one per application (or per test) and pass it to consumers.
///
/// # Ordering
///
/// Each mutation awaits its own reload before returning, so a caller that
/// awaits `update` observes the update in the snapshot. Reloads triggered
/// by mutations that were *not* awaited one after the other are not
/// ordered: the snapshot ends up holding whichever list response arrived
/// last, which is not necessarily the one reflecting the latest mutation.
/// Reloads are deliberately not queued.
///
/// # Completion
///
/// Operations run on spawned tasks. Dropping the returned future stops
/// waiting but never aborts the request or the reload that follows it.
#[derive(Clone)]
pub struct CollectionStore {
    inner: Arc<StoreInner>,
}

pub(super) struct StoreInner {
    pub(super) client: TaskClient,
    pub(super) snapshot: watch::Sender<Snapshot>,
    pub(super) loading: watch::Sender<bool>,
    /// Number of reloads currently running. Only touched while holding the
    /// `loading` channel's lock.
    pub(super) in_flight: AtomicUsize,
    pub(super) last_refresh: watch::Sender<Option<DateTime<Utc>>>,
    pub(super) refresh_errors: broadcast::Sender<Arc<CoreError>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl CollectionStore {
    /// Create an empty store around `client`. Does NOT load -- call
    /// [`refresh()`](Self::refresh) or use [`open()`](Self::open).
    ///
    /// The loading flag starts cleared: no reload is in flight until one
    /// is issued. [`open()`](Self::open) only returns after its initial
    /// reload, so a store obtained from it is never observed in the
    /// "not loaded yet" state.
    pub fn new(client: TaskClient) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (loading, _) = watch::channel(false);
        let (last_refresh, _) = watch::channel(None);
        let (refresh_errors, _) = broadcast::channel(REFRESH_ERROR_CHANNEL_SIZE);

        Self {
            inner: Arc::new(StoreInner {
                client,
                snapshot,
                loading,
                in_flight: AtomicUsize::new(0),
                last_refresh,
                refresh_errors,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Build the HTTP client described by `config` and wrap it.
    pub fn from_config(config: &StoreConfig) -> Result<Self, CoreError> {
        let client = TaskClient::new(config.endpoint.as_str(), &config.transport())?;
        Ok(Self::new(client))
    }

    /// Build, perform the initial load, and start periodic refresh if
    /// `config.refresh_interval_secs` is non-zero.
    ///
    /// A failed initial load is reported like any other refresh failure;
    /// the store is still returned, with an empty snapshot.
    pub async fn open(config: &StoreConfig) -> Result<Self, CoreError> {
        let store = Self::from_config(config)?;
        store.refresh().await;

        if config.refresh_interval_secs > 0 {
            store
                .start_auto_refresh(Duration::from_secs(config.refresh_interval_secs))
                .await;
        }

        info!(endpoint = %config.endpoint, tasks = store.len(), "task store opened");
        Ok(store)
    }

    /// The presentation-facing handle for this store.
    pub fn consumer(&self) -> StoreConsumer {
        StoreConsumer::new(self.clone())
    }

    pub fn client(&self) -> &TaskClient {
        &self.inner.client
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    /// The current snapshot (cheap `Arc` clone), in server order.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.snapshot.borrow().clone()
    }

    /// Look up a task by id in the current snapshot.
    pub fn get(&self, id: &TaskId) -> Option<Arc<Task>> {
        self.inner
            .snapshot
            .borrow()
            .iter()
            .find(|task| &task.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.snapshot.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.snapshot.borrow().is_empty()
    }

    /// `true` while at least one reload is in flight.
    pub fn is_loading(&self) -> bool {
        *self.inner.loading.borrow()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.inner.last_refresh.borrow()
    }

    /// How long ago the last successful reload finished, or `None` if the
    /// snapshot has never been loaded.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_refresh().map(|t| Utc::now() - t)
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Subscribe to snapshot replacements. Dropping the stream unsubscribes.
    pub fn subscribe(&self) -> TaskStream {
        TaskStream::new(self.inner.snapshot.subscribe())
    }

    /// Subscribe to loading-flag changes.
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.inner.loading.subscribe()
    }

    /// Subscribe to reload failures. These are never returned to callers
    /// of `refresh` or of a mutation; this channel is where they surface.
    pub fn subscribe_refresh_errors(&self) -> broadcast::Receiver<Arc<CoreError>> {
        self.inner.refresh_errors.subscribe()
    }

    /// Number of live snapshot subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.snapshot.receiver_count()
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Reload the full collection and replace the snapshot.
    ///
    /// Never fails: on error the snapshot is left as is, the loading flag
    /// is cleared, and the failure is logged and broadcast.
    pub async fn refresh(&self) {
        let inner = Arc::clone(&self.inner);
        if let Err(e) = tokio::spawn(async move { inner.reload().await }).await {
            warn!(error = %e, "refresh task did not complete");
        }
    }

    /// Create a task, then reload.
    ///
    /// A blank title fails with [`CoreError::Validation`] before any
    /// request is sent.
    pub async fn create(&self, title: &str, description: Option<&str>) -> Result<Task, CoreError> {
        if is_blank(title) {
            return Err(CoreError::blank_title());
        }

        let body = NewTask {
            title: title.to_owned(),
            description: description.map(str::to_owned),
        };

        self.write_through("create", move |inner| async move {
            let record = inner.client.create(&body).await?;
            Ok(Task::from(record))
        })
        .await
    }

    /// Send a partial update, then reload.
    ///
    /// An empty patch sends nothing and returns `Ok(None)`. A patch with a
    /// blank title fails validation before any request.
    pub async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<Option<Task>, CoreError> {
        if patch.is_empty() {
            debug!(%id, "empty patch, nothing to send");
            return Ok(None);
        }
        patch.validate()?;

        let id = id.clone();
        let update = TaskUpdate::from(patch);

        self.write_through("update", move |inner| async move {
            let record = inner.client.update(id.as_str(), &update).await?;
            Ok(Some(Task::from(record)))
        })
        .await
    }

    /// Delete a task, then reload.
    pub async fn delete(&self, id: &TaskId) -> Result<(), CoreError> {
        let id = id.clone();

        self.write_through("delete", move |inner| async move {
            inner.client.delete(id.as_str()).await?;
            Ok(())
        })
        .await
    }

    /// Run `mutation`, and on success reload before resolving.
    ///
    /// A failed mutation returns its error and skips the reload, leaving
    /// the snapshot untouched.
    async fn write_through<T, F, Fut>(&self, op: &'static str, mutation: F) -> Result<T, CoreError>
    where
        F: FnOnce(Arc<StoreInner>) -> Fut,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let pending = mutation(Arc::clone(&inner));

        let handle = tokio::spawn(async move {
            let value = pending.await?;
            debug!(op, "mutation accepted, reloading");
            inner.reload().await;
            Ok(value)
        });

        handle
            .await
            .map_err(|e| CoreError::Internal(format!("{op} task did not complete: {e}")))?
    }

    // ── Background refresh ───────────────────────────────────────────

    /// Reload every `interval` until [`shutdown()`](Self::shutdown).
    pub async fn start_auto_refresh(&self, interval: Duration) {
        let inner = Arc::clone(&self.inner);
        let cancel = self.inner.cancel.clone();
        debug!(?interval, "starting periodic refresh");
        self.inner
            .task_handles
            .lock()
            .await
            .push(tokio::spawn(refresh_task(inner, interval, cancel)));
    }

    /// Stop background tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("task store shut down");
    }
}

/// Periodically reload the collection.
async fn refresh_task(inner: Arc<StoreInner>, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => inner.reload().await,
        }
    }
}
