// ── Full reload logic ──
//
// Fetches the whole collection and swaps it in as the new snapshot.
// Failures never escape: they are logged and broadcast.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use chrono::Utc;
use taskly_api::TaskRecord;
use tracing::{debug, warn};

use super::collection_store::StoreInner;
use crate::error::CoreError;
use crate::model::Task;

impl StoreInner {
    /// List, validate, replace. The loading flag stays set while any
    /// reload is running.
    pub(super) async fn reload(&self) {
        self.begin_loading();

        match self.fetch_snapshot().await {
            Ok(tasks) => {
                let count = tasks.len();
                self.snapshot.send_replace(Arc::new(tasks));
                self.last_refresh.send_replace(Some(Utc::now()));
                debug!(tasks = count, "snapshot replaced");
            }
            Err(e) => self.report_refresh_failure(e),
        }

        self.end_loading();
    }

    async fn fetch_snapshot(&self) -> Result<Vec<Arc<Task>>, CoreError> {
        let records = self.client.list().await?;
        build_snapshot(records)
    }

    fn report_refresh_failure(&self, err: CoreError) {
        warn!(error = %err, "refresh failed, keeping previous snapshot");
        // No subscribers is fine; the log line above is the fallback.
        let _ = self.refresh_errors.send(Arc::new(err));
    }

    fn begin_loading(&self) {
        self.loading.send_if_modified(|loading| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            !std::mem::replace(loading, true)
        });
    }

    fn end_loading(&self) {
        self.loading.send_if_modified(|loading| {
            let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
            if remaining == 0 && *loading {
                *loading = false;
                true
            } else {
                false
            }
        });
    }
}

/// Convert a list response into a snapshot, in server order.
///
/// A response that repeats an id is rejected as a whole rather than
/// deduplicated, so the snapshot stays an exact copy of what the server
/// sent.
pub(super) fn build_snapshot(records: Vec<TaskRecord>) -> Result<Vec<Arc<Task>>, CoreError> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .map(|record| {
            if !seen.insert(record.id.clone()) {
                return Err(CoreError::DuplicateId { id: record.id });
            }
            Ok(Arc::new(Task::from(record)))
        })
        .collect()
}
