// ── Reactive snapshot streams ──
//
// Subscription types for consuming snapshot changes from the
// CollectionStore. Dropping a stream unsubscribes.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::Snapshot;

/// A subscription to the task snapshot.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via the `changed()` method or by converting to a `Stream`.
pub struct TaskStream {
    current: Snapshot,
    receiver: watch::Receiver<Snapshot>,
}

impl TaskStream {
    pub(crate) fn new(receiver: watch::Receiver<Snapshot>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot this stream last delivered (or saw at creation).
    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` if the store has been dropped.
    pub async fn changed(&mut self) -> Option<Snapshot> {
        self.receiver.changed().await.ok()?;
        Some(self.catch_up())
    }

    /// Non-blocking: the new snapshot if one arrived since the last
    /// delivery, otherwise `None`.
    pub fn try_changed(&mut self) -> Option<Snapshot> {
        match self.receiver.has_changed() {
            Ok(true) => Some(self.catch_up()),
            _ => None,
        }
    }

    /// Mark the latest snapshot as seen and make it `current`.
    pub(crate) fn catch_up(&mut self) -> Snapshot {
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        snap
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> TaskWatchStream {
        TaskWatchStream {
            inner: WatchStream::from_changes(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields the new snapshot each time the store replaces it. The snapshot
/// current at conversion time is not re-emitted.
pub struct TaskWatchStream {
    inner: WatchStream<Snapshot>,
}

impl Stream for TaskWatchStream {
    type Item = Snapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use futures_util::StreamExt;

    use super::*;

    #[tokio::test]
    async fn changed_delivers_replacement() {
        let (tx, rx) = watch::channel::<Snapshot>(Arc::new(Vec::new()));
        let mut stream = TaskStream::new(rx);
        assert!(stream.try_changed().is_none());

        tx.send_replace(Arc::new(Vec::new()));
        assert!(stream.try_changed().is_some());
        assert!(stream.try_changed().is_none());

        tx.send_replace(Arc::new(Vec::new()));
        assert!(stream.changed().await.is_some());
    }

    #[tokio::test]
    async fn changed_returns_none_when_store_dropped() {
        let (tx, rx) = watch::channel::<Snapshot>(Arc::new(Vec::new()));
        let mut stream = TaskStream::new(rx);
        drop(tx);
        assert!(stream.changed().await.is_none());
    }

    #[tokio::test]
    async fn into_stream_yields_changes_only() {
        let (tx, rx) = watch::channel::<Snapshot>(Arc::new(Vec::new()));
        let mut stream = TaskStream::new(rx).into_stream();

        let first = Arc::new(Vec::new());
        tx.send_replace(first.clone());
        let next = stream.next().await.unwrap();
        assert!(Arc::ptr_eq(&next, &first));
    }

    #[test]
    fn dropping_stream_unsubscribes() {
        let (tx, rx) = watch::channel::<Snapshot>(Arc::new(Vec::new()));
        let stream = TaskStream::new(rx);
        assert_eq!(tx.receiver_count(), 1);
        drop(stream);
        assert_eq!(tx.receiver_count(), 0);
    }
}
