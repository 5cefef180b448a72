//! Update notifier: process-wide fan-out of change events.
//!
//! Every subscriber owns a bounded queue registered in a `DashMap`. `publish`
//! walks the registry and `try_send`s the changed identifier into every
//! queue, so each live watcher sees each event and the publisher never
//! waits. Filtering by identifier happens on the watcher side.
//!
//! ```text
//! vote/edit/delete -> publish(id) -> try_send(queue_1..queue_n)
//!                                          |
//!                          Subscription::recv() in each watcher
//! ```
//!
//! A full queue drops the event for that subscriber only and bumps
//! `dropped_change_events`. Dropping a [`Subscription`] unregisters it.

#[cfg(test)]
mod notify_test;

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::CryptoId;
use crate::WatchConfig;
use crate::ACTIVE_WATCHERS;
use crate::DROPPED_CHANGE_EVENTS;

#[derive(Debug)]
struct NotifierInner {
    subscribers: DashMap<u64, mpsc::Sender<CryptoId>>,
    next_id: AtomicU64,
    buffer_size: usize,
}

impl NotifierInner {
    fn unregister(
        &self,
        subscriber_id: u64,
    ) {
        if self.subscribers.remove(&subscriber_id).is_some() {
            ACTIVE_WATCHERS.dec();
            trace!(subscriber_id, "subscriber unregistered");
        }
    }
}

/// Cheap to clone; all clones share one registry
#[derive(Debug, Clone)]
pub struct UpdateNotifier {
    inner: Arc<NotifierInner>,
}

impl UpdateNotifier {
    pub fn new(config: &WatchConfig) -> Self {
        Self {
            inner: Arc::new(NotifierInner {
                subscribers: DashMap::new(),
                next_id: AtomicU64::new(1),
                buffer_size: config.watcher_buffer_size.max(1),
            }),
        }
    }

    /// Registers a new subscriber. Events published after this call returns
    /// are delivered to it.
    pub fn subscribe(&self) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.inner.buffer_size);
        self.inner.subscribers.insert(id, tx);
        ACTIVE_WATCHERS.inc();
        debug!(subscriber_id = id, "subscriber registered");

        Subscription {
            id,
            receiver: rx,
            inner: self.inner.clone(),
        }
    }

    /// Fans `id` out to every registered subscriber without waiting.
    ///
    /// Returns the number of subscribers the event was queued for.
    pub fn publish(
        &self,
        id: CryptoId,
    ) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();

        for entry in self.inner.subscribers.iter() {
            match entry.value().try_send(id) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    DROPPED_CHANGE_EVENTS.inc();
                    warn!(subscriber_id = *entry.key(), %id, "watcher queue full, change event dropped");
                }
                Err(TrySendError::Closed(_)) => closed.push(*entry.key()),
            }
        }

        // Removal must happen after the iterator releases its shard locks.
        for subscriber_id in closed {
            self.inner.unregister(subscriber_id);
        }

        trace!(%id, delivered, "change event published");
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }
}

/// A registered subscriber slot. Unregisters itself on drop.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    receiver: mpsc::Receiver<CryptoId>,
    inner: Arc<NotifierInner>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Next changed identifier. `None` once the notifier side is gone.
    pub async fn recv(&mut self) -> Option<CryptoId> {
        self.receiver.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.inner.unregister(self.id);
    }
}
