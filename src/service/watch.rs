//! Watch stream handler.
//!
//! ```text
//! UpdateNotifier -> Subscription -> WatchStreamHandler -> gRPC stream
//! ```
//!
//! The handler is Listening until it reaches one of its terminal states,
//! reported by [`WatchEnd`]. Every blocking point (next change event,
//! outbound send) also races the caller's cancellation token and the
//! consumer's disconnect, so a watcher never outlives its stream.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tonic::Status;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::trace;
use tracing::warn;

use super::CryptoCatalog;
use crate::proto;
use crate::validate_id;
use crate::CryptoId;
use crate::Result;
use crate::Subscription;

pub type WatchResponseSender = mpsc::Sender<std::result::Result<proto::CryptoCurrency, Status>>;

/// Terminal state of a watch stream
#[derive(Debug, Clone)]
pub enum WatchEnd {
    /// The consumer went away
    Disconnected,
    /// The server is shutting down or the call was cancelled
    Cancelled,
    /// The notifier stopped delivering events
    NotifierClosed,
    /// Re-reading the record failed; the status was forwarded to the consumer
    Failed(Status),
}

impl WatchEnd {
    pub fn is_graceful(&self) -> bool {
        !matches!(self, WatchEnd::Failed(_))
    }
}

pub struct WatchStreamHandler {
    id: CryptoId,
    subscription: Subscription,
    catalog: CryptoCatalog,
    cancel: CancellationToken,
}

impl std::fmt::Debug for WatchStreamHandler {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("WatchStreamHandler")
            .field("id", &self.id)
            .field("subscriber_id", &self.subscription.id())
            .finish_non_exhaustive()
    }
}

impl CryptoCatalog {
    /// Validates `id` and registers the subscription before returning, so
    /// every change published after this call reaches the handler.
    pub fn watch(
        &self,
        id: &str,
        cancel: CancellationToken,
    ) -> Result<WatchStreamHandler> {
        let id = validate_id(id).inspect_err(|e| error!("Params to watch crypto is invalid: {}", e))?;
        Ok(WatchStreamHandler::new(id, self.notifier.subscribe(), self.clone(), cancel))
    }
}

impl WatchStreamHandler {
    pub fn new(
        id: CryptoId,
        subscription: Subscription,
        catalog: CryptoCatalog,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            subscription,
            catalog,
            cancel,
        }
    }

    pub fn id(&self) -> CryptoId {
        self.id
    }

    /// Forwards snapshots of the watched record until a terminal state.
    /// The subscription is released when this returns.
    pub async fn run(
        mut self,
        response_sender: WatchResponseSender,
    ) -> WatchEnd {
        let id = self.id;
        info!(%id, subscriber_id = self.subscription.id(), "Watch stream started");

        let end = self.forward(&response_sender).await;
        match &end {
            WatchEnd::Failed(status) => error!(%id, "Watch stream closed with error: {}", status.message()),
            WatchEnd::Disconnected => warn!(%id, "Watch stream client disconnected"),
            other => info!(%id, "Watch stream ended: {:?}", other),
        }
        end
    }

    async fn forward(
        &mut self,
        response_sender: &WatchResponseSender,
    ) -> WatchEnd {
        loop {
            let changed = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return WatchEnd::Cancelled,
                _ = response_sender.closed() => return WatchEnd::Disconnected,
                next = self.subscription.recv() => next,
            };

            let Some(changed) = changed else {
                return WatchEnd::NotifierClosed;
            };
            if changed != self.id {
                trace!(watched = %self.id, %changed, "ignoring change event");
                continue;
            }

            let item = match self.catalog.fetch(self.id).await {
                Ok(record) => Ok(record.to_proto()),
                Err(e) => Err(Status::from(e)),
            };
            let failure = item.as_ref().err().cloned();

            let sent = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return WatchEnd::Cancelled,
                sent = response_sender.send(item) => sent,
            };
            if sent.is_err() {
                return WatchEnd::Disconnected;
            }
            if let Some(status) = failure {
                return WatchEnd::Failed(status);
            }
            debug!(id = %self.id, "Watch snapshot sent");
        }
    }
}
