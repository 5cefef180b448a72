//! The running service instance shared by the gRPC layer.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::CryptoCatalog;
use crate::Result;
use crate::Settings;
use crate::SystemError;

pub(crate) type RpcTask = JoinHandle<Result<()>>;

pub struct CryptoServer {
    catalog: CryptoCatalog,
    /// Parent of every watcher's token; cancelled on shutdown
    cancel: CancellationToken,
    ready: AtomicBool,
    settings: Arc<Settings>,
    rpc_task: Mutex<Option<RpcTask>>,
}

impl std::fmt::Debug for CryptoServer {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("CryptoServer")
            .field("ready", &self.server_is_ready())
            .field("listen_address", &self.settings.server.listen_address)
            .finish_non_exhaustive()
    }
}

impl CryptoServer {
    pub fn new(
        catalog: CryptoCatalog,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            catalog,
            cancel: CancellationToken::new(),
            ready: AtomicBool::new(false),
            settings,
            rpc_task: Mutex::new(None),
        }
    }

    pub fn catalog(&self) -> &CryptoCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Token for one watch stream, cancelled together with the server
    pub fn watcher_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    /// Ends every open watch stream
    pub fn shutdown_watchers(&self) {
        if !self.cancel.is_cancelled() {
            info!(
                active = self.catalog.notifier().subscriber_count(),
                "cancelling watch streams"
            );
            self.cancel.cancel();
        }
    }

    pub(crate) fn attach_rpc_task(
        &self,
        task: RpcTask,
    ) -> Result<()> {
        let mut slot = self.rpc_task.lock().map_err(|_| rpc_task_poisoned())?;
        if slot.is_some() {
            return Err(SystemError::ServerStartFailed("RPC server already started".to_string()).into());
        }
        *slot = Some(task);
        Ok(())
    }

    /// Waits until the gRPC server stops, either after the shutdown signal
    /// or because serving failed (e.g. the listen address is taken).
    /// Can be awaited once.
    pub async fn run(&self) -> Result<()> {
        let task = self.rpc_task.lock().map_err(|_| rpc_task_poisoned())?.take();
        match task {
            Some(task) => task.await?,
            None => Err(SystemError::ServerStartFailed("RPC server not started".to_string()).into()),
        }
    }

    pub fn set_ready(
        &self,
        is_ready: bool,
    ) {
        self.ready.store(is_ready, Ordering::SeqCst);
    }

    pub fn server_is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

fn rpc_task_poisoned() -> crate::Error {
    SystemError::ServerStartFailed("RPC task lock poisoned".to_string()).into()
}
