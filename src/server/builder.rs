//! A builder for assembling a [`CryptoServer`].
//!
//! ## Lifecycle
//! - `build()`: opens the store and the cache selected by [`Settings`] unless overridden, wires the
//!   catalog and links the shutdown signal to watcher cancellation.
//! - `seed_store()`: optional initial data import.
//! - `start_metrics_server()`/`start_rpc_server()`: launch the auxiliary and the main server.
//! - `ready()`: returns the assembled [`CryptoServer`]; its `run()` waits for the gRPC server.
//!
//! ## Example
//! ```ignore
//! let (shutdown_tx, shutdown_rx) = watch::channel(());
//! let server = ServerBuilder::new(settings, shutdown_rx)
//!     .store(Arc::new(MemCryptoStore::new())) // Optional override
//!     .build()
//!     .await?
//!     .seed_store()
//!     .await
//!     .start_metrics_server(shutdown_tx.subscribe())
//!     .start_rpc_server()
//!     .await
//!     .ready()?;
//! ```

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::grpc;
use crate::import_initial;
use crate::metrics;
use crate::CacheBackend;
use crate::CacheLayer;
use crate::CryptoCatalog;
use crate::CryptoServer;
use crate::CryptoStore;
use crate::MemCache;
use crate::MemCryptoStore;
use crate::RedisCache;
use crate::Result;
use crate::Settings;
use crate::SledCryptoStore;
use crate::StorageBackend;
use crate::SystemError;
use crate::UpdateNotifier;

pub struct ServerBuilder {
    pub(super) settings: Settings,
    pub(super) store: Option<Arc<dyn CryptoStore>>,
    pub(super) cache: Option<CacheLayer>,
    pub(super) shutdown_signal: watch::Receiver<()>,

    pub(super) server: Option<Arc<CryptoServer>>,
}

impl ServerBuilder {
    pub fn new(
        settings: Settings,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        Self {
            settings,
            store: None,
            cache: None,
            shutdown_signal,
            server: None,
        }
    }

    /// Sets a custom store, skipping the configured backend
    pub fn store(
        mut self,
        store: Arc<dyn CryptoStore>,
    ) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets a custom cache layer, skipping the configured backend
    pub fn cache(
        mut self,
        cache: CacheLayer,
    ) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Assembles the server. Fails only if the store cannot be opened; an
    /// unreachable cache disables caching instead.
    pub async fn build(mut self) -> Result<Self> {
        let store = match self.store.take() {
            Some(store) => store,
            None => open_store(&self.settings)?,
        };
        let cache = match self.cache.take() {
            Some(cache) => cache,
            None => open_cache(&self.settings).await,
        };
        let notifier = UpdateNotifier::new(&self.settings.watch);

        let catalog = CryptoCatalog::new(store, cache, notifier);
        let server = Arc::new(CryptoServer::new(catalog, Arc::new(self.settings.clone())));
        self.link_shutdown(server.clone());

        self.server = Some(server);
        Ok(self)
    }

    /// Imports the seed file when enabled. A failed import is logged and
    /// the server starts with whatever the store holds.
    pub async fn seed_store(self) -> Self {
        let Some(ref server) = self.server else {
            error!("seed_store called before build");
            return self;
        };
        if !self.settings.seed.enabled {
            debug!("initial import disabled");
            return self;
        }
        match import_initial(server.catalog().store().as_ref(), &self.settings.seed.path).await {
            Ok(imported) => info!("{} cryptos imported", imported),
            Err(e) => error!("initial import from {} failed: {}", self.settings.seed.path.display(), e),
        }
        self
    }

    /// Cancels every watch stream once the shutdown signal fires
    fn link_shutdown(
        &self,
        server: Arc<CryptoServer>,
    ) {
        let mut shutdown_signal = self.shutdown_signal.clone();
        tokio::spawn(async move {
            let _ = shutdown_signal.changed().await;
            server.shutdown_watchers();
        });
    }

    /// Launches the Prometheus endpoint when monitoring is enabled
    pub fn start_metrics_server(
        self,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        if !self.settings.monitoring.prometheus_enabled {
            debug!("metrics server disabled");
            return self;
        }
        let port = self.settings.monitoring.prometheus_port;
        info!("start metric server on port {}", port);
        tokio::spawn(async move {
            metrics::start_server(port, shutdown_signal).await;
        });
        self
    }

    /// Spawns the gRPC server. The task is handed to the [`CryptoServer`],
    /// whose `run()` reports how serving ended.
    pub async fn start_rpc_server(self) -> Self {
        debug!("--- start RPC server --- ");
        match self.server {
            Some(ref server) => {
                let config = self.settings.server.clone();
                let shutdown = self.shutdown_signal.clone();
                let task = tokio::spawn(grpc::start_rpc_server(server.clone(), config, shutdown));
                if let Err(e) = server.attach_rpc_task(task) {
                    error!("RPC server task not tracked: {:?}", e);
                }
            }
            None => error!("start_rpc_server called before build"),
        }
        self
    }

    pub fn ready(self) -> Result<Arc<CryptoServer>> {
        self.server
            .ok_or_else(|| SystemError::ServerStartFailed("check server ready failed".to_string()).into())
    }
}

fn open_store(settings: &Settings) -> Result<Arc<dyn CryptoStore>> {
    match settings.storage.backend {
        StorageBackend::Sled => {
            info!("opening sled store at {}", settings.storage.db_path.display());
            Ok(Arc::new(SledCryptoStore::open(&settings.storage.db_path)?))
        }
        StorageBackend::Memory => {
            warn!("using in-memory store, data is lost on exit");
            Ok(Arc::new(MemCryptoStore::new()))
        }
    }
}

async fn open_cache(settings: &Settings) -> CacheLayer {
    let config = &settings.cache;
    if !config.enabled {
        info!("cache disabled");
        return CacheLayer::disabled();
    }
    match config.backend {
        CacheBackend::Memory => CacheLayer::new(Arc::new(MemCache::new()), config.list_prefix.clone()),
        CacheBackend::Redis => match RedisCache::connect(&config.redis_url).await {
            Ok(redis) => {
                info!("connected to redis cache at {}", config.redis_url);
                CacheLayer::new(Arc::new(redis), config.list_prefix.clone())
            }
            Err(e) => {
                warn!("redis cache unavailable, continuing without cache: {}", e);
                CacheLayer::disabled()
            }
        },
    }
}
