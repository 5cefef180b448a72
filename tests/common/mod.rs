use std::net::SocketAddr;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use crypto_vote::proto::crypto_service_client::CryptoServiceClient;
use crypto_vote::CacheBackend;
use crypto_vote::CryptoServer;
use crypto_vote::ServerBuilder;
use crypto_vote::Settings;
use crypto_vote::StorageBackend;
use tokio::sync::watch;
use tokio::time;
use tonic::transport::Channel;
use tracing::debug;

pub const WAIT_FOR_SERVER_READY_IN_SEC: u64 = 5;

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
    println!("setup logger for integration test.");
}

pub struct TestContext {
    pub server: Arc<CryptoServer>,
    pub client: CryptoServiceClient<Channel>,
    graceful_tx: watch::Sender<()>,
}

impl TestContext {
    /// Signals shutdown and waits for the server to finish serving
    pub async fn shutdown(self) {
        let _ = self.graceful_tx.send(());
        time::timeout(Duration::from_secs(WAIT_FOR_SERVER_READY_IN_SEC), self.server.run())
            .await
            .expect("server stops after shutdown signal")
            .expect("server stops cleanly");
    }
}

/// Reserves a free local port. The listener is closed before returning.
fn free_local_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr")
}

fn memory_settings(listen_address: SocketAddr) -> Settings {
    let mut settings = Settings::default();
    settings.server.listen_address = listen_address;
    settings.storage.backend = StorageBackend::Memory;
    settings.cache.backend = CacheBackend::Memory;
    settings.seed.enabled = false;
    settings
}

/// Boots a server with in-memory backends and returns a connected client
pub async fn start_test_server() -> TestContext {
    let listen_address = free_local_addr();
    let (graceful_tx, graceful_rx) = watch::channel(());

    let server = ServerBuilder::new(memory_settings(listen_address), graceful_rx)
        .build()
        .await
        .expect("build server")
        .start_rpc_server()
        .await
        .ready()
        .expect("server ready");

    let client = connect(listen_address).await;
    TestContext {
        server,
        client,
        graceful_tx,
    }
}

async fn connect(addr: SocketAddr) -> CryptoServiceClient<Channel> {
    let endpoint = format!("http://{}", addr);
    let deadline = time::Instant::now() + Duration::from_secs(WAIT_FOR_SERVER_READY_IN_SEC);
    loop {
        match CryptoServiceClient::connect(endpoint.clone()).await {
            Ok(client) => return client,
            Err(e) if time::Instant::now() < deadline => {
                debug!("server not ready yet: {}", e);
                time::sleep(Duration::from_millis(50)).await;
            }
            Err(e) => panic!("could not connect to {}: {}", endpoint, e),
        }
    }
}
