//! gRPC server for the crypto vote API.
//!
//! Serves `crypto.v1.CryptoService` with gzip compression next to the
//! standard gRPC health service, until the shutdown signal fires.

mod crypto_grpc_service;


//-------------------------------------------------------------------------------
// Start RPC Server
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::watch;
use tonic::codec::CompressionEncoding;
use tonic_health::server::health_reporter;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::proto::crypto_service_server::CryptoServiceServer;
use crate::CryptoServer;
use crate::Result;
use crate::ServerConfig;
use crate::SystemError;

/// Runs the gRPC server until `shutdown_signal` changes or its sender is
/// dropped.
pub(crate) async fn start_rpc_server(
    server: Arc<CryptoServer>,
    config: ServerConfig,
    mut shutdown_signal: watch::Receiver<()>,
) -> Result<()> {
    // Create a HealthReporter to manage the health status
    let (mut health_reporter, health_service) = health_reporter();
    health_reporter.set_serving::<CryptoServiceServer<CryptoServer>>().await;

    let listen_address = config.listen_address;
    let mut server_builder = tonic::transport::Server::builder()
        .concurrency_limit_per_connection(config.concurrency_limit)
        .tcp_keepalive(Some(Duration::from_secs(config.tcp_keepalive_in_secs)))
        .http2_keepalive_interval(Some(Duration::from_secs(config.http2_keep_alive_interval_in_secs)))
        .http2_keepalive_timeout(Some(Duration::from_secs(config.http2_keep_alive_timeout_in_secs)))
        .tcp_nodelay(config.tcp_nodelay);

    info!("gRPC server listening on {}", listen_address);
    server.set_ready(true);

    let result = server_builder
        .add_service(health_service)
        .add_service(
            CryptoServiceServer::from_arc(server.clone())
                .accept_compressed(CompressionEncoding::Gzip)
                .send_compressed(CompressionEncoding::Gzip),
        )
        .serve_with_shutdown(
            listen_address,
            shutdown_signal.changed().map(|_s| {
                warn!("Stopping RPC server. {}", listen_address);
            }),
        )
        .await;

    server.set_ready(false);
    if let Err(e) = result {
        error!("error to start rpc server :{:?}.", e);
        return Err(SystemError::ServerStartFailed(e.to_string()).into());
    }
    debug!("rpc service finished!");
    Ok(())
}
