use std::path::Path;

use crypto_vote::file_io::open_file_for_append;
use crypto_vote::Error;
use crypto_vote::NetworkError;
use crypto_vote::Result;
use crypto_vote::ServerBuilder;
use crypto_vote::Settings;
use crypto_vote::SystemError;
use tokio::signal::unix::signal;
use tokio::signal::unix::SignalKind;
use tokio::sync::watch;
use tracing::error;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let settings = Settings::load(None)?;

    // Initializing Logs
    let _guard = init_observability(&settings.server.log_dir)?;

    // Initializing Shutdown Signal
    let (graceful_tx, graceful_rx) = watch::channel(());

    let server = ServerBuilder::new(settings, graceful_rx.clone())
        .build()
        .await?
        .seed_store()
        .await
        .start_metrics_server(graceful_rx.clone())
        .start_rpc_server()
        .await
        .ready()?;

    info!("Application started. Waiting for CTRL+C signal...");
    let rpc = server.run();
    tokio::pin!(rpc);

    tokio::select! {
        result = &mut rpc => {
            error!("RPC server stopped before shutdown: {:?}", result);
            server.shutdown_watchers();
            return match result {
                Ok(()) => Err(SystemError::ServerStartFailed("RPC server exited unexpectedly".to_string()).into()),
                Err(e) => Err(e),
            };
        }
        result = graceful_shutdown(graceful_tx) => {
            if let Err(e) = result {
                error!("Failed to shutdown: {:?}", e);
                server.shutdown_watchers();
                return Err(e);
            }
        }
    }
    server.shutdown_watchers();

    // drain in-flight RPCs
    rpc.await?;

    println!("Exiting program.");
    Ok(())
}

async fn graceful_shutdown(graceful_tx: watch::Sender<()>) -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt()).map_err(signal_error)?;
    let mut sigterm = signal(SignalKind::terminate()).map_err(signal_error)?;
    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT detected.");
        },
        _ = sigterm.recv() => {
            info!("SIGTERM detected.");
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl+C detected.");
        },
    }

    info!("Shutdown server..");
    graceful_tx.send(()).map_err(|e| {
        error!("Failed to send shutdown signal: {}", e);
        Error::from(NetworkError::SignalSendFailed(format!(
            "Failed to send shutdown signal: {}",
            e
        )))
    })?;

    info!("Shutdown completed");
    Ok(())
}

fn signal_error(e: std::io::Error) -> Error {
    Error::Fatal(format!("failed to install signal handler: {}", e))
}

pub fn init_observability(log_dir: &Path) -> Result<WorkerGuard> {
    let log_file = open_file_for_append(log_dir.join("crypto-vote.log"))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);
    let base_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::from_default_env());
    tracing_subscriber::registry().with(base_subscriber).init();

    Ok(guard)
}
