use autometrics::prometheus_exporter;
use lazy_static::lazy_static;
use prometheus::IntCounter;
use prometheus::IntCounterVec;
use prometheus::IntGauge;
use prometheus::Opts;
use prometheus::Registry;
use tokio::sync::watch;
use tracing::error;
use tracing::info;
use warp::Filter;
use warp::Rejection;
use warp::Reply;


lazy_static! {
    /// Vote attempts by direction (`upvote`/`downvote`) and outcome
    /// (`ok`, `unchanged`, `not_found`, `invalid`, `error`)
    pub static ref VOTE_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("vote_total", "vote attempts by direction and outcome"),
        &["direction", "outcome"]
    )
    .expect("metric can not be created");

    pub static ref ACTIVE_WATCHERS: IntGauge =
        IntGauge::new("active_watchers", "currently registered watch subscriptions")
            .expect("metric can not be created");

    /// Change events skipped because a watcher queue was full
    pub static ref DROPPED_CHANGE_EVENTS: IntCounter =
        IntCounter::new("dropped_change_events", "change events dropped on full watcher queues")
            .expect("metric can not be created");

    pub static ref REGISTRY: Registry = Registry::new();
}

pub(crate) fn register_custom_metrics(registry: &Registry) {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(VOTE_TOTAL.clone()),
        Box::new(ACTIVE_WATCHERS.clone()),
        Box::new(DROPPED_CHANGE_EVENTS.clone()),
    ];
    for collector in collectors {
        // Registering twice is harmless; the second attempt is reported and ignored.
        if let Err(e) = registry.register(collector) {
            info!("collector already registered: {}", e);
        }
    }
}

pub async fn start_server(
    port: u16,
    mut shutdown_signal: watch::Receiver<()>,
) {
    register_custom_metrics(&REGISTRY);

    let metrics_route = warp::path!("metrics").and_then(metrics_handler);

    info!("metrics endpoint listening on 0.0.0.0:{}/metrics", port);
    let (_, server) = warp::serve(metrics_route).bind_with_graceful_shutdown(([0, 0, 0, 0], port), async move {
        let _ = shutdown_signal.changed().await;
    });
    server.await;
}

async fn metrics_handler() -> Result<impl Reply, Rejection> {
    let mut body = encode_registry(&REGISTRY);
    body.push_str(&get_metrics_body());
    Ok(body)
}

pub(crate) fn encode_registry(registry: &Registry) -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&registry.gather(), &mut buffer) {
        error!("could not encode custom metrics: {}", e);
    };
    match String::from_utf8(buffer) {
        Ok(v) => v,
        Err(e) => {
            error!("custom metrics could not be from_utf8'd: {}", e);
            String::default()
        }
    }
}

/// Export autometrics series for Prometheus to scrape
pub fn get_metrics_body() -> String {
    prometheus_exporter::encode_http_response().into_body()
}
