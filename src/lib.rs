//! Cryptocurrency catalog with atomic up/down vote counters, a best-effort
//! read cache and live per-record watch streams over gRPC.

mod cache;
mod config;
mod errors;
mod metrics;
mod model;
mod network;
mod notify;
mod server;
mod service;
mod storage;
pub mod proto;
pub mod utils;

pub use cache::*;
pub use config::*;
pub use errors::*;
pub use metrics::*;
pub use model::*;
pub use network::*;
pub use notify::*;
pub use server::*;
pub use service::*;
pub use storage::*;
pub use utils::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
//-----------------------------------------------------------
// Autometrics
/// autometrics: https://docs.autometrics.dev/rust/adding-alerts-and-slos
use autometrics::objectives::Objective;
use autometrics::objectives::ObjectiveLatency;
use autometrics::objectives::ObjectivePercentile;
const API_SLO: Objective = Objective::new("api")
    .success_rate(ObjectivePercentile::P99_9)
    .latency(ObjectiveLatency::Ms10, ObjectivePercentile::P99);
