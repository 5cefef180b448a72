use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use super::invalid;
use crate::Result;

/// gRPC server parameters
///
/// Keepalive and flow control settings are applied to the tonic server
/// builder as-is; watch streams are long lived so keepalive matters more
/// here than for the unary calls.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_address: SocketAddr,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Max concurrent requests per connection
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: usize,

    /// TCP keepalive in seconds
    #[serde(default = "default_tcp_keepalive")]
    pub tcp_keepalive_in_secs: u64,

    /// HTTP2 keepalive ping interval in seconds
    #[serde(default = "default_h2_keepalive_interval")]
    pub http2_keep_alive_interval_in_secs: u64,

    /// HTTP2 keepalive timeout in seconds
    #[serde(default = "default_h2_keepalive_timeout")]
    pub http2_keep_alive_timeout_in_secs: u64,

    #[serde(default = "default_tcp_nodelay")]
    pub tcp_nodelay: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_addr(),
            log_dir: default_log_dir(),
            concurrency_limit: default_concurrency_limit(),
            tcp_keepalive_in_secs: default_tcp_keepalive(),
            http2_keep_alive_interval_in_secs: default_h2_keepalive_interval(),
            http2_keep_alive_timeout_in_secs: default_h2_keepalive_timeout(),
            tcp_nodelay: default_tcp_nodelay(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.listen_address.port() == 0 {
            return Err(invalid("listen_address must specify a non-zero port".into()));
        }

        if self.log_dir.as_os_str().is_empty() {
            return Err(invalid("log_dir path cannot be empty".into()));
        }

        if self.concurrency_limit == 0 {
            return Err(invalid("concurrency_limit must be > 0".into()));
        }

        if self.http2_keep_alive_timeout_in_secs >= self.http2_keep_alive_interval_in_secs {
            return Err(invalid(format!(
                "http2_keep_alive_timeout_in_secs ({}) must be shorter than the interval ({})",
                self.http2_keep_alive_timeout_in_secs, self.http2_keep_alive_interval_in_secs
            )));
        }

        Ok(())
    }
}

fn default_listen_addr() -> SocketAddr {
    "0.0.0.0:55555".parse().unwrap()
}
fn default_log_dir() -> PathBuf {
    PathBuf::from("./logs")
}
fn default_concurrency_limit() -> usize {
    256
}
fn default_tcp_keepalive() -> u64 {
    60
}
fn default_h2_keepalive_interval() -> u64 {
    30
}
fn default_h2_keepalive_timeout() -> u64 {
    10
}
fn default_tcp_nodelay() -> bool {
    true
}
