use serde::Deserialize;
use serde::Serialize;

use super::invalid;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Memory,
    Redis,
}

/// Read cache settings. The cache is an accelerator only; disabling it
/// changes latency, never results.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_backend")]
    pub backend: CacheBackend,

    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Prefix shared by every listing snapshot key
    #[serde(default = "default_list_prefix")]
    pub list_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            backend: default_backend(),
            redis_url: default_redis_url(),
            list_prefix: default_list_prefix(),
        }
    }
}

impl CacheConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.list_prefix.is_empty() {
            return Err(invalid("list_prefix cannot be empty".into()));
        }

        if self.backend == CacheBackend::Redis && !self.redis_url.starts_with("redis://") {
            return Err(invalid(format!(
                "redis_url must use the redis:// scheme, got {}",
                self.redis_url
            )));
        }

        Ok(())
    }
}

fn default_enabled() -> bool {
    true
}
fn default_backend() -> CacheBackend {
    CacheBackend::Memory
}
fn default_redis_url() -> String {
    "redis://127.0.0.1:6379/".to_string()
}
fn default_list_prefix() -> String {
    "ListAll".to_string()
}
