use serde::Deserialize;
use serde::Serialize;

use super::invalid;
use crate::Result;

/// Live update fan-out settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WatchConfig {
    /// Per-watcher queue capacity. Events published to a full queue are
    /// dropped for that watcher only.
    #[serde(default = "default_watcher_buffer_size")]
    pub watcher_buffer_size: usize,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            watcher_buffer_size: default_watcher_buffer_size(),
        }
    }
}

impl WatchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.watcher_buffer_size == 0 {
            return Err(invalid("watcher_buffer_size must be > 0".into()));
        }
        Ok(())
    }
}

fn default_watcher_buffer_size() -> usize {
    16
}
