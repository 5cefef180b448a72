use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use super::invalid;
use crate::Result;

/// Initial data import, applied once at startup when the store is
/// (nearly) empty.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SeedConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_path")]
    pub path: PathBuf,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            path: default_path(),
        }
    }
}

impl SeedConfig {
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.path.as_os_str().is_empty() {
            return Err(invalid("seed path cannot be empty when seeding is enabled".into()));
        }
        Ok(())
    }
}

fn default_enabled() -> bool {
    true
}
fn default_path() -> PathBuf {
    PathBuf::from("data/initial_cryptos.json")
}
