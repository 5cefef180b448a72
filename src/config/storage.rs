use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use super::invalid;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Durable sled database under `db_path`
    Sled,
    /// Process-local map, contents lost on exit
    Memory,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,

    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            db_path: default_db_path(),
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.backend == StorageBackend::Sled && self.db_path.as_os_str().is_empty() {
            return Err(invalid("db_path cannot be empty with the sled backend".into()));
        }
        Ok(())
    }
}

fn default_backend() -> StorageBackend {
    StorageBackend::Sled
}
fn default_db_path() -> PathBuf {
    PathBuf::from("./db/cryptos")
}
