//! Configuration management for the crypto vote service.
//!
//! Provides hierarchical configuration loading from multiple sources with priority:
//! 1. Default values (hardcoded)
//! 2. `config/default.toml` (optional)
//! 3. Explicit config file (argument or `CONFIG_PATH`)
//! 4. Environment variables with `CRYPTO__` prefix (highest priority)
//!

mod cache;
mod monitoring;
mod seed;
mod server;
mod storage;
mod watch;
pub use cache::*;
pub use monitoring::*;
pub use seed::*;
pub use server::*;
pub use storage::*;
pub use watch::*;


//---
use std::env;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Settings {
    /// gRPC listener and process-level settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Backing document store
    #[serde(default)]
    pub storage: StorageConfig,
    /// Optional read cache in front of the store
    #[serde(default)]
    pub cache: CacheConfig,
    /// Live update fan-out
    #[serde(default)]
    pub watch: WatchConfig,
    /// Metrics endpoint
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    /// Initial data import
    #[serde(default)]
    pub seed: SeedConfig,
}

impl Settings {
    /// Load configuration from multiple sources with priority:
    /// 1. Hardcoded defaults
    /// 2. `config/default.toml`
    /// 3. `path` argument, or `CONFIG_PATH` when no argument is given
    /// 4. Environment variables
    ///
    /// # Arguments
    /// * `path` - Optional path to a configuration file which must exist
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder().add_source(File::with_name("config/default").required(false));

        if let Some(custom) = path {
            builder = builder.add_source(File::with_name(custom).required(true));
        } else if let Ok(env_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&env_path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("CRYPTO")
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validates every section
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.storage.validate()?;
        self.cache.validate()?;
        self.watch.validate()?;
        self.monitoring.validate()?;
        self.seed.validate()?;
        Ok(())
    }
}

pub(crate) fn invalid(message: String) -> Error {
    Error::Config(ConfigError::Message(message))
}
