//! Initial data import.
//!
//! Loads `{"cryptos": [...]}` from a JSON file and inserts each entry with a
//! fresh id and timestamps. The import only runs while the store holds at
//! most one record, so restarts do not duplicate data.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::CryptoStore;
use crate::CryptoCurrency;
use crate::CryptoFields;
use crate::Error;
use crate::Result;
use crate::StorageError;

#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub cryptos: Vec<SeedCrypto>,
}

#[derive(Debug, Deserialize)]
pub struct SeedCrypto {
    pub name: String,
    pub asset_id: String,
    #[serde(default)]
    pub price_usd: f64,
    #[serde(default)]
    pub votes: i32,
}

pub fn read_seed_file(path: impl AsRef<Path>) -> Result<SeedFile> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(StorageError::Io)?;
    info!("Successful to open file json {}", path.display());
    serde_json::from_str(&content)
        .map_err(|e| Error::from(StorageError::Import(format!("{}: {}", path.display(), e))))
}

/// Imports the seed file into `store` and returns the number of inserted
/// records. Returns 0 without reading the file when the store already holds
/// more than one record.
pub async fn import_initial(
    store: &dyn CryptoStore,
    path: impl AsRef<Path>,
) -> Result<usize> {
    let existing = store.count_all().await?;
    if existing > 1 {
        warn!("Already exists {} cryptos in store, skipping import", existing);
        return Ok(0);
    }

    let seed = read_seed_file(path)?;
    info!("Importing {} cryptos", seed.cryptos.len());

    let mut inserted = 0;
    for entry in seed.cryptos {
        let mut record = CryptoCurrency::new(CryptoFields {
            name: entry.name,
            asset_id: entry.asset_id,
            price_usd: entry.price_usd,
        });
        record.votes = entry.votes.max(0);

        let name = record.name.clone();
        match store.insert(record).await {
            Ok(_) => {
                inserted += 1;
                debug!("Crypto {} imported", name);
            }
            Err(e) => error!("Error in import {}: {}", name, e),
        }
    }

    Ok(inserted)
}
