//! Sled-backed document store.
//!
//! Records are bincode-encoded and keyed by the 12 id bytes. Conditional
//! updates run inside sled's compare-and-swap loop (`fetch_and_update`), so
//! the filter is re-evaluated against the latest value on every retry and two
//! racing decrements on a counter of 1 cannot both match.

use std::path::Path;

use tonic::async_trait;
use tracing::debug;
use tracing::warn;

use super::CryptoStore;
use super::Mutation;
use super::UpdateFilter;
use crate::time::now_millis;
use crate::CryptoCurrency;
use crate::CryptoId;
use crate::Error;
use crate::Result;
use crate::SortParams;
use crate::StorageError;
use crate::SystemError;

const CRYPTO_TREE: &str = "cryptos";

#[derive(Debug, Clone)]
pub struct SledCryptoStore {
    tree: sled::Tree,
}

/// Opens (or creates) the sled database under `db_path`
pub fn init_sled_crypto_db(db_path: impl AsRef<Path> + std::fmt::Debug) -> std::result::Result<sled::Db, std::io::Error> {
    debug!("init_sled_crypto_db from path: {:?}", &db_path);

    let path = db_path.as_ref();
    sled::Config::default()
        .path(path)
        .use_compression(true)
        .compression_factor(1)
        .open()
        .map_err(|e| {
            warn!("Try to open DB at this location: {:?} and failed: {:?}", path, e);
            std::io::Error::other(e)
        })
}

impl SledCryptoStore {
    pub fn new(db: &sled::Db) -> Result<Self> {
        let tree = db.open_tree(CRYPTO_TREE)?;
        Ok(Self { tree })
    }

    pub fn open(db_path: impl AsRef<Path> + std::fmt::Debug) -> Result<Self> {
        let db = init_sled_crypto_db(db_path).map_err(StorageError::Io)?;
        Self::new(&db)
    }

    /// Flushes dirty pages to disk
    pub async fn flush(&self) -> Result<()> {
        self.tree.flush_async().await?;
        Ok(())
    }

    fn encode(record: &CryptoCurrency) -> Result<Vec<u8>> {
        Ok(bincode::serialize(record)?)
    }

    fn decode(bytes: &[u8]) -> Result<CryptoCurrency> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[async_trait]
impl CryptoStore for SledCryptoStore {
    async fn insert(
        &self,
        record: CryptoCurrency,
    ) -> Result<CryptoCurrency> {
        let bytes = Self::encode(&record)?;
        match self
            .tree
            .compare_and_swap(record.id.as_bytes(), None as Option<&[u8]>, Some(bytes))?
        {
            Ok(()) => {
                debug!(id = %record.id, "crypto inserted");
                Ok(record)
            }
            Err(_) => Err(Error::System(SystemError::GeneralServer(format!(
                "duplicate crypto id {}",
                record.id
            )))),
        }
    }

    async fn find_by_id(
        &self,
        id: CryptoId,
    ) -> Result<Option<CryptoCurrency>> {
        match self.tree.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn find_all(
        &self,
        sort: SortParams,
    ) -> Result<Vec<CryptoCurrency>> {
        let mut records = Vec::with_capacity(self.tree.len());
        for item in self.tree.iter() {
            let (_, bytes) = item?;
            records.push(Self::decode(&bytes)?);
        }
        sort.sort(&mut records);
        Ok(records)
    }

    async fn conditional_update(
        &self,
        id: CryptoId,
        filter: UpdateFilter,
        mutation: Mutation,
    ) -> Result<u64> {
        let now = now_millis();
        // Outcome of the last closure invocation, which is the one sled committed.
        let mut matched = false;
        let mut failure: Option<Error> = None;

        self.tree.fetch_and_update(id.as_bytes(), |old| {
            matched = false;
            failure = None;

            let old = old?;
            let mut record = match Self::decode(old) {
                Ok(r) => r,
                Err(e) => {
                    failure = Some(e);
                    return Some(old.to_vec());
                }
            };

            if !filter.matches(&record) {
                return Some(old.to_vec());
            }

            mutation.apply(&mut record, now);
            match Self::encode(&record) {
                Ok(bytes) => {
                    matched = true;
                    Some(bytes)
                }
                Err(e) => {
                    failure = Some(e);
                    Some(old.to_vec())
                }
            }
        })?;

        if let Some(e) = failure {
            return Err(e);
        }

        debug!(%id, ?filter, ?mutation, matched, "conditional update");
        Ok(matched as u64)
    }

    async fn delete_by_id(
        &self,
        id: CryptoId,
    ) -> Result<Option<CryptoCurrency>> {
        match self.tree.remove(id.as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn count_all(&self) -> Result<u64> {
        Ok(self.tree.len() as u64)
    }
}
