//! In-memory document store.
//!
//! Conditional updates evaluate the filter while holding the entry's shard
//! write lock, which gives the same atomicity as the sled store.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tonic::async_trait;
use tracing::debug;

use super::CryptoStore;
use super::Mutation;
use super::UpdateFilter;
use crate::time::now_millis;
use crate::CryptoCurrency;
use crate::CryptoId;
use crate::Error;
use crate::Result;
use crate::SortParams;
use crate::SystemError;

#[derive(Debug, Default)]
pub struct MemCryptoStore {
    records: DashMap<CryptoId, CryptoCurrency>,
}

impl MemCryptoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CryptoStore for MemCryptoStore {
    async fn insert(
        &self,
        record: CryptoCurrency,
    ) -> Result<CryptoCurrency> {
        match self.records.entry(record.id) {
            Entry::Occupied(_) => Err(Error::System(SystemError::GeneralServer(format!(
                "duplicate crypto id {}",
                record.id
            )))),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                debug!(id = %record.id, "crypto inserted");
                Ok(record)
            }
        }
    }

    async fn find_by_id(
        &self,
        id: CryptoId,
    ) -> Result<Option<CryptoCurrency>> {
        Ok(self.records.get(&id).map(|r| r.value().clone()))
    }

    async fn find_all(
        &self,
        sort: SortParams,
    ) -> Result<Vec<CryptoCurrency>> {
        let mut records: Vec<CryptoCurrency> = self.records.iter().map(|r| r.value().clone()).collect();
        sort.sort(&mut records);
        Ok(records)
    }

    async fn conditional_update(
        &self,
        id: CryptoId,
        filter: UpdateFilter,
        mutation: Mutation,
    ) -> Result<u64> {
        let matched = match self.records.get_mut(&id) {
            Some(mut record) if filter.matches(&record) => {
                mutation.apply(&mut record, now_millis());
                1
            }
            _ => 0,
        };
        debug!(%id, ?filter, ?mutation, matched, "conditional update");
        Ok(matched)
    }

    async fn delete_by_id(
        &self,
        id: CryptoId,
    ) -> Result<Option<CryptoCurrency>> {
        Ok(self.records.remove(&id).map(|(_, record)| record))
    }

    async fn count_all(&self) -> Result<u64> {
        Ok(self.records.len() as u64)
    }
}
