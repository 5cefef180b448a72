//! Best-effort cache facade.
//!
//! Keys:
//! - single record: the record's hex id
//! - listing snapshot: `"{list_prefix}-{field}-{ascending}"`
//!
//! Listings are sorted over mutable fields, so any successful record
//! mutation must drop the record entry and every listing entry.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use tracing::warn;

use super::CryptoCache;
use crate::CryptoCurrency;
use crate::CryptoId;
use crate::SortParams;

#[derive(Clone)]
pub struct CacheLayer {
    backend: Option<Arc<dyn CryptoCache>>,
    list_prefix: String,
}

impl std::fmt::Debug for CacheLayer {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("CacheLayer")
            .field("enabled", &self.backend.is_some())
            .field("list_prefix", &self.list_prefix)
            .finish()
    }
}

impl CacheLayer {
    pub fn new(
        backend: Arc<dyn CryptoCache>,
        list_prefix: impl Into<String>,
    ) -> Self {
        Self {
            backend: Some(backend),
            list_prefix: list_prefix.into(),
        }
    }

    /// A layer that never hits and ignores writes
    pub fn disabled() -> Self {
        Self {
            backend: None,
            list_prefix: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    pub fn record_key(id: &CryptoId) -> String {
        id.to_hex()
    }

    pub fn listing_key(
        &self,
        sort: &SortParams,
    ) -> String {
        format!("{}-{}-{}", self.list_prefix, sort.field.as_str(), sort.ascending)
    }

    pub async fn get_record(
        &self,
        id: &CryptoId,
    ) -> Option<CryptoCurrency> {
        self.get_json(&Self::record_key(id)).await
    }

    pub async fn put_record(
        &self,
        record: &CryptoCurrency,
    ) {
        self.set_json(&Self::record_key(&record.id), record).await;
    }

    pub async fn get_listing(
        &self,
        sort: &SortParams,
    ) -> Option<Vec<CryptoCurrency>> {
        self.get_json(&self.listing_key(sort)).await
    }

    pub async fn put_listing(
        &self,
        sort: &SortParams,
        records: &[CryptoCurrency],
    ) {
        self.set_json(&self.listing_key(sort), &records).await;
    }

    /// Drops the record entry and all listing snapshots
    pub async fn invalidate_record(
        &self,
        id: &CryptoId,
    ) {
        let Some(backend) = &self.backend else {
            return;
        };
        let key = Self::record_key(id);
        if let Err(e) = backend.delete(&key).await {
            warn!(%id, "cache delete failed: {}", e);
        }
        self.invalidate_listings().await;
    }

    pub async fn invalidate_listings(&self) {
        let Some(backend) = &self.backend else {
            return;
        };
        match backend.delete_by_prefix(&self.list_prefix).await {
            Ok(removed) => debug!(removed, "listing cache invalidated"),
            Err(e) => warn!("cache listing invalidation failed: {}", e),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Option<T> {
        let backend = self.backend.as_ref()?;
        match backend.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    debug!(key, "cache hit");
                    Some(value)
                }
                Err(e) => {
                    warn!(key, "cache entry is corrupt, ignoring: {}", e);
                    None
                }
            },
            Ok(None) => {
                debug!(key, "cache miss");
                None
            }
            Err(e) => {
                warn!(key, "cache get failed: {}", e);
                None
            }
        }
    }

    async fn set_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) {
        let Some(backend) = &self.backend else {
            return;
        };
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, "cache serialization failed: {}", e);
                return;
            }
        };
        if let Err(e) = backend.set(key, raw).await {
            warn!(key, "cache set failed: {}", e);
        }
    }
}
