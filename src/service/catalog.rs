use std::sync::Arc;

use tracing::debug;
use tracing::error;
use tracing::info;

use crate::normalize_fields;
use crate::validate_id;
use crate::validate_sort;
use crate::CacheLayer;
use crate::CryptoCurrency;
use crate::CryptoId;
use crate::CryptoStore;
use crate::Mutation;
use crate::Result;
use crate::ServiceError;
use crate::UpdateFilter;
use crate::UpdateNotifier;
use crate::VoteCounter;

/// Reply of a successful delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub id: String,
    pub message: String,
}

pub const DELETED_MESSAGE: &str = "deleted successful";

#[derive(Clone)]
pub struct CryptoCatalog {
    pub(super) store: Arc<dyn CryptoStore>,
    pub(super) counter: VoteCounter,
    pub(super) cache: CacheLayer,
    pub(super) notifier: UpdateNotifier,
}

impl std::fmt::Debug for CryptoCatalog {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("CryptoCatalog")
            .field("cache", &self.cache)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

impl CryptoCatalog {
    pub fn new(
        store: Arc<dyn CryptoStore>,
        cache: CacheLayer,
        notifier: UpdateNotifier,
    ) -> Self {
        Self {
            counter: VoteCounter::new(store.clone()),
            store,
            cache,
            notifier,
        }
    }

    pub fn store(&self) -> &Arc<dyn CryptoStore> {
        &self.store
    }

    pub fn notifier(&self) -> &UpdateNotifier {
        &self.notifier
    }

    pub async fn create(
        &self,
        name: &str,
        asset_id: &str,
        price_usd: f64,
    ) -> Result<CryptoCurrency> {
        debug!(name, asset_id, price_usd, "creating crypto");
        let fields = normalize_fields(name, asset_id, price_usd).inspect_err(|e| {
            error!("Params create crypto is invalid: {}", e);
        })?;

        let record = self.store.insert(CryptoCurrency::new(fields)).await.inspect_err(|e| {
            error!("Crypto not inserted: {}", e);
        })?;
        self.cache.invalidate_listings().await;

        info!(id = %record.id, "Crypto created successful");
        Ok(record)
    }

    pub async fn edit(
        &self,
        id: &str,
        name: &str,
        asset_id: &str,
        price_usd: f64,
    ) -> Result<CryptoCurrency> {
        debug!(id, name, asset_id, price_usd, "editing crypto");
        let id = validate_id(id)?;
        let fields = normalize_fields(name, asset_id, price_usd)?;

        let matched = self
            .store
            .conditional_update(id, UpdateFilter::by_id(), Mutation::SetFields(fields))
            .await
            .inspect_err(|e| error!(%id, "Crypto not edited: {}", e))?;
        if matched == 0 {
            return Err(not_found(id));
        }

        let record = self.fetch(id).await?;
        self.cache.invalidate_record(&id).await;
        self.notifier.publish(id);

        info!(%id, "Crypto updated successful");
        Ok(record)
    }

    pub async fn delete(
        &self,
        id: &str,
    ) -> Result<DeleteOutcome> {
        debug!(id, "deleting crypto");
        let id = validate_id(id)?;

        match self.store.delete_by_id(id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                error!(%id, "Delete crypto error: not found");
                return Err(not_found(id));
            }
            Err(e) => {
                error!(%id, "Crypto not deleted: {}", e);
                return Err(e);
            }
        }

        self.cache.invalidate_record(&id).await;
        self.notifier.publish(id);

        info!(%id, "Crypto deleted successful");
        Ok(DeleteOutcome {
            id: id.to_hex(),
            message: DELETED_MESSAGE.to_string(),
        })
    }

    /// Cache first, then the store. A store hit refills the cache.
    pub async fn find(
        &self,
        id: &str,
    ) -> Result<CryptoCurrency> {
        debug!(id, "finding crypto");
        let id = validate_id(id)?;

        if let Some(record) = self.cache.get_record(&id).await {
            return Ok(record);
        }

        let record = self.fetch(id).await?;
        self.cache.put_record(&record).await;

        info!(%id, "Crypto found successful");
        Ok(record)
    }

    pub async fn list_all(
        &self,
        field_sort: &str,
        ascending: bool,
    ) -> Result<Vec<CryptoCurrency>> {
        debug!(field_sort, ascending, "listing cryptos");
        let sort = validate_sort(field_sort, ascending)?;

        if let Some(records) = self.cache.get_listing(&sort).await {
            return Ok(records);
        }

        let records = self
            .store
            .find_all(sort)
            .await
            .inspect_err(|e| error!("Cryptos not listed: {}", e))?;
        self.cache.put_listing(&sort, &records).await;

        info!("Listed {} crypto successful", records.len());
        Ok(records)
    }

    /// Reads the authoritative record, mapping absence to `NotFound`
    pub async fn fetch(
        &self,
        id: CryptoId,
    ) -> Result<CryptoCurrency> {
        match self.store.find_by_id(id).await? {
            Some(record) => Ok(record),
            None => Err(not_found(id)),
        }
    }
}

pub(super) fn not_found(id: CryptoId) -> crate::Error {
    ServiceError::NotFound { id: id.to_hex() }.into()
}
