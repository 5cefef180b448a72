use std::sync::Arc;

use crate::CacheLayer;
use crate::CryptoCatalog;
use crate::CryptoCurrency;
use crate::CryptoFields;
use crate::CryptoStore;
use crate::MemCache;
use crate::MemCryptoStore;
use crate::UpdateNotifier;
use crate::WatchConfig;

/// Record with a fresh id and the given vote count. Name and asset are
/// stored as given.
pub fn sample_crypto(
    name: &str,
    asset_id: &str,
    votes: i32,
) -> CryptoCurrency {
    let mut record = CryptoCurrency::new(CryptoFields {
        name: name.to_string(),
        asset_id: asset_id.to_string(),
        price_usd: 1.5,
    });
    record.votes = votes;
    record
}

/// Catalog over in-memory store and cache, as used by most service tests
pub struct TestCatalog {
    pub catalog: CryptoCatalog,
    pub store: Arc<MemCryptoStore>,
    pub cache: Arc<MemCache>,
}

pub fn mem_catalog() -> TestCatalog {
    let store = Arc::new(MemCryptoStore::new());
    let cache = Arc::new(MemCache::new());
    let catalog = CryptoCatalog::new(
        store.clone(),
        CacheLayer::new(cache.clone(), "ListAll"),
        UpdateNotifier::new(&WatchConfig::default()),
    );
    TestCatalog { catalog, store, cache }
}

/// Catalog over an arbitrary (usually mocked) store with caching disabled
pub fn catalog_with_store(store: Arc<dyn CryptoStore>) -> CryptoCatalog {
    CryptoCatalog::new(store, CacheLayer::disabled(), UpdateNotifier::new(&WatchConfig::default()))
}

/// Inserts `record` directly into the store, bypassing the catalog
pub async fn seed_record(
    store: &dyn CryptoStore,
    record: CryptoCurrency,
) -> CryptoCurrency {
    store.insert(record).await.expect("insert should succeed")
}

static LOGGER_INIT: once_cell::sync::Lazy<()> = once_cell::sync::Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

pub fn enable_logger() {
    *LOGGER_INIT;
    println!("setup logger for unit test.");
}
