use std::sync::Arc;

use super::*;
use crate::test_utils::sample_crypto;
use crate::CacheError;
use crate::SortField;
use crate::SortParams;

fn layer_with_mem() -> (Arc<MemCache>, CacheLayer) {
    let backend = Arc::new(MemCache::new());
    let layer = CacheLayer::new(backend.clone(), "ListAll");
    (backend, layer)
}

#[test]
fn test_listing_key_format() {
    let (_, layer) = layer_with_mem();
    assert_eq!(
        layer.listing_key(&SortParams::new(SortField::Votes, false)),
        "ListAll-votes-false"
    );
    assert_eq!(layer.listing_key(&SortParams::default()), "ListAll-name-true");
}

#[tokio::test]
async fn test_record_round_trip_uses_hex_id_key() {
    let (backend, layer) = layer_with_mem();
    let record = sample_crypto("Bitcoin", "BTC", 3);

    layer.put_record(&record).await;
    assert!(backend.get(&record.id.to_hex()).await.unwrap().is_some());
    assert_eq!(layer.get_record(&record.id).await, Some(record));
}

#[tokio::test]
async fn test_invalidate_record_drops_record_and_listings() {
    let (backend, layer) = layer_with_mem();
    let record = sample_crypto("Bitcoin", "BTC", 3);
    let other = sample_crypto("Ethereum", "ETH", 1);
    let sort = SortParams::default();

    layer.put_record(&record).await;
    layer.put_record(&other).await;
    layer.put_listing(&sort, &[record.clone(), other.clone()]).await;
    assert_eq!(backend.len(), 3);

    layer.invalidate_record(&record.id).await;

    assert_eq!(layer.get_record(&record.id).await, None);
    assert_eq!(layer.get_listing(&sort).await, None);
    assert_eq!(layer.get_record(&other.id).await, Some(other));
}

#[tokio::test]
async fn test_disabled_layer_is_a_noop() {
    let layer = CacheLayer::disabled();
    let record = sample_crypto("Bitcoin", "BTC", 3);

    layer.put_record(&record).await;
    assert!(!layer.is_enabled());
    assert_eq!(layer.get_record(&record.id).await, None);
    layer.invalidate_record(&record.id).await;
}

#[tokio::test]
async fn test_backend_errors_are_downgraded_to_misses() {
    let mut backend = MockCryptoCache::new();
    backend
        .expect_get()
        .returning(|_| Err(CacheError::Redis("connection refused".to_string())));
    backend
        .expect_set()
        .returning(|_, _| Err(CacheError::Redis("connection refused".to_string())));
    backend
        .expect_delete()
        .returning(|_| Err(CacheError::Redis("connection refused".to_string())));
    backend
        .expect_delete_by_prefix()
        .returning(|_| Err(CacheError::Redis("connection refused".to_string())));

    let layer = CacheLayer::new(Arc::new(backend), "ListAll");
    let record = sample_crypto("Bitcoin", "BTC", 3);

    layer.put_record(&record).await;
    assert_eq!(layer.get_record(&record.id).await, None);
    layer.invalidate_record(&record.id).await;
    assert_eq!(layer.get_listing(&SortParams::default()).await, None);
}

#[tokio::test]
async fn test_corrupt_entry_is_treated_as_miss() {
    let (backend, layer) = layer_with_mem();
    let record = sample_crypto("Bitcoin", "BTC", 3);
    backend.set(&record.id.to_hex(), "{broken".to_string()).await.unwrap();

    assert_eq!(layer.get_record(&record.id).await, None);
}
