use super::*;
use crate::test_utils::sample_crypto;
use crate::CryptoFields;
use crate::SortField;

#[tokio::test]
async fn test_insert_and_find() {
    let store = MemCryptoStore::new();
    let record = store.insert(sample_crypto("Bitcoin", "BTC", 0)).await.unwrap();

    let found = store.find_by_id(record.id).await.unwrap();
    assert_eq!(found, Some(record));
    assert_eq!(store.count_all().await.unwrap(), 1);
}

#[tokio::test]
async fn test_insert_duplicate_id_fails() {
    let store = MemCryptoStore::new();
    let record = store.insert(sample_crypto("Bitcoin", "BTC", 0)).await.unwrap();
    assert!(store.insert(record).await.is_err());
}

#[tokio::test]
async fn test_find_missing_returns_none() {
    let store = MemCryptoStore::new();
    let id = CryptoId::parse("000000000000000000000000").unwrap();
    assert_eq!(store.find_by_id(id).await.unwrap(), None);
}

#[tokio::test]
async fn test_conditional_update_respects_filter() {
    let store = MemCryptoStore::new();
    let record = store.insert(sample_crypto("Bitcoin", "BTC", 0)).await.unwrap();

    let matched = store
        .conditional_update(record.id, UpdateFilter::votes_greater_than(0), Mutation::AdjustVotes(-1))
        .await
        .unwrap();
    assert_eq!(matched, 0);
    assert_eq!(store.find_by_id(record.id).await.unwrap().unwrap().votes, 0);

    let matched = store
        .conditional_update(record.id, UpdateFilter::by_id(), Mutation::AdjustVotes(1))
        .await
        .unwrap();
    assert_eq!(matched, 1);
    let updated = store.find_by_id(record.id).await.unwrap().unwrap();
    assert_eq!(updated.votes, 1);
    assert!(updated.updated_at >= record.updated_at);
}

#[tokio::test]
async fn test_conditional_update_never_inserts() {
    let store = MemCryptoStore::new();
    let id = CryptoId::generate();
    let matched = store
        .conditional_update(id, UpdateFilter::by_id(), Mutation::AdjustVotes(1))
        .await
        .unwrap();
    assert_eq!(matched, 0);
    assert_eq!(store.count_all().await.unwrap(), 0);
}

#[tokio::test]
async fn test_set_fields_keeps_votes_and_created_at() {
    let store = MemCryptoStore::new();
    let record = store.insert(sample_crypto("Bitcoin", "BTC", 7)).await.unwrap();

    let fields = CryptoFields {
        name: "Bitcoin Cash".to_string(),
        asset_id: "BCH".to_string(),
        price_usd: 250.0,
    };
    let matched = store
        .conditional_update(record.id, UpdateFilter::by_id(), Mutation::SetFields(fields))
        .await
        .unwrap();
    assert_eq!(matched, 1);

    let updated = store.find_by_id(record.id).await.unwrap().unwrap();
    assert_eq!(updated.name, "Bitcoin Cash");
    assert_eq!(updated.asset_id, "BCH");
    assert_eq!(updated.votes, 7);
    assert_eq!(updated.created_at, record.created_at);
}

#[tokio::test]
async fn test_find_all_sorted() {
    let store = MemCryptoStore::new();
    store.insert(sample_crypto("Cardano", "ADA", 3)).await.unwrap();
    store.insert(sample_crypto("Bitcoin", "BTC", 10)).await.unwrap();
    store.insert(sample_crypto("Ethereum", "ETH", 5)).await.unwrap();

    let by_votes = store
        .find_all(SortParams::new(SortField::Votes, false))
        .await
        .unwrap();
    let votes: Vec<i32> = by_votes.iter().map(|c| c.votes).collect();
    assert_eq!(votes, vec![10, 5, 3]);
}

#[tokio::test]
async fn test_delete_by_id() {
    let store = MemCryptoStore::new();
    let record = store.insert(sample_crypto("Bitcoin", "BTC", 0)).await.unwrap();

    assert_eq!(store.delete_by_id(record.id).await.unwrap(), Some(record.clone()));
    assert_eq!(store.delete_by_id(record.id).await.unwrap(), None);
    assert_eq!(store.count_all().await.unwrap(), 0);
}
