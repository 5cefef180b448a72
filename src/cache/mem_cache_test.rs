use super::*;

#[tokio::test]
async fn test_set_get_delete() {
    let cache = MemCache::new();
    assert_eq!(cache.get("k").await.unwrap(), None);

    cache.set("k", "v".to_string()).await.unwrap();
    assert_eq!(cache.get("k").await.unwrap(), Some("v".to_string()));

    cache.delete("k").await.unwrap();
    assert_eq!(cache.get("k").await.unwrap(), None);
    // deleting a missing key is not an error
    cache.delete("k").await.unwrap();
}

#[tokio::test]
async fn test_delete_by_prefix_only_touches_matching_keys() {
    let cache = MemCache::new();
    cache.set("ListAll-name-true", "[]".to_string()).await.unwrap();
    cache.set("ListAll-votes-false", "[]".to_string()).await.unwrap();
    cache.set("64a1f0c2b3d4e5f60718293a", "{}".to_string()).await.unwrap();

    assert_eq!(cache.delete_by_prefix("ListAll").await.unwrap(), 2);
    assert_eq!(cache.len(), 1);
    assert!(cache.get("64a1f0c2b3d4e5f60718293a").await.unwrap().is_some());
}
