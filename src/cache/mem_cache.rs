use dashmap::DashMap;
use tonic::async_trait;

use super::CacheResult;
use super::CryptoCache;

/// Process-local cache backend
#[derive(Debug, Default)]
pub struct MemCache {
    entries: DashMap<String, String>,
}

impl MemCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CryptoCache for MemCache {
    async fn get(
        &self,
        key: &str,
    ) -> CacheResult<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(
        &self,
        key: &str,
        value: String,
    ) -> CacheResult<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(
        &self,
        key: &str,
    ) -> CacheResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn delete_by_prefix(
        &self,
        prefix: &str,
    ) -> CacheResult<u64> {
        let before = self.entries.len();
        self.entries.retain(|k, _| !k.starts_with(prefix));
        Ok(before.saturating_sub(self.entries.len()) as u64)
    }
}
