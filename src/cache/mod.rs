//! Read cache in front of the store.
//!
//! Raw backends implement [`CryptoCache`]. Services only talk to the
//! [`CacheLayer`] facade, which downgrades every backend failure to a logged
//! warning: a broken cache never fails a request.

mod layer;
mod mem_cache;
mod redis_cache;

pub use layer::*;
pub use mem_cache::*;
pub use redis_cache::*;

#[cfg(test)]
mod layer_test;
#[cfg(test)]
mod mem_cache_test;

#[cfg(test)]
use mockall::automock;
use tonic::async_trait;

use crate::CacheError;

pub type CacheResult<T> = std::result::Result<T, CacheError>;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CryptoCache: Send + Sync + 'static {
    async fn get(
        &self,
        key: &str,
    ) -> CacheResult<Option<String>>;

    async fn set(
        &self,
        key: &str,
        value: String,
    ) -> CacheResult<()>;

    async fn delete(
        &self,
        key: &str,
    ) -> CacheResult<()>;

    /// Deletes every key starting with `prefix`, returns the number removed
    async fn delete_by_prefix(
        &self,
        prefix: &str,
    ) -> CacheResult<u64>;
}
