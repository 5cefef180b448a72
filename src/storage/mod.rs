//! Document store for cryptocurrency records.
//!
//! The store is the single source of truth. Vote adjustments go through
//! [`CryptoStore::conditional_update`], whose filter is evaluated atomically
//! with the mutation, so the non-negative vote floor is enforced by the
//! store itself rather than by a read-modify-write in the caller.

mod mem_store;
mod seed;
mod sled_store;
mod vote_counter;

pub use mem_store::*;
pub use seed::*;
pub use sled_store::*;
pub use vote_counter::*;

#[cfg(test)]
mod mem_store_test;

use chrono::DateTime;
use chrono::Utc;
#[cfg(test)]
use mockall::automock;
use tonic::async_trait;

use crate::CryptoCurrency;
use crate::CryptoFields;
use crate::CryptoId;
use crate::Result;
use crate::SortParams;

/// Extra match condition of a conditional update. The identifier is
/// always part of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateFilter {
    /// When set, the record only matches if `votes > n`
    pub min_votes_exclusive: Option<i32>,
    /// When set, the record only matches if `votes < n`
    pub max_votes_exclusive: Option<i32>,
}

impl UpdateFilter {
    /// Matches by identifier alone
    pub fn by_id() -> Self {
        Self::default()
    }

    /// Matches by identifier and `votes > n`
    pub fn votes_greater_than(n: i32) -> Self {
        Self {
            min_votes_exclusive: Some(n),
            ..Self::default()
        }
    }

    /// Matches by identifier and `votes < n`
    pub fn votes_less_than(n: i32) -> Self {
        Self {
            max_votes_exclusive: Some(n),
            ..Self::default()
        }
    }

    pub fn matches(
        &self,
        record: &CryptoCurrency,
    ) -> bool {
        self.min_votes_exclusive.map_or(true, |n| record.votes > n)
            && self.max_votes_exclusive.map_or(true, |n| record.votes < n)
    }
}

/// Change applied to a matched record. Every mutation refreshes
/// `updated_at`.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// `votes += delta`
    AdjustVotes(i32),
    /// Overwrite name, asset symbol and price
    SetFields(CryptoFields),
}

impl Mutation {
    pub fn apply(
        &self,
        record: &mut CryptoCurrency,
        now: DateTime<Utc>,
    ) {
        match self {
            Mutation::AdjustVotes(delta) => {
                record.votes = record.votes.saturating_add(*delta);
            }
            Mutation::SetFields(fields) => {
                record.name = fields.name.clone();
                record.asset_id = fields.asset_id.clone();
                record.price_usd = fields.price_usd;
            }
        }
        record.updated_at = now;
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait CryptoStore: Send + Sync + 'static {
    /// Inserts a new record. The id must not exist yet.
    async fn insert(
        &self,
        record: CryptoCurrency,
    ) -> Result<CryptoCurrency>;

    async fn find_by_id(
        &self,
        id: CryptoId,
    ) -> Result<Option<CryptoCurrency>>;

    async fn find_all(
        &self,
        sort: SortParams,
    ) -> Result<Vec<CryptoCurrency>>;

    /// Applies `mutation` to the record `id` if `filter` holds at write
    /// time. Returns the number of matched records (0 or 1). Never
    /// inserts.
    async fn conditional_update(
        &self,
        id: CryptoId,
        filter: UpdateFilter,
        mutation: Mutation,
    ) -> Result<u64>;

    /// Removes the record and returns it, `None` when absent
    async fn delete_by_id(
        &self,
        id: CryptoId,
    ) -> Result<Option<CryptoCurrency>>;

    async fn count_all(&self) -> Result<u64>;
}
