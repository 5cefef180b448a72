//! Counter store adapter: translates a vote direction into the
//! filter/mutation pair understood by [`CryptoStore::conditional_update`].

use std::sync::Arc;

use tracing::debug;

use super::CryptoStore;
use super::Mutation;
use super::UpdateFilter;
use crate::CryptoId;
use crate::Result;
use crate::VoteDirection;

/// Builds the conditional update for one vote.
///
/// - Up: `votes += 1`, matched by id and `votes < i32::MAX`
/// - Down: `votes -= 1`, matched by id and `votes > 0`
pub fn vote_update(direction: VoteDirection) -> (UpdateFilter, Mutation) {
    let filter = match direction {
        VoteDirection::Up => UpdateFilter::votes_less_than(i32::MAX),
        VoteDirection::Down => UpdateFilter::votes_greater_than(0),
    };
    (filter, Mutation::AdjustVotes(direction.delta()))
}

#[derive(Clone)]
pub struct VoteCounter {
    store: Arc<dyn CryptoStore>,
}

impl VoteCounter {
    pub fn new(store: Arc<dyn CryptoStore>) -> Self {
        Self { store }
    }

    /// Applies one vote and returns the matched count (0 or 1).
    ///
    /// 0 is ambiguous on its own: the record may be missing, or its counter
    /// already at the floor or the ceiling. The caller disambiguates with a
    /// re-read.
    pub async fn adjust_vote(
        &self,
        id: CryptoId,
        direction: VoteDirection,
    ) -> Result<u64> {
        let (filter, mutation) = vote_update(direction);
        let matched = self.store.conditional_update(id, filter, mutation).await?;
        debug!(%id, %direction, matched, "vote adjusted");
        Ok(matched)
    }
}
