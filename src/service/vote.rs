//! Vote service.
//!
//! A vote is one conditional update through the [`VoteCounter`](crate::VoteCounter)
//! followed by a re-read of the record. The re-read serves both the response
//! and the disambiguation of a zero match:
//!
//! | matched | re-read  | result                                  |
//! |---------|----------|-----------------------------------------|
//! | 1       | found    | Ok, cache invalidated, change published |
//! | 0       | missing  | `NotFound`                              |
//! | 0       | found    | down: `VoteUnchanged`, up: `VoteLimitReached` at the ceiling, else `UnexpectedNoMatch` |
//!
//! The re-read may observe later concurrent votes, so the returned count is
//! at least as fresh as this caller's own write. That snapshot is never
//! written back to the cache: concurrent votes may finish their cache writes
//! in any order, so the record entry is dropped and the next read refills it
//! from the store.

use tracing::debug;
use tracing::error;
use tracing::info;

use super::catalog::not_found;
use super::CryptoCatalog;
use crate::validate_id;
use crate::CryptoCurrency;
use crate::Error;
use crate::Result;
use crate::ServiceError;
use crate::VoteDirection;
use crate::VOTE_TOTAL;

#[derive(Debug, Clone, PartialEq)]
pub struct VoteOutcome {
    pub crypto: CryptoCurrency,
    pub message: String,
}

pub fn success_message(direction: VoteDirection) -> String {
    format!("registered {} successful", direction)
}

impl CryptoCatalog {
    pub async fn vote(
        &self,
        id: &str,
        direction: VoteDirection,
    ) -> Result<VoteOutcome> {
        debug!(id, %direction, "vote received");
        let result = self.apply_vote(id, direction).await;
        VOTE_TOTAL
            .with_label_values(&[direction.as_str(), outcome_label(&result)])
            .inc();
        result
    }

    async fn apply_vote(
        &self,
        id: &str,
        direction: VoteDirection,
    ) -> Result<VoteOutcome> {
        let id = validate_id(id).inspect_err(|e| error!("Params to {} is invalid: {}", direction, e))?;

        let matched = self
            .counter
            .adjust_vote(id, direction)
            .await
            .inspect_err(|e| error!(%id, "{} not registered: {}", direction, e))?;

        let refreshed = self
            .store
            .find_by_id(id)
            .await
            .inspect_err(|e| error!(%id, "crypto not read after {}: {}", direction, e))?;

        let crypto = match (matched, refreshed) {
            (_, None) => {
                error!(%id, "{} on missing crypto", direction);
                return Err(not_found(id));
            }
            (0, Some(record)) => return Err(zero_match(&record, direction)),
            (_, Some(record)) => record,
        };

        self.cache.invalidate_record(&id).await;
        self.notifier.publish(id);

        info!(%id, votes = crypto.votes, "{} registered", direction);
        Ok(VoteOutcome {
            crypto,
            message: success_message(direction),
        })
    }
}

/// Error for a conditional update that matched nothing on an existing record
fn zero_match(
    record: &CryptoCurrency,
    direction: VoteDirection,
) -> Error {
    let id = record.id;
    match direction {
        VoteDirection::Down => {
            info!(%id, "downvote ignored, votes already 0");
            ServiceError::VoteUnchanged { id: id.to_hex() }.into()
        }
        VoteDirection::Up if record.votes == i32::MAX => {
            info!(%id, "upvote ignored, votes at maximum");
            ServiceError::VoteLimitReached { id: id.to_hex() }.into()
        }
        VoteDirection::Up => {
            error!(%id, "upvote matched no crypto although it exists");
            ServiceError::UnexpectedNoMatch {
                id: id.to_hex(),
                operation: direction.as_str(),
            }
            .into()
        }
    }
}

fn outcome_label(result: &Result<VoteOutcome>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(Error::Service(ServiceError::Validation(_))) => "invalid",
        Err(Error::Service(ServiceError::NotFound { .. })) => "not_found",
        Err(Error::Service(ServiceError::VoteUnchanged { .. })) => "unchanged",
        Err(Error::Service(ServiceError::VoteLimitReached { .. })) => "unchanged",
        Err(_) => "error",
    }
}
