use std::cmp::Ordering;
use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::CryptoId;
use crate::proto;
use crate::time::format_timestamp;
use crate::time::now_millis;

/// The managed cryptocurrency entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoCurrency {
    pub id: CryptoId,
    pub name: String,
    pub asset_id: String,
    pub price_usd: f64,
    /// Never negative: decrements are conditional on `votes > 0`
    pub votes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable descriptive fields, shared by create and edit requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoFields {
    pub name: String,
    pub asset_id: String,
    pub price_usd: f64,
}

impl CryptoCurrency {
    /// Builds a fresh record with a new id, zero votes and both timestamps
    /// set to now.
    pub fn new(fields: CryptoFields) -> Self {
        let now = now_millis();
        Self {
            id: CryptoId::generate(),
            name: fields.name,
            asset_id: fields.asset_id,
            price_usd: fields.price_usd,
            votes: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn to_proto(&self) -> proto::CryptoCurrency {
        proto::CryptoCurrency {
            id: self.id.to_hex(),
            name: self.name.clone(),
            asset_id: self.asset_id.clone(),
            price_usd: self.price_usd,
            votes: self.votes,
            created_at: format_timestamp(&self.created_at),
            updated_at: format_timestamp(&self.updated_at),
        }
    }
}

impl From<&CryptoCurrency> for proto::CryptoCurrency {
    fn from(c: &CryptoCurrency) -> Self {
        c.to_proto()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Counter delta applied by this direction
    pub fn delta(self) -> i32 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VoteDirection::Up => "upvote",
            VoteDirection::Down => "downvote",
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing sort key. Only the three fields below are sortable; anything
/// else falls back to `Name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    Votes,
    PriceUsd,
}

impl SortField {
    pub fn from_field(field: &str) -> Self {
        match field {
            "votes" => SortField::Votes,
            "price_usd" => SortField::PriceUsd,
            _ => SortField::Name,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Votes => "votes",
            SortField::PriceUsd => "price_usd",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortParams {
    pub field: SortField,
    pub ascending: bool,
}

impl Default for SortParams {
    fn default() -> Self {
        Self {
            field: SortField::Name,
            ascending: true,
        }
    }
}

impl SortParams {
    pub fn new(
        field: SortField,
        ascending: bool,
    ) -> Self {
        Self { field, ascending }
    }

    /// Orders two records by the selected field. Ties are broken by id so
    /// listings are stable across stores.
    pub fn compare(
        &self,
        a: &CryptoCurrency,
        b: &CryptoCurrency,
    ) -> Ordering {
        let ord = match self.field {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Votes => a.votes.cmp(&b.votes),
            SortField::PriceUsd => a.price_usd.total_cmp(&b.price_usd),
        }
        .then_with(|| a.id.cmp(&b.id));

        if self.ascending {
            ord
        } else {
            ord.reverse()
        }
    }

    /// Sorts `records` in place
    pub fn sort(
        &self,
        records: &mut [CryptoCurrency],
    ) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}
