//! Crypto Vote Service Error Hierarchy
//!
//! Errors are grouped by the layer that raises them: request-level service
//! outcomes (validation, missing records, vote floor) and infrastructure
//! failures (store, cache, network). Every error maps onto exactly one gRPC
//! status code through `From<Error> for tonic::Status`.

use config::ConfigError;
use tokio::task::JoinError;
use tonic::Status;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Infrastructure-level failures (storage, cache, network)
    #[error(transparent)]
    System(#[from] SystemError),

    /// Configuration loading or validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Request-level outcomes reported back to the caller
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Unrecoverable failures requiring process termination
    #[error("Fatal error: {0}")]
    Fatal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed or missing input, never retried
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The record does not exist
    #[error("crypto not found: {id}")]
    NotFound { id: String },

    /// Conditional decrement matched nothing because the counter is already zero
    #[error("unchanged crypto because vote = 0")]
    VoteUnchanged { id: String },

    /// Conditional increment matched nothing because the counter is at its maximum
    #[error("unchanged crypto because vote limit is reached")]
    VoteLimitReached { id: String },

    /// A write that must always match an existing record matched nothing
    #[error("{operation} matched no crypto although {id} exists")]
    UnexpectedNoMatch { id: String, operation: &'static str },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("id is invalid: {0}")]
    InvalidId(String),

    #[error("name is invalid: {0}")]
    InvalidName(String),

    #[error("asset_id is invalid: {0}")]
    InvalidAssetId(String),

    #[error("price_usd is invalid: {0}")]
    InvalidPrice(String),

    #[error("field is invalid: {0}")]
    InvalidSortField(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Cache operation failed: {0}")]
    Cache(#[from] CacheError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Server failed to start: {0}")]
    ServerStartFailed(String),

    #[error("General server error: {0}")]
    GeneralServer(String),

    #[error("Internal server error")]
    ServerUnavailable,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Embedded database errors
    #[error("Embedded database error: {0}")]
    Db(String),

    /// Record encoding/decoding failures
    #[error(transparent)]
    Serialization(#[from] bincode::Error),

    /// Disk I/O failures
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Initial data import failures
    #[error("Import failed: {0}")]
    Import(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(String),

    #[error("Cache serialization error: {0}")]
    Serialization(String),
}

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// gRPC transport layer errors
    #[error(transparent)]
    TonicError(#[from] Box<tonic::transport::Error>),

    #[error("Background task failed: {0}")]
    TaskFailed(#[from] JoinError),

    #[error("{0}")]
    SignalSendFailed(String),
}

// ============== Conversion Implementations ============== //
impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Error::System(SystemError::Storage(e))
    }
}

impl From<CacheError> for Error {
    fn from(e: CacheError) -> Self {
        Error::System(SystemError::Cache(e))
    }
}

impl From<NetworkError> for Error {
    fn from(e: NetworkError) -> Self {
        Error::System(SystemError::Network(e))
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Error::Service(ServiceError::Validation(e))
    }
}

impl From<sled::Error> for Error {
    fn from(err: sled::Error) -> Self {
        StorageError::Db(err.to_string()).into()
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        StorageError::Serialization(err).into()
    }
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Redis(err.to_string())
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

impl From<tonic::transport::Error> for Error {
    fn from(err: tonic::transport::Error) -> Self {
        NetworkError::TonicError(Box::new(err)).into()
    }
}

impl From<JoinError> for Error {
    fn from(err: JoinError) -> Self {
        NetworkError::TaskFailed(err).into()
    }
}

// ============== gRPC status mapping ============== //
impl From<Error> for Status {
    fn from(err: Error) -> Self {
        match err {
            Error::Service(ServiceError::Validation(e)) => Status::invalid_argument(e.to_string()),
            Error::Service(ServiceError::NotFound { id }) => Status::not_found(format!("crypto not found: {}", id)),
            Error::Service(e @ ServiceError::VoteUnchanged { .. }) => Status::failed_precondition(e.to_string()),
            Error::Service(e @ ServiceError::VoteLimitReached { .. }) => Status::failed_precondition(e.to_string()),
            other => Status::internal(other.to_string()),
        }
    }
}

impl Error {
    /// True when the error reports a missing record
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Service(ServiceError::NotFound { .. }))
    }
}
