//! Request-level operations over the store, cache and notifier.
//!
//! [`CryptoCatalog`] owns the collaborators and implements every RPC
//! operation; the gRPC layer only converts messages and maps errors.

mod catalog;
mod vote;
mod watch;

pub use catalog::*;
pub use vote::*;
pub use watch::*;
