//! Session persistence
//!
//! Token material is written under the client's namespace so that an API
//! client sharing the same storage can attach an `Authorization` header.

pub mod keys;
pub mod store;

pub use keys::{SessionKeys, SESSION_NAMESPACE};
pub use store::{SessionStore, StoredSession};

use crate::storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// A token lacked the claim its storage key is built from
    #[error("{token} is missing the '{claim}' claim")]
    MissingClaim {
        token: &'static str,
        claim: &'static str,
    },
    /// The storage medium rejected a read or a write
    #[error(transparent)]
    Storage(#[from] StorageError),
}
