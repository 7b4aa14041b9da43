//! Error types for bytetrie

use std::collections::TryReserveError;

use smallvec::CollectionAllocErr;
use thiserror::Error;

/// Result type alias for fallible trie operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while growing a trie or walking it.
///
/// Every variant is an allocation-class failure. A missing key or an
/// unmatched prefix is never reported through this type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),

    #[error("key buffer allocation failed: {0:?}")]
    KeyBuffer(CollectionAllocErr),

    #[error("node limit of {limit} reached")]
    NodeLimit { limit: usize },
}

impl Error {
    /// Whether this error came from a refused allocation.
    ///
    /// Always true today; callers that only care about "out of memory"
    /// should test this rather than matching variants.
    pub fn is_allocation(&self) -> bool {
        matches!(
            self,
            Error::Alloc(_) | Error::KeyBuffer(_) | Error::NodeLimit { .. }
        )
    }
}

impl From<CollectionAllocErr> for Error {
    fn from(err: CollectionAllocErr) -> Self {
        Error::KeyBuffer(err)
    }
}
