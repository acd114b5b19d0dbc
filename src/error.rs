//! Error types for the cache store
//!
//! Provides unified error handling using thiserror.
//!
//! Ordinary misses are not errors: absent or expired keys are reported
//! through return values (`None`, `false`). The variants here cover the
//! cases where a caller handed the store something it cannot act on.

use thiserror::Error;

// == Store Error Enum ==
/// Unified error type for the cache store.
///
/// The enum is `Clone` so the outcome of a failed deferred computation
/// can be handed to every caller waiting on the same key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// TTL minute count was negative, NaN, or infinite
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    /// Numeric operation requested on a non-numeric stored value
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// A caller-supplied computation failed
    #[error("Computation failed: {0}")]
    Compute(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache store.
pub type Result<T> = std::result::Result<T, StoreError>;
