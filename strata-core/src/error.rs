//! Shared error type across strata crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for histogram construction, registration and config.
///
/// Only construction-time paths return it. Recording values into a
/// histogram never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The metric identifier violates the `name{tag="value",...}` grammar.
    #[error("invalid metric identifier: {0}")]
    Grammar(String),
    /// Bucket boundaries are NaN, negative, infinite or not strictly increasing.
    #[error("invalid buckets: {0}")]
    InvalidBuckets(String),
    /// A bucket generator was called with arguments outside its domain.
    #[error("invalid bucket parameter: {0}")]
    InvalidParameter(String),
    #[error("histogram {0:?} is already registered")]
    AlreadyRegistered(String),
    #[error("histogram {name:?} is already registered with different buckets")]
    BucketMismatch { name: String },
    #[error("invalid config: {0}")]
    Config(String),
}
