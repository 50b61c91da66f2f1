//! Error types for the digest-bloom filter

use thiserror::Error;

/// Errors raised while configuring a filter or its index derivation.
///
/// Every variant is produced eagerly at construction time. Once a
/// [`BloomFilter`](crate::BloomFilter) exists, `add` and `query` cannot fail.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("Invalid filter configuration: {0}")]
    InvalidConfiguration(String),

    #[error(
        "Digest capacity exceeded: {count} indices of {bits_per_index} bits do not fit in a {digest_bits}-bit digest"
    )]
    CapacityViolation {
        bits_per_index: u32,
        count: usize,
        digest_bits: usize,
    },
}

impl FilterError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        FilterError::InvalidConfiguration(reason.into())
    }
}
