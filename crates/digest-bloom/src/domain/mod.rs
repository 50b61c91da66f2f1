//! Domain Layer - Pure filter logic
//!
//! This layer contains:
//! - Index derivation (sliced digest and multi-hash strategies)
//! - Core Bloom filter implementation
//! - Closed-form sizing and the cardinality estimator
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Pure functions where possible

pub mod bloom_filter;
pub mod config;
pub mod hash_functions;
pub mod parameters;

pub use bloom_filter::BloomFilter;
pub use config::{FilterConfig, FilterConfigBuilder, Sizing};
pub use hash_functions::{
    HashSplitter, IndexDerivation, IndexStrategy, MultiHasher, DIGEST_BITS, MAX_BITS_PER_INDEX,
    MAX_HASH_COUNT,
};
pub use parameters::{
    calculate_fpr, estimate_cardinality, optimal_hash_count, params_for_false_positive_rate,
    params_for_insertions, required_bits, storage_capacity, FilterParams, MAX_SIZE_BITS,
};
