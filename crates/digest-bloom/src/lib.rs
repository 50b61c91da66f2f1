//! # digest-bloom
//!
//! Bloom filter over string keys with SHA-512 index derivation, closed-form
//! sizing and a distinct-count estimator.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure filter logic, no I/O
//!   - `HashSplitter`: slices one SHA-512 digest into `k` bit-field indices
//!   - `MultiHasher`: alternative strategy, one seeded digest per index
//!   - `BloomFilter`: bit array, add/query, cardinality estimate
//!   - `FilterConfig`: serde-backed configuration with validation
//!
//! - **Ports Layer** (`ports/`): `MembershipFilter` driving port
//!
//! - **Service Layer** (`service/`): `DistinctCounter`, streams keys through
//!   a filter with metrics and logging
//!
//! ## Invariants
//!
//! - No false negatives: if added, `query()` MUST return true
//! - Fill is monotonic: bits are never cleared
//! - `HashSplitter` shapes needing more than 512 digest bits are rejected at
//!   construction
//!
//! ## Usage Example
//!
//! ```
//! use digest_bloom::BloomFilter;
//!
//! let mut filter = BloomFilter::for_false_positive_rate(0.01, 1_000)?;
//! filter.add("0xABCD");
//!
//! assert!(filter.query("0xABCD"));
//! assert!(filter.approximate_cardinality() > 0.5);
//! # Ok::<(), digest_bloom::FilterError>(())
//! ```

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use domain::{
    BloomFilter, FilterConfig, FilterConfigBuilder, FilterParams, HashSplitter, IndexDerivation,
    IndexStrategy, MultiHasher, Sizing,
};
pub use error::FilterError;
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::MembershipFilter;
pub use service::DistinctCounter;
