//! Filter configuration and validation
//!
//! # Example
//!
//! ```
//! use digest_bloom::{FilterConfigBuilder, IndexDerivation};
//!
//! let config = FilterConfigBuilder::new()
//!     .false_positive_rate(0.01, 10_000)
//!     .derivation(IndexDerivation::SlicedDigest)
//!     .build()
//!     .expect("Valid config");
//!
//! let filter = config.build_filter().expect("Valid filter");
//! assert_eq!(filter.hash_count(), 7);
//! ```

use serde::{Deserialize, Serialize};

use super::bloom_filter::BloomFilter;
use super::hash_functions::IndexDerivation;
use super::parameters::{
    calculate_fpr, params_for_false_positive_rate, params_for_insertions, storage_capacity,
    FilterParams,
};
use crate::error::FilterError;

/// How a filter's `(m, k)` pair is chosen
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Sizing {
    /// Explicit bit count and hash count
    Explicit { bits: usize, hashes: usize },
    /// Bit count given, hash count optimal for the expected insertions
    Insertions {
        bits: usize,
        expected_insertions: usize,
    },
    /// Bit and hash count derived from a target false positive rate
    FalsePositiveRate {
        epsilon: f64,
        expected_insertions: usize,
    },
}

impl Sizing {
    /// Resolve the sizing into concrete parameters
    pub fn params(&self) -> Result<FilterParams, FilterError> {
        match *self {
            Sizing::Explicit { bits, hashes } => {
                if bits == 0 || hashes == 0 {
                    return Err(FilterError::invalid(
                        "explicit sizing needs positive bits and hashes",
                    ));
                }
                Ok(FilterParams {
                    size_bits: bits,
                    hash_count: hashes,
                    expected_fpr: calculate_fpr(bits, 0, hashes),
                })
            }
            Sizing::Insertions {
                bits,
                expected_insertions,
            } => params_for_insertions(bits, expected_insertions),
            Sizing::FalsePositiveRate {
                epsilon,
                expected_insertions,
            } => params_for_false_positive_rate(epsilon, expected_insertions),
        }
    }
}

/// Filter configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Sizing rule
    pub sizing: Sizing,
    /// Index derivation strategy
    #[serde(default)]
    pub derivation: IndexDerivation,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            sizing: Sizing::FalsePositiveRate {
                epsilon: 0.01,
                expected_insertions: 10_000,
            },
            derivation: IndexDerivation::SlicedDigest,
        }
    }
}

impl FilterConfig {
    /// Create a new configuration with validation
    pub fn new(sizing: Sizing, derivation: IndexDerivation) -> Result<Self, FilterError> {
        let config = Self { sizing, derivation };
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON configuration and validate it
    pub fn from_json_str(json: &str) -> Result<Self, FilterError> {
        let config: FilterConfig = serde_json::from_str(json)
            .map_err(|e| FilterError::invalid(format!("malformed config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Run every construction-time check without allocating the filter
    pub fn validate(&self) -> Result<(), FilterError> {
        let params = self.sizing.params()?;
        let capacity = storage_capacity(params.size_bits)?;
        self.derivation
            .strategy(capacity.trailing_zeros().max(1), params.hash_count)?;
        Ok(())
    }

    /// Resolved `(m, k)` parameters
    pub fn params(&self) -> Result<FilterParams, FilterError> {
        self.sizing.params()
    }

    /// Build an empty filter from this configuration
    pub fn build_filter(&self) -> Result<BloomFilter, FilterError> {
        let params = self.sizing.params()?;
        BloomFilter::with_strategy(params.size_bits, params.hash_count, self.derivation)
    }
}

/// Builder for FilterConfig with validation
#[derive(Default)]
pub struct FilterConfigBuilder {
    sizing: Option<Sizing>,
    derivation: Option<IndexDerivation>,
}

impl FilterConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit bit count and hash count
    pub fn explicit(mut self, bits: usize, hashes: usize) -> Self {
        self.sizing = Some(Sizing::Explicit { bits, hashes });
        self
    }

    /// Use a fixed bit count sized for `expected_insertions`
    pub fn insertions(mut self, bits: usize, expected_insertions: usize) -> Self {
        self.sizing = Some(Sizing::Insertions {
            bits,
            expected_insertions,
        });
        self
    }

    /// Size for a target false positive rate
    pub fn false_positive_rate(mut self, epsilon: f64, expected_insertions: usize) -> Self {
        self.sizing = Some(Sizing::FalsePositiveRate {
            epsilon,
            expected_insertions,
        });
        self
    }

    /// Set the index derivation strategy
    pub fn derivation(mut self, derivation: IndexDerivation) -> Self {
        self.derivation = Some(derivation);
        self
    }

    /// Build the FilterConfig, validating all parameters
    pub fn build(self) -> Result<FilterConfig, FilterError> {
        let defaults = FilterConfig::default();

        FilterConfig::new(
            self.sizing.unwrap_or(defaults.sizing),
            self.derivation.unwrap_or(defaults.derivation),
        )
    }
}
