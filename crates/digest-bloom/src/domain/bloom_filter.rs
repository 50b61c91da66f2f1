//! Core Bloom Filter implementation
//!
//! INVARIANTS:
//! - No false negatives: once `add(key)` ran, `query(key)` returns true
//! - Bits only ever transition 0 -> 1, so `filled_count` never decreases
//! - Every derived index lies in `[0, m)`

use std::fmt;
use std::sync::Arc;

use bitvec::prelude::*;
use tracing::{debug, warn};

use super::hash_functions::{IndexDerivation, IndexStrategy};
use super::parameters::{
    calculate_fpr, estimate_cardinality, optimal_hash_count, required_bits, storage_capacity,
};
use crate::error::FilterError;

/// Bloom filter for probabilistic membership testing of string keys
///
/// The filter addresses `m` bit positions and sets `k` of them per key.
/// Storage is a word-backed bit array rounded up to the next power of two;
/// raw indices are drawn from that power-of-two range and remapped into
/// `[0, m)`.
#[derive(Clone, Debug)]
pub struct BloomFilter {
    /// Bit array, `capacity_bits` long
    bits: BitVec<u64, Lsb0>,
    /// Addressable bits (m)
    m: usize,
    /// Indices per key (k)
    k: usize,
    /// Popcount of `bits`
    filled: usize,
    /// Key -> index derivation
    strategy: Arc<dyn IndexStrategy>,
    derivation: IndexDerivation,
}

impl BloomFilter {
    /// Create a filter with `m` addressable bits and `k` indices per key,
    /// using the sliced-digest derivation.
    ///
    /// # Errors
    /// `InvalidConfiguration` for zero `m`/`k` or storage beyond
    /// `MAX_SIZE_BITS`, `CapacityViolation` when
    /// `k` fields of `log2(nextPowerOfTwo(m))` bits exceed the digest.
    pub fn new(m: usize, k: usize) -> Result<Self, FilterError> {
        Self::with_strategy(m, k, IndexDerivation::SlicedDigest)
    }

    /// Create a filter with an explicit index derivation strategy
    pub fn with_strategy(
        m: usize,
        k: usize,
        derivation: IndexDerivation,
    ) -> Result<Self, FilterError> {
        if k == 0 {
            return Err(FilterError::invalid("hash count must be positive"));
        }

        let capacity = storage_capacity(m)?;
        let bits_per_index = capacity.trailing_zeros().max(1);
        let strategy = derivation.strategy(bits_per_index, k)?;

        debug!(
            m,
            k,
            capacity,
            bits_per_index,
            ?derivation,
            "Created Bloom filter"
        );

        Ok(Self {
            bits: bitvec![u64, Lsb0; 0; capacity],
            m,
            k,
            filled: 0,
            strategy,
            derivation,
        })
    }

    /// Size a filter of `m` bits for `n` expected insertions.
    ///
    /// Uses the optimal hash count `k = ceil(ln(2) * m / n)`.
    pub fn for_insertions(m: usize, n: usize) -> Result<Self, FilterError> {
        let k = optimal_hash_count(m, n)?;
        debug!(m, n, k, "Sized filter for insertions");
        Self::new(m, k)
    }

    /// Size a filter for `n` expected insertions at false positive rate
    /// `epsilon`, then delegate to [`for_insertions`](Self::for_insertions).
    pub fn for_false_positive_rate(epsilon: f64, n: usize) -> Result<Self, FilterError> {
        let m = required_bits(epsilon, n)?;
        debug!(epsilon, n, m, "Sized filter for false positive rate");
        Self::for_insertions(m, n)
    }

    /// Indices in `[0, m)` the key maps to
    pub fn indices(&self, key: &str) -> Vec<usize> {
        self.strategy.indices_within(key, self.m)
    }

    /// Insert a key. Setting an already-set bit is a no-op.
    pub fn add(&mut self, key: &str) {
        for idx in self.strategy.indices_iter(key, self.m) {
            if !self.bits.replace(idx, true) {
                self.filled += 1;
            }
        }
    }

    /// Insert a key, returning whether it was absent beforehand.
    ///
    /// `false` means the filter already reported the key present, which may
    /// be a false positive.
    pub fn add_if_absent(&mut self, key: &str) -> bool {
        let mut absent = false;
        for idx in self.strategy.indices_iter(key, self.m) {
            if !self.bits.replace(idx, true) {
                self.filled += 1;
                absent = true;
            }
        }
        absent
    }

    /// Test if a key might be in the filter
    ///
    /// Returns:
    /// - `true` if the key might be in the set (could be false positive)
    /// - `false` if the key is definitely NOT in the set
    ///
    /// Stops deriving indices at the first unset bit.
    pub fn query(&self, key: &str) -> bool {
        self.strategy
            .indices_iter(key, self.m)
            .all(|idx| self.bits[idx])
    }

    /// Estimate the number of distinct keys added so far.
    ///
    /// Computes `-(m / k) * ln(1 - filled / m)`. Once every addressable bit
    /// is set the estimator saturates and returns `f64::INFINITY`; callers
    /// should read that as "at or beyond capacity".
    pub fn approximate_cardinality(&self) -> f64 {
        let estimate = estimate_cardinality(self.m, self.k, self.filled);
        if estimate.is_infinite() {
            warn!(
                m = self.m,
                k = self.k,
                "Cardinality estimator saturated: every bit is set"
            );
        }
        estimate
    }

    /// True once every addressable bit is set
    pub fn is_saturated(&self) -> bool {
        self.filled >= self.m
    }

    /// Fraction of addressable bits set, in `[0, 1]`
    pub fn fill_ratio(&self) -> f64 {
        self.filled as f64 / self.m as f64
    }

    /// Number of bits set
    pub fn filled_count(&self) -> usize {
        self.filled
    }

    /// Probability that a never-added key queries positive right now
    pub fn estimated_false_positive_rate(&self) -> f64 {
        self.fill_ratio().powi(self.k as i32)
    }

    /// False positive rate the filter reaches after `n` distinct keys
    pub fn false_positive_rate_at(&self, n: usize) -> f64 {
        calculate_fpr(self.m, n, self.k)
    }

    /// Addressable bits (m)
    pub fn size_bits(&self) -> usize {
        self.m
    }

    /// Allocated bits, the next power of two >= m
    pub fn capacity_bits(&self) -> usize {
        self.bits.len()
    }

    /// Indices per key (k)
    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// Index derivation in use
    pub fn derivation(&self) -> IndexDerivation {
        self.derivation
    }

    /// Strategy deriving this filter's indices
    pub fn strategy(&self) -> &dyn IndexStrategy {
        self.strategy.as_ref()
    }
}

impl fmt::Display for BloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "funcs={}, bits={}, fill={}",
            self.k, self.m, self.filled
        )
    }
}
