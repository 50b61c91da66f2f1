//! Distinct Counter Service
//!
//! Streams keys through a Bloom filter and counts how many of them are new.
//! A key counts as new when the filter did not already report it present,
//! so the streamed count never exceeds the exact number of distinct keys;
//! false positives make it undercount. The analytical estimator on the
//! filter's fill gives a second, unbiased-in-expectation answer.

use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::domain::{BloomFilter, FilterConfig};
use crate::error::FilterError;
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::MembershipFilter;

/// Approximate distinct-key counter backed by a [`BloomFilter`]
pub struct DistinctCounter<R: MetricsRecorder = NoOpMetrics> {
    filter: BloomFilter,
    recorder: R,
    /// Keys passed to `observe`
    observed: u64,
    /// Keys the filter reported absent at observation time
    streamed_distinct: u64,
    /// Set once the filter saturates, so the warning fires once
    saturated: bool,
}

impl DistinctCounter<NoOpMetrics> {
    /// Counter without metrics
    pub fn unmetered(filter: BloomFilter) -> Self {
        Self::new(filter, NoOpMetrics)
    }
}

impl<R: MetricsRecorder> DistinctCounter<R> {
    /// Wrap an existing filter
    pub fn new(filter: BloomFilter, recorder: R) -> Self {
        recorder.record_filter_created(
            filter.size_bits(),
            filter.capacity_bits(),
            filter.hash_count(),
        );
        Self {
            filter,
            recorder,
            observed: 0,
            streamed_distinct: 0,
            saturated: false,
        }
    }

    /// Build the filter from a validated configuration
    pub fn from_config(config: &FilterConfig, recorder: R) -> Result<Self, FilterError> {
        let filter = config.build_filter()?;
        debug!(filter = %filter, "Distinct counter ready");
        Ok(Self::new(filter, recorder))
    }

    /// Observe one key, returning whether it was counted as new
    pub fn observe(&mut self, key: &str) -> bool {
        let start = Instant::now();
        let new_key = self.filter.add_if_absent(key);
        self.recorder.record_add(start.elapsed(), new_key);

        self.observed += 1;
        if new_key {
            self.streamed_distinct += 1;
        }
        trace!(key, new_key, "Observed key");

        if !self.saturated && self.filter.is_saturated() {
            self.saturated = true;
            warn!(
                observed = self.observed,
                filter = %self.filter,
                "Filter saturated, every further key will look familiar"
            );
        }
        new_key
    }

    /// Observe every key of an iterator, returning how many were new
    pub fn observe_all<I, S>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keys.into_iter()
            .filter(|key| self.observe(key.as_ref()))
            .count()
    }

    /// Query without recording an observation
    pub fn contains(&self, key: &str) -> bool {
        let start = Instant::now();
        let found = self.filter.query(key);
        self.recorder.record_query(start.elapsed(), found);
        found
    }

    /// Total keys observed, duplicates included
    pub fn observed(&self) -> u64 {
        self.observed
    }

    /// Keys counted as new while streaming; never above the exact count
    pub fn streamed_distinct(&self) -> u64 {
        self.streamed_distinct
    }

    /// Distinct count from the filter's fill ratio
    pub fn estimated_distinct(&self) -> f64 {
        self.filter.approximate_cardinality()
    }

    /// Underlying filter
    pub fn filter(&self) -> &BloomFilter {
        &self.filter
    }

    /// Metrics recorder
    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    /// Consume the counter, returning the filter
    pub fn into_filter(self) -> BloomFilter {
        self.filter
    }
}

impl<R: MetricsRecorder> MembershipFilter for DistinctCounter<R> {
    fn add(&mut self, key: &str) {
        self.observe(key);
    }

    fn query(&self, key: &str) -> bool {
        self.contains(key)
    }

    fn approximate_cardinality(&self) -> f64 {
        self.estimated_distinct()
    }

    fn fill_ratio(&self) -> f64 {
        self.filter.fill_ratio()
    }
}
