//! Metrics hooks for Bloom filter operations
//!
//! ## Usage
//!
//! ```
//! use digest_bloom::metrics::Metrics;
//! use std::time::Duration;
//!
//! let metrics = Metrics::new();
//! metrics.record_filter_created(1000, 1024, 7);
//! metrics.record_add(Duration::from_nanos(250), true);
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.keys_added, 1);
//! assert_eq!(snapshot.bits_addressable, 1000);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics collector for Bloom filter operations
///
/// Thread-safe counters for monitoring filter usage.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Total filters created
    pub filters_created: AtomicU64,
    /// Bits allocated across all filters (power-of-two capacity)
    pub bits_allocated: AtomicU64,
    /// Addressable bits (m) across all filters
    pub bits_addressable: AtomicU64,
    /// Largest hash count (k) of any filter created
    pub max_hash_count: AtomicU64,
    /// Total keys added
    pub keys_added: AtomicU64,
    /// Adds whose key was not already reported present
    pub keys_new: AtomicU64,
    /// Total queries performed
    pub queries_performed: AtomicU64,
    /// Total positive queries (possibly false positives)
    pub queries_positive: AtomicU64,
    /// Cumulative add time in nanoseconds
    pub add_time_ns: AtomicU64,
    /// Cumulative query time in nanoseconds
    pub query_time_ns: AtomicU64,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record filter creation
    pub fn record_filter_created(&self, size_bits: usize, capacity_bits: usize, hash_count: usize) {
        self.filters_created.fetch_add(1, Ordering::Relaxed);
        self.bits_allocated
            .fetch_add(capacity_bits as u64, Ordering::Relaxed);
        self.bits_addressable
            .fetch_add(size_bits as u64, Ordering::Relaxed);
        self.max_hash_count
            .fetch_max(hash_count as u64, Ordering::Relaxed);
    }

    /// Record a key insertion
    ///
    /// # Arguments
    /// * `duration` - Time taken for the add
    /// * `new_key` - Whether the key was absent beforehand
    pub fn record_add(&self, duration: Duration, new_key: bool) {
        self.keys_added.fetch_add(1, Ordering::Relaxed);
        self.add_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        if new_key {
            self.keys_new.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a query
    pub fn record_query(&self, duration: Duration, found: bool) {
        self.queries_performed.fetch_add(1, Ordering::Relaxed);
        self.query_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        if found {
            self.queries_positive.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            filters_created: self.filters_created.load(Ordering::Relaxed),
            bits_allocated: self.bits_allocated.load(Ordering::Relaxed),
            bits_addressable: self.bits_addressable.load(Ordering::Relaxed),
            max_hash_count: self.max_hash_count.load(Ordering::Relaxed),
            keys_added: self.keys_added.load(Ordering::Relaxed),
            keys_new: self.keys_new.load(Ordering::Relaxed),
            queries_performed: self.queries_performed.load(Ordering::Relaxed),
            queries_positive: self.queries_positive.load(Ordering::Relaxed),
            avg_add_ns: average(&self.add_time_ns, &self.keys_added),
            avg_query_ns: average(&self.query_time_ns, &self.queries_performed),
        }
    }

    /// Ratio of positive queries to total queries.
    ///
    /// Includes true positives as well as false positives.
    pub fn observed_positive_rate(&self) -> f64 {
        let total = self.queries_performed.load(Ordering::Relaxed);
        let positive = self.queries_positive.load(Ordering::Relaxed);
        if total > 0 {
            positive as f64 / total as f64
        } else {
            0.0
        }
    }
}

fn average(total_ns: &AtomicU64, count: &AtomicU64) -> u64 {
    let total = total_ns.load(Ordering::Relaxed);
    let count = count.load(Ordering::Relaxed);
    if count > 0 {
        total / count
    } else {
        0
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub filters_created: u64,
    pub bits_allocated: u64,
    pub bits_addressable: u64,
    pub max_hash_count: u64,
    pub keys_added: u64,
    pub keys_new: u64,
    pub queries_performed: u64,
    pub queries_positive: u64,
    pub avg_add_ns: u64,
    pub avg_query_ns: u64,
}

/// Trait for custom metrics recording implementations
pub trait MetricsRecorder: Send + Sync {
    /// Record filter creation
    fn record_filter_created(&self, size_bits: usize, capacity_bits: usize, hash_count: usize);

    /// Record a key insertion
    fn record_add(&self, duration: Duration, new_key: bool);

    /// Record a query
    fn record_query(&self, duration: Duration, found: bool);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_filter_created(&self, _: usize, _: usize, _: usize) {}
    fn record_add(&self, _: Duration, _: bool) {}
    fn record_query(&self, _: Duration, _: bool) {}
}

impl MetricsRecorder for Metrics {
    fn record_filter_created(&self, size_bits: usize, capacity_bits: usize, hash_count: usize) {
        Metrics::record_filter_created(self, size_bits, capacity_bits, hash_count);
    }

    fn record_add(&self, duration: Duration, new_key: bool) {
        Metrics::record_add(self, duration, new_key);
    }

    fn record_query(&self, duration: Duration, found: bool) {
        Metrics::record_query(self, duration, found);
    }
}

impl<R: MetricsRecorder + ?Sized> MetricsRecorder for std::sync::Arc<R> {
    fn record_filter_created(&self, size_bits: usize, capacity_bits: usize, hash_count: usize) {
        (**self).record_filter_created(size_bits, capacity_bits, hash_count);
    }

    fn record_add(&self, duration: Duration, new_key: bool) {
        (**self).record_add(duration, new_key);
    }

    fn record_query(&self, duration: Duration, found: bool) {
        (**self).record_query(duration, found);
    }
}
