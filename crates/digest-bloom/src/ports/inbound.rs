//! Inbound Ports (Driving Ports)

use crate::domain::BloomFilter;

/// Approximate set membership over string keys (Driving Port)
///
/// Implementations never report a false negative: after `add(key)`,
/// `query(key)` is true for the lifetime of the filter.
pub trait MembershipFilter {
    /// Insert a key
    fn add(&mut self, key: &str);

    /// Whether the key might have been added
    fn query(&self, key: &str) -> bool;

    /// Estimated number of distinct keys added, `f64::INFINITY` when saturated
    fn approximate_cardinality(&self) -> f64;

    /// Fraction of addressable bits set
    fn fill_ratio(&self) -> f64;
}

impl MembershipFilter for BloomFilter {
    fn add(&mut self, key: &str) {
        BloomFilter::add(self, key);
    }

    fn query(&self, key: &str) -> bool {
        BloomFilter::query(self, key)
    }

    fn approximate_cardinality(&self) -> f64 {
        BloomFilter::approximate_cardinality(self)
    }

    fn fill_ratio(&self) -> f64 {
        BloomFilter::fill_ratio(self)
    }
}
