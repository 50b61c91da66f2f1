//! # Statistical Filter Properties
//!
//! Checks sized filters against their design guarantees using random
//! lowercase words:
//!
//! 1. **False-positive bound**: new keys seen before insertion falsely match
//!    at most `epsilon` of the time
//! 2. **Cardinality estimate**: within 10% of the exact distinct count
//! 3. **Streamed counting**: first-sighting count never exceeds the exact
//!    distinct count
//! 4. **No false negatives**: for both index derivation strategies

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use digest_bloom::{
        BloomFilter, DistinctCounter, FilterConfigBuilder, IndexDerivation, MembershipFilter,
        Metrics,
    };

    use crate::init_test_tracing;
    use crate::workload::{count_exact, random_words, unique_words};

    // =============================================================================
    // FALSE-POSITIVE BOUND
    // =============================================================================

    /// Fraction of fresh keys that already match right before insertion
    fn first_sighting_false_positive_rate(epsilon: f64, n: usize, seed: u64) -> f64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let words = unique_words(n, 12, &mut rng);
        let mut filter = BloomFilter::for_false_positive_rate(epsilon, n).unwrap();

        let mut false_positives = 0usize;
        for word in &words {
            if filter.query(word) {
                false_positives += 1;
            }
            filter.add(word);
        }
        false_positives as f64 / n as f64
    }

    #[test]
    fn test_first_sighting_false_positives_within_epsilon() {
        init_test_tracing();
        let epsilon = 0.01;

        for seed in 1..=3 {
            let rate = first_sighting_false_positive_rate(epsilon, 20_000, seed);
            assert!(
                rate <= epsilon,
                "Trial {}: first-sighting FPR {} exceeds epsilon {}",
                seed,
                rate,
                epsilon
            );
        }
    }

    #[test]
    fn test_full_filter_false_positive_rate() {
        init_test_tracing();
        let epsilon = 0.01;
        let n = 100_000;
        let mut rng = StdRng::seed_from_u64(42);
        let words = unique_words(n + 20_000, 10, &mut rng);
        let (inserted, probes) = words.split_at(n);

        let mut filter = BloomFilter::for_false_positive_rate(epsilon, n).unwrap();
        for word in inserted {
            filter.add(word);
        }

        let hits = probes.iter().filter(|w| filter.query(w)).count();
        let rate = hits as f64 / probes.len() as f64;

        // Design point reached: allow 1.5x statistical and remapping tolerance
        assert!(
            rate <= epsilon * 1.5,
            "FPR {} at design load exceeds 1.5 * {}",
            rate,
            epsilon
        );
    }

    // =============================================================================
    // CARDINALITY ESTIMATE
    // =============================================================================

    #[test]
    fn test_cardinality_estimate_within_ten_percent() {
        init_test_tracing();
        let n = 100_000;
        let mut rng = StdRng::seed_from_u64(2024);
        let words = random_words(n, 5, &mut rng);
        let exact = count_exact(&words) as f64;

        let mut filter = BloomFilter::for_false_positive_rate(0.1, n).unwrap();
        for word in &words {
            filter.add(word);
        }

        let estimate = filter.approximate_cardinality();
        let error = (estimate - exact).abs() / exact;
        assert!(
            error <= 0.1,
            "Estimate {} vs exact {} is off by {:.2}%",
            estimate,
            exact,
            error * 100.0
        );
    }

    // =============================================================================
    // STREAMED COUNTING
    // =============================================================================

    #[test]
    fn test_streamed_distinct_count_is_a_lower_bound() {
        init_test_tracing();
        let n = 100_000;
        let mut rng = StdRng::seed_from_u64(99);
        let words = random_words(n, 5, &mut rng);
        let exact = count_exact(&words) as u64;

        let metrics = Arc::new(Metrics::new());
        let config = FilterConfigBuilder::new()
            .insertions(1 << 20, n)
            .build()
            .unwrap();
        let mut counter = DistinctCounter::from_config(&config, metrics.clone()).unwrap();
        counter.observe_all(&words);

        let streamed = counter.streamed_distinct();
        assert!(streamed > 0);
        assert!(
            streamed <= exact,
            "Streamed count {} exceeds exact {}",
            streamed,
            exact
        );
        assert!(
            streamed as f64 >= exact as f64 * 0.99,
            "Streamed count {} lost too much against exact {}",
            streamed,
            exact
        );

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.keys_added, n as u64);
        assert_eq!(snapshot.keys_new, streamed);
    }

    // =============================================================================
    // NO FALSE NEGATIVES
    // =============================================================================

    fn assert_no_false_negatives<F: MembershipFilter>(filter: &mut F, words: &[String]) {
        for word in words {
            filter.add(word);
            assert!(filter.query(word), "False negative right after adding {}", word);
        }
        for word in words {
            assert!(filter.query(word), "False negative for {}", word);
        }
    }

    #[test]
    fn test_no_false_negatives_for_both_strategies() {
        init_test_tracing();
        let mut rng = StdRng::seed_from_u64(5);
        let words = random_words(5_000, 8, &mut rng);

        for derivation in [IndexDerivation::SlicedDigest, IndexDerivation::MultiHash] {
            let config = FilterConfigBuilder::new()
                .false_positive_rate(0.01, 5_000)
                .derivation(derivation)
                .build()
                .unwrap();
            let mut filter = config.build_filter().unwrap();

            assert_no_false_negatives(&mut filter, &words);
            assert!(filter.fill_ratio() > 0.0 && filter.fill_ratio() <= 1.0);
        }
    }

    #[test]
    fn test_fill_never_decreases_over_workload() {
        let mut rng = StdRng::seed_from_u64(8);
        let words = random_words(2_000, 4, &mut rng);
        let mut filter = BloomFilter::for_insertions(1 << 14, 2_000).unwrap();

        let mut last = 0.0;
        for word in &words {
            filter.add(word);
            let ratio = filter.fill_ratio();
            assert!(ratio >= last && ratio <= 1.0);
            last = ratio;
        }
    }
}
