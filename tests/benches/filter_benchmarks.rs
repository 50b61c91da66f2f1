//! # digest-bloom Benchmarks
//!
//! | Operation | Claim |
//! |-----------|-------|
//! | add | O(k) bit sets, one SHA-512 digest (sliced) or k digests (multi-hash) |
//! | query | O(k), short-circuits on the first unset bit |
//! | approximate_cardinality | O(1), popcount is maintained on add |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

use digest_bloom::{BloomFilter, IndexDerivation};
use digest_bloom_tests::workload::random_words;

fn filled_filter(derivation: IndexDerivation, words: &[String]) -> BloomFilter {
    let mut filter = BloomFilter::with_strategy(958_505, 7, derivation).unwrap();
    for word in words {
        filter.add(word);
    }
    filter
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("digest-bloom/add");
    group.measurement_time(Duration::from_secs(5));

    let mut rng = StdRng::seed_from_u64(1);
    let words = random_words(1_000, 8, &mut rng);
    group.throughput(Throughput::Elements(words.len() as u64));

    for derivation in [IndexDerivation::SlicedDigest, IndexDerivation::MultiHash] {
        group.bench_with_input(
            BenchmarkId::new("bulk_add_1000", format!("{:?}", derivation)),
            &derivation,
            |b, &derivation| {
                b.iter(|| black_box(filled_filter(derivation, &words)));
            },
        );
    }

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("digest-bloom/query");
    group.measurement_time(Duration::from_secs(5));

    let mut rng = StdRng::seed_from_u64(2);
    let inserted = random_words(10_000, 8, &mut rng);
    let absent = random_words(1_000, 9, &mut rng);
    let filter = filled_filter(IndexDerivation::SlicedDigest, &inserted);

    group.bench_function("query_present", |b| {
        b.iter(|| black_box(filter.query(&inserted[0])))
    });

    group.bench_function("query_absent", |b| {
        b.iter(|| black_box(filter.query(&absent[0])))
    });

    group.throughput(Throughput::Elements(absent.len() as u64));
    group.bench_function("bulk_query_absent_1000", |b| {
        b.iter(|| absent.iter().filter(|w| filter.query(w)).count())
    });

    group.finish();
}

fn bench_sizing_and_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("digest-bloom/sizing");

    group.bench_function("for_false_positive_rate_100k", |b| {
        b.iter(|| BloomFilter::for_false_positive_rate(black_box(0.01), black_box(100_000)))
    });

    let mut rng = StdRng::seed_from_u64(3);
    let words = random_words(50_000, 5, &mut rng);
    let filter = filled_filter(IndexDerivation::SlicedDigest, &words);
    group.bench_function("approximate_cardinality", |b| {
        b.iter(|| black_box(filter.approximate_cardinality()))
    });

    group.finish();
}

criterion_group!(benches, bench_add, bench_query, bench_sizing_and_estimate);
criterion_main!(benches);
