//! # digest-bloom Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── workload.rs       # Random word generator, exact distinct counts
//! └── integration/      # Statistical properties of sized filters
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p digest-bloom-tests
//!
//! # Statistical suite only
//! cargo test -p digest-bloom-tests integration::
//!
//! # Benchmarks
//! cargo bench -p digest-bloom-tests
//! ```


use tracing_subscriber::EnvFilter;

/// Install a test-friendly fmt subscriber honouring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
