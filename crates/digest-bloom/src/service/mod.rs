//! Service Layer
//!
//! Application services orchestrating the domain filter with metrics and
//! logging.

pub mod distinct_counter;

pub use distinct_counter::DistinctCounter;
