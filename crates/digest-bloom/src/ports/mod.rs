//! Ports Layer
//!
//! Defines the driving interface callers program against, implemented by
//! both the bare [`BloomFilter`](crate::BloomFilter) and the metered
//! [`DistinctCounter`](crate::DistinctCounter).

pub mod inbound;

pub use inbound::MembershipFilter;
