//! Analysis modules.
//!
//! Aggregations computed over fetched records.

pub mod aggregator;

pub use aggregator::*;
