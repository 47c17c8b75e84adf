//! Catalog API access.
//!
//! This module provides the fetcher that queries the product catalog and
//! the error taxonomy for its failures.

pub mod client;
pub mod error;
pub mod query;

pub use client::{Fetcher, HttpTransport, Transport, DEFAULT_ENDPOINT};
