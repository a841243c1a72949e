//! # celebmatch Scrape
//!
//! Twitter timeline client for the celebmatch engine. Implements the
//! [`PostFetcher`](celebmatch_core::PostFetcher) contract: bearer-token
//! auth, `max_id` pagination, per-request timeout, typed failures, no
//! retries.

pub mod client;

pub use client::{TwitterClient, DEFAULT_FETCH_TIMEOUT};
