//! # celebmatch API
//!
//! REST surface over the celebmatch engine: a welcome route, a top-K match
//! endpoint and a pairwise compare endpoint. Thin plumbing; all decisions
//! live in `celebmatch-core`.

pub mod rest;

pub use rest::{ApiContext, RestApi};
