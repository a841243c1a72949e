//! # celebmatch Pipeline
//!
//! Text-side collaborators for the celebmatch engine:
//!
//! - [`TweetCleaner`] - deterministic tweet normalization (mentions, URLs,
//!   hashtags, emoticons, emoji)
//! - [`RemoteEncoder`] - sentence-encoder HTTP service client
//! - [`HashingEncoder`] - deterministic offline feature-hashing encoder
//! - [`StoreBuilder`] - offline preparation of the embedding table from
//!   per-user post files

pub mod clean;
pub mod encoder;
pub mod prepare;

pub use clean::TweetCleaner;
pub use encoder::{HashingEncoder, RemoteEncoder, DEFAULT_ENCODE_TIMEOUT};
pub use prepare::{PrepareError, PrepareSummary, StoreBuilder};
