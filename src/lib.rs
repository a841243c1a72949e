//! # celebmatch
//!
//! Match a Twitter (X) account against a precomputed set of celebrity
//! accounts using sentence-embedding similarity.
//!
//! Each known user is represented by one fixed-length vector: the
//! element-wise mean of their recent posts' sentence embeddings. Matching
//! is cosine similarity between those vectors; a username missing from the
//! precomputed store is resolved on demand by scraping its timeline,
//! cleaning the posts and encoding them.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! celebmatch compare BarackObama rihanna --store celebrity-embeddings.csv
//! celebmatch rank BarackObama --top 10 --store celebrity-embeddings.csv
//! celebmatch serve --store celebrity-embeddings.csv --http-port 8080
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use celebmatch::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> celebmatch_core::Result<()> {
//! let store = Arc::new(EmbeddingStore::load("celebrity-embeddings.csv")?);
//! let dim = store.dim();
//! let matcher = UserMatcher::new(
//!     store,
//!     Arc::new(TwitterClient::new("bearer-token", DEFAULT_FETCH_TIMEOUT)
//!         .map_err(celebmatch_core::Error::from)?),
//!     Arc::new(TweetCleaner::new()),
//!     Arc::new(HashingEncoder::new(dim)),
//! );
//! let result = matcher.compare("BarackObama", "rihanna").await?;
//! println!("similarity: {:.4}", result.score);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! - `celebmatch-core` - embedding store, mean-pooling aggregation,
//!   similarity matcher, collaborator contracts
//! - `celebmatch-pipeline` - tweet cleaning, sentence encoders, offline
//!   store preparation
//! - `celebmatch-scrape` - Twitter timeline client
//! - `celebmatch-api` - REST endpoints

// Re-export core types
pub use celebmatch_core::{
    aggregate, DisplayNames, EmbedError, EmbeddingStore, Error, FetchError, PostFetcher,
    RankedEntry, Result, SentenceEncoder, SimilarityResult, TextCleaner, UserEmbedding,
    UserMatcher, Vector,
};

// Re-export pipeline
pub use celebmatch_pipeline::{HashingEncoder, RemoteEncoder, StoreBuilder, TweetCleaner};

// Re-export scraper
pub use celebmatch_scrape::{TwitterClient, DEFAULT_FETCH_TIMEOUT};

// Re-export API
pub use celebmatch_api::{ApiContext, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        aggregate, ApiContext, DisplayNames, EmbeddingStore, Error, HashingEncoder, PostFetcher,
        RankedEntry, RemoteEncoder, RestApi, Result, SentenceEncoder, SimilarityResult,
        StoreBuilder, TextCleaner, TweetCleaner, TwitterClient, UserEmbedding, UserMatcher, Vector,
        DEFAULT_FETCH_TIMEOUT,
    };
}
