//! # celebmatch Core
//!
//! Core engine for the celebmatch user matcher.
//!
//! This crate provides the matching logic and its data structures:
//!
//! - [`Vector`] - f32 embedding vector with cosine similarity and mean pooling
//! - [`EmbeddingStore`] - read-only table of precomputed user embeddings
//! - [`UserMatcher`] - username resolution and similarity comparison
//! - [`aggregate`] - post history -> single representative vector
//! - [`PostFetcher`] / [`SentenceEncoder`] / [`TextCleaner`] - injected
//!   collaborator contracts for the scraping and encoding boundaries
//!
//! ## Example
//!
//! ```rust,no_run
//! use celebmatch_core::{EmbeddingStore, UserMatcher};
//! use std::sync::Arc;
//!
//! # async fn run(fetcher: Arc<dyn celebmatch_core::PostFetcher>,
//! #              cleaner: Arc<dyn celebmatch_core::TextCleaner>,
//! #              encoder: Arc<dyn celebmatch_core::SentenceEncoder>)
//! #              -> celebmatch_core::Result<()> {
//! let store = Arc::new(EmbeddingStore::load("celebrity-embeddings.csv")?);
//! let matcher = UserMatcher::new(store, fetcher, cleaner, encoder);
//!
//! let result = matcher.compare("BarackObama", "rihanna").await?;
//! println!("{}: {:.4}", result.candidate, result.score);
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod error;
pub mod listing;
pub mod matcher;
pub mod store;
pub mod traits;
pub mod vector;

pub use aggregate::aggregate;
pub use error::{EmbedError, Error, FetchError, Result};
pub use listing::DisplayNames;
pub use matcher::{RankedEntry, SimilarityResult, UserMatcher};
pub use store::{fold_username, EmbeddingStore, UserEmbedding};
pub use traits::{NoopCleaner, PostFetcher, SentenceEncoder, TextCleaner};
pub use vector::Vector;
