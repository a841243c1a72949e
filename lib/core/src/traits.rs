use crate::error::{EmbedError, FetchError};
use async_trait::async_trait;

/// Fetches a user's recent post history from the remote platform.
///
/// Implementations own their transport concerns (auth, pagination,
/// timeouts). Retry policy, if any, lives behind this boundary; the matcher
/// never retries.
#[async_trait]
pub trait PostFetcher: Send + Sync {
    async fn fetch_posts(&self, handle: &str) -> Result<Vec<String>, FetchError>;
}

/// Turns a batch of texts into one embedding vector per text.
///
/// Pure given a fixed model version; batched for throughput. Returned
/// vectors must share one dimension.
#[async_trait]
pub trait SentenceEncoder: Send + Sync {
    async fn encode(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;
}

/// Deterministic raw-text normalization applied before encoding.
pub trait TextCleaner: Send + Sync {
    fn clean(&self, text: &str) -> String;
}

/// Identity cleaner, for callers that pre-normalize their own text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCleaner;

impl TextCleaner for NoopCleaner {
    fn clean(&self, text: &str) -> String {
        text.to_string()
    }
}
