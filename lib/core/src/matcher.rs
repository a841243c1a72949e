use crate::store::{fold_username, EmbeddingStore, UserEmbedding};
use crate::{aggregate, EmbedError, Error, PostFetcher, Result, SentenceEncoder, TextCleaner, Vector};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of a pairwise comparison.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarityResult {
    pub subject: String,
    pub candidate: String,
    pub score: f32,
}

/// One scored candidate from a full-store ranking.
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntry {
    pub candidate: String,
    pub score: f32,
}

/// A username resolved to its embedding, either from the store or via the
/// scrape-and-encode path.
struct Resolved {
    username: String,
    vector: Vector,
}

/// Resolves usernames to embeddings and compares them.
///
/// The store is read-only and shared; the fetcher, cleaner and encoder are
/// injected capability contracts so tests can substitute fakes. Vectors
/// resolved through the scrape path live only for the duration of one call;
/// nothing is memoized across requests.
pub struct UserMatcher {
    store: Arc<EmbeddingStore>,
    fetcher: Arc<dyn PostFetcher>,
    cleaner: Arc<dyn TextCleaner>,
    encoder: Arc<dyn SentenceEncoder>,
}

impl UserMatcher {
    pub fn new(
        store: Arc<EmbeddingStore>,
        fetcher: Arc<dyn PostFetcher>,
        cleaner: Arc<dyn TextCleaner>,
        encoder: Arc<dyn SentenceEncoder>,
    ) -> Self {
        Self {
            store,
            fetcher,
            cleaner,
            encoder,
        }
    }

    pub fn store(&self) -> &EmbeddingStore {
        &self.store
    }

    /// Resolve a username: store hit, or scrape + aggregate on miss.
    ///
    /// Every failure on the scrape path comes back wrapped in
    /// [`Error::Resolution`] naming the username, so a two-user comparison
    /// can report which input broke.
    async fn resolve(&self, username: &str) -> Result<Resolved> {
        if let Some(record) = self.store.lookup(username) {
            debug!(username = %record.username, "resolved from store");
            return Ok(Resolved {
                username: record.username.clone(),
                vector: record.vector.clone(),
            });
        }

        info!(username, "not in store, scraping posts");
        let posts = self.fetcher.fetch_posts(username).await.map_err(|e| {
            // Absent from the store and from the platform: that's NotFound,
            // not a transport failure.
            let inner = match e {
                crate::FetchError::UserNotFound(_) => Error::NotFound(username.to_string()),
                other => other.into(),
            };
            Error::resolving(username, inner)
        })?;

        let vector = aggregate(
            self.cleaner.as_ref(),
            self.encoder.as_ref(),
            username,
            &posts,
        )
        .await
        .map_err(|e| Error::resolving(username, e))?;

        if vector.dim() != self.store.dim() {
            return Err(Error::resolving(
                username,
                EmbedError::DimensionMismatch {
                    expected: self.store.dim(),
                    actual: vector.dim(),
                }
                .into(),
            ));
        }

        Ok(Resolved {
            username: username.to_string(),
            vector,
        })
    }

    fn score(&self, a: &Resolved, b: &Resolved) -> Result<SimilarityResult> {
        let score = a.vector.cosine(&b.vector).ok_or_else(|| {
            // Dimensions are equalized at resolution time, so a None here
            // means a zero-magnitude vector.
            if a.vector.norm() == 0.0 {
                Error::DegenerateVector(a.username.clone())
            } else {
                Error::DegenerateVector(b.username.clone())
            }
        })?;
        Ok(SimilarityResult {
            subject: a.username.clone(),
            candidate: b.username.clone(),
            score,
        })
    }

    /// Pairwise comparison. Either side may resolve from the store or via
    /// scraping; a failure on either side fails the whole call with no
    /// partial score.
    pub async fn compare(&self, a: &str, b: &str) -> Result<SimilarityResult> {
        let left = self.resolve(a).await?;
        let right = self.resolve(b).await?;
        self.score(&left, &right)
    }

    /// Compare two distinct store-resident users drawn by seed. Never
    /// triggers scraping.
    pub async fn compare_random_pair(&self, seed: u64) -> Result<SimilarityResult> {
        let picked = self.store.sample(2, seed)?;
        let left = resolved_from(picked[0]);
        let right = resolved_from(picked[1]);
        self.score(&left, &right)
    }

    /// Compare `username` (store or scrape path) with one seeded draw from
    /// the store.
    pub async fn compare_with_random(&self, username: &str, seed: u64) -> Result<SimilarityResult> {
        let subject = self.resolve(username).await?;
        let picked = self.store.sample(1, seed)?;
        let other = resolved_from(picked[0]);
        self.score(&subject, &other)
    }

    /// Score `username` against every record in the store.
    ///
    /// Returns all N entries in store order; ordering and self-match
    /// exclusion are the caller's concern (see [`top_matches`]).
    ///
    /// [`top_matches`]: UserMatcher::top_matches
    pub async fn rank_against_store(&self, username: &str) -> Result<Vec<RankedEntry>> {
        let subject = self.resolve(username).await?;
        if subject.vector.norm() == 0.0 {
            return Err(Error::DegenerateVector(subject.username));
        }

        self.store
            .iter()
            .map(|record| {
                let score = subject
                    .vector
                    .cosine(&record.vector)
                    .ok_or_else(|| Error::DegenerateVector(record.username.clone()))?;
                Ok(RankedEntry {
                    candidate: record.username.clone(),
                    score,
                })
            })
            .collect()
    }

    /// Rank, sort descending and drop the subject's own entry when present.
    ///
    /// The self-match is excluded by case-folded identity, not by blind
    /// first-entry truncation: for a subject outside the store there is no
    /// self-entry, and the true top candidate must survive.
    pub async fn top_matches(&self, username: &str, k: usize) -> Result<Vec<RankedEntry>> {
        let mut entries = self.rank_against_store(username).await?;
        let subject_key = fold_username(username);
        entries.retain(|entry| fold_username(&entry.candidate) != subject_key);
        entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        entries.truncate(k);
        Ok(entries)
    }
}

fn resolved_from(record: &UserEmbedding) -> Resolved {
    Resolved {
        username: record.username.clone(),
        vector: record.vector.clone(),
    }
}
