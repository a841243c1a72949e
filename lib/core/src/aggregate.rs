use crate::{EmbedError, Error, Result, SentenceEncoder, TextCleaner, Vector};
use tracing::debug;

/// Turn a user's raw post history into one representative vector.
///
/// Cleans every post, drops posts that normalize to nothing, batch-encodes
/// the rest and mean-pools the per-post vectors element-wise. The mean is
/// not normalized here; cosine comparison is scale-invariant.
///
/// An empty history, or one where every post cleans to empty text, fails
/// with [`Error::NoContent`] — never a zero vector, which would make cosine
/// similarity undefined downstream.
pub async fn aggregate(
    cleaner: &dyn TextCleaner,
    encoder: &dyn SentenceEncoder,
    username: &str,
    posts: &[String],
) -> Result<Vector> {
    let cleaned: Vec<String> = posts
        .iter()
        .map(|post| cleaner.clean(post))
        .filter(|text| !text.is_empty())
        .collect();

    if cleaned.is_empty() {
        return Err(Error::NoContent(username.to_string()));
    }

    debug!(
        username,
        raw = posts.len(),
        cleaned = cleaned.len(),
        "encoding post batch"
    );

    let vectors = encoder.encode(&cleaned).await?;
    if vectors.len() != cleaned.len() {
        return Err(Error::Embed(EmbedError::BatchShape {
            expected: cleaned.len(),
            actual: vectors.len(),
        }));
    }

    let dim = vectors[0].len();
    if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
        return Err(Error::Embed(EmbedError::DimensionMismatch {
            expected: dim,
            actual: bad.len(),
        }));
    }

    // Vector::mean only fails on empty or ragged input, both excluded above.
    Vector::mean(&vectors).ok_or_else(|| Error::NoContent(username.to_string()))
}
