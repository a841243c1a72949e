use async_trait::async_trait;
use celebmatch_core::{EmbedError, SentenceEncoder};
use std::time::Duration;
use tracing::debug;

/// Default request timeout for the encoder service.
pub const DEFAULT_ENCODE_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for a sentence-encoder HTTP service.
///
/// Speaks the `{"inputs": [...]}` request shape used by
/// text-embeddings-inference style servers and expects a JSON array of
/// float vectors back, one per input, in order.
pub struct RemoteEncoder {
    http: reqwest::Client,
    endpoint: String,
}

impl RemoteEncoder {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, EmbedError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmbedError::Service(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl SentenceEncoder for RemoteEncoder {
    async fn encode(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        debug!(batch = batch.len(), endpoint = %self.endpoint, "encoding batch");
        let response = self
            .http
            .post(&self.endpoint)
            .json(&serde_json::json!({ "inputs": batch }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmbedError::Timeout
                } else {
                    EmbedError::Service(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbedError::Service(format!("status {status}: {body}")));
        }

        let vectors: Vec<Vec<f32>> = response
            .json()
            .await
            .map_err(|e| EmbedError::Service(format!("bad response body: {e}")))?;

        if vectors.len() != batch.len() {
            return Err(EmbedError::BatchShape {
                expected: batch.len(),
                actual: vectors.len(),
            });
        }
        Ok(vectors)
    }
}

/// Deterministic feature-hashing encoder.
///
/// Hashes character trigrams and whole words into a fixed-size vector and
/// normalizes it. No model weights involved, so it runs offline; useful for
/// demos and tests, and replaceable by [`RemoteEncoder`] wherever real
/// semantic quality matters.
pub struct HashingEncoder {
    dim: usize,
}

impl HashingEncoder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    fn encode_one(&self, text: &str) -> Vec<f32> {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut vector = vec![0.0f32; self.dim];
        let normalized = text.to_lowercase();

        let padded = format!("  {normalized}  ");
        let chars: Vec<char> = padded.chars().collect();
        for window in chars.windows(3) {
            let mut hasher = DefaultHasher::new();
            for c in window {
                c.hash(&mut hasher);
            }
            let pos = (hasher.finish() as usize) % self.dim;
            vector[pos] += 1.0;
        }

        // Words weigh more than trigrams.
        for word in normalized.split_whitespace() {
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            let pos = (hasher.finish() as usize) % self.dim;
            vector[pos] += 2.0;
        }

        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for v in &mut vector {
                *v /= magnitude;
            }
        }
        vector
    }
}

#[async_trait]
impl SentenceEncoder for HashingEncoder {
    async fn encode(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(batch.iter().map(|text| self.encode_one(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hashing_encoder_is_deterministic() {
        let encoder = HashingEncoder::new(64);
        let batch = vec!["hello world".to_string()];
        let first = encoder.encode(&batch).await.unwrap();
        let second = encoder.encode(&batch).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_hashing_encoder_output_shape() {
        let encoder = HashingEncoder::new(32);
        let batch = vec!["one".to_string(), "two".to_string()];
        let vectors = encoder.encode(&batch).await.unwrap();
        assert_eq!(vectors.len(), 2);
        assert!(vectors.iter().all(|v| v.len() == 32));
    }

    #[tokio::test]
    async fn test_hashing_encoder_unit_norm() {
        let encoder = HashingEncoder::new(64);
        let vectors = encoder
            .encode(&["some tweet text".to_string()])
            .await
            .unwrap();
        let magnitude: f32 = vectors[0].iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_similar_texts_score_higher() {
        let encoder = HashingEncoder::new(128);
        let batch = vec![
            "the cat sits outside".to_string(),
            "the cat sits inside".to_string(),
            "quarterly earnings report".to_string(),
        ];
        let v = encoder.encode(&batch).await.unwrap();
        let dot = |a: &[f32], b: &[f32]| -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() };
        assert!(dot(&v[0], &v[1]) > dot(&v[0], &v[2]));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let encoder = HashingEncoder::new(16);
        assert!(encoder.encode(&[]).await.unwrap().is_empty());
    }
}
