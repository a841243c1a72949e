use serde::{Deserialize, Serialize};

/// A fixed-length embedding vector of f32 components.
///
/// All similarity math stays in f32, the precision the store persists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Dot product with another vector of the same dimension.
    #[inline]
    pub fn dot(&self, other: &Vector) -> f32 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Euclidean norm.
    #[inline]
    pub fn norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Cosine similarity with another vector.
    ///
    /// Returns `None` when the dimensions disagree or either vector has zero
    /// magnitude; the caller decides which typed error that maps to.
    #[inline]
    pub fn cosine(&self, other: &Vector) -> Option<f32> {
        if self.dim() != other.dim() {
            return None;
        }

        let norm_a = self.norm();
        let norm_b = other.norm();
        if norm_a == 0.0 || norm_b == 0.0 {
            return None;
        }

        Some(self.dot(other) / (norm_a * norm_b))
    }

    /// Element-wise arithmetic mean of a non-empty batch of equal-length
    /// vectors. Returns `None` for an empty batch or ragged dimensions.
    pub fn mean(vectors: &[Vec<f32>]) -> Option<Vector> {
        let first = vectors.first()?;
        let dim = first.len();
        if vectors.iter().any(|v| v.len() != dim) {
            return None;
        }

        let mut acc = vec![0.0f32; dim];
        for v in vectors {
            for (slot, x) in acc.iter_mut().zip(v.iter()) {
                *slot += x;
            }
        }
        let count = vectors.len() as f32;
        for slot in &mut acc {
            *slot /= count;
        }
        Some(Vector::new(acc))
    }

    /// True when every component is a finite number.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical() {
        let v1 = Vector::new(vec![1.0, 0.0]);
        let v2 = Vector::new(vec![1.0, 0.0]);
        assert!((v1.cosine(&v2).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let v1 = Vector::new(vec![1.0, 0.0]);
        let v2 = Vector::new(vec![0.0, 1.0]);
        assert!(v1.cosine(&v2).unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite() {
        let v1 = Vector::new(vec![1.0, 2.0]);
        let v2 = Vector::new(vec![-1.0, -2.0]);
        assert!((v1.cosine(&v2).unwrap() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_magnitude_is_none() {
        let v1 = Vector::new(vec![0.0, 0.0]);
        let v2 = Vector::new(vec![1.0, 1.0]);
        assert!(v1.cosine(&v2).is_none());
    }

    #[test]
    fn test_cosine_dim_mismatch_is_none() {
        let v1 = Vector::new(vec![1.0, 0.0, 0.0]);
        let v2 = Vector::new(vec![1.0, 0.0]);
        assert!(v1.cosine(&v2).is_none());
    }

    #[test]
    fn test_mean_pooling() {
        let pooled = Vector::mean(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        assert_eq!(pooled.as_slice(), &[0.5, 0.5]);
    }

    #[test]
    fn test_mean_empty_is_none() {
        assert!(Vector::mean(&[]).is_none());
    }

    #[test]
    fn test_mean_ragged_is_none() {
        assert!(Vector::mean(&[vec![1.0], vec![1.0, 2.0]]).is_none());
    }
}
