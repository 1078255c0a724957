//! Embedding types and providers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Error type for embedding operations.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("Embedding failed: {0}")]
    Failed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Embedding result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    /// Vector representation.
    pub vector: Vec<f32>,
    /// Dimension of the embedding.
    pub dimension: usize,
}

impl Embedding {
    pub fn new(vector: Vec<f32>) -> Self {
        let dimension = vector.len();
        Self { vector, dimension }
    }

    /// The all-zero vector of the given dimension.
    pub fn zeros(dimension: usize) -> Self {
        Self::new(vec![0.0; dimension])
    }

    pub fn l2_norm(&self) -> f32 {
        self.vector.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    pub fn is_zero(&self) -> bool {
        self.vector.iter().all(|x| *x == 0.0)
    }

    /// Scale to unit L2 norm. A zero vector is returned unchanged.
    pub fn normalized(mut self) -> Self {
        let norm = self.l2_norm();
        if norm > 0.0 {
            for v in &mut self.vector {
                *v /= norm;
            }
        }
        self
    }

    /// Compute cosine similarity with another embedding.
    pub fn cosine_similarity(&self, other: &[f32]) -> f32 {
        if self.dimension != other.len() {
            return 0.0;
        }

        let dot: f32 = self.vector.iter().zip(other).map(|(a, b)| a * b).sum();
        let norm_a = self.l2_norm();
        let norm_b: f32 = other.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot / (norm_a * norm_b)
    }

    /// Squared Euclidean distance to `other`.
    pub fn squared_l2_distance(&self, other: &[f32]) -> f32 {
        self.vector
            .iter()
            .zip(other)
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }
}

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embedding for text.
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;

    /// Generate embeddings for multiple texts.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    /// Get the embedding dimension.
    fn dimension(&self) -> usize;
}

/// Feature-hashing embedder. Deterministic and dependency-free, but only
/// captures token overlap, not meaning.
pub struct SimpleHashEmbedding {
    dimension: usize,
}

impl SimpleHashEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn hash_text(&self, text: &str) -> Embedding {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut vector = vec![0.0f32; self.dimension];
        if self.dimension == 0 {
            return Embedding::new(vector);
        }

        let tokens = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);

        for token in tokens {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let hash = hasher.finish();

            let bucket = (hash % self.dimension as u64) as usize;
            // High bit picks the sign so unrelated tokens tend to cancel.
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        Embedding::new(vector).normalized()
    }
}

impl Default for SimpleHashEmbedding {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[async_trait]
impl EmbeddingProvider for SimpleHashEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        Ok(self.hash_text(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.hash_text(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
#[path = "embedding_tests.rs"]
mod tests;
