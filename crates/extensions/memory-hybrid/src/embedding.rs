//! Embedding providers for hybrid search.
//!
//! [`OpenAIEmbedding`] talks to any OpenAI-compatible `/embeddings` endpoint.
//! [`NormalizedEmbedder`] wraps a provider so every call yields a unit-length
//! vector of the configured dimension, falling back to the zero vector.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use membank_memory_vector::{Embedding, EmbeddingError, EmbeddingProvider};

/// Default embedding dimension.
pub const DEFAULT_DIMENSION: usize = 1024;

/// Configuration for OpenAI embeddings.
#[derive(Debug, Clone)]
pub struct OpenAIEmbeddingConfig {
    pub api_key: String,
    /// Model to use (default: text-embedding-3-small).
    pub model: String,
    /// Base URL for API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Requested output dimension.
    pub dimension: usize,
}

impl OpenAIEmbeddingConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "text-embedding-3-small".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            dimension: DEFAULT_DIMENSION,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set custom base URL (for compatible self-hosted servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_dimension(mut self, dim: usize) -> Self {
        self.dimension = dim;
        self
    }
}

/// OpenAI-compatible HTTP embedding provider.
pub struct OpenAIEmbedding {
    client: reqwest::Client,
    config: OpenAIEmbeddingConfig,
}

impl OpenAIEmbedding {
    pub fn new(config: OpenAIEmbeddingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [&'a str],
    model: &'a str,
    dimensions: usize,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        self.embed_batch(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::Failed("Empty response".to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let request = EmbeddingRequest {
            input: texts,
            model: &self.config.model,
            dimensions: self.config.dimension,
        };

        let url = format!("{}/embeddings", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbeddingError::Failed(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EmbeddingError::Failed(format!("API error {}: {}", status, body)));
        }

        let mut parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Failed(format!("Parse error: {}", e)))?;

        if parsed.data.len() != texts.len() {
            return Err(EmbeddingError::Failed(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        parsed.data.sort_by_key(|d| d.index);
        debug!("Generated {} embeddings", parsed.data.len());

        Ok(parsed
            .data
            .into_iter()
            .map(|d| Embedding::new(d.embedding))
            .collect())
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }
}

/// Wraps a provider with the search-side embedding contract: outputs are
/// L2-normalized and exactly `dimension` long, and any failure becomes the
/// zero vector instead of an error.
pub struct NormalizedEmbedder<E> {
    inner: E,
    dimension: usize,
}

impl<E: EmbeddingProvider> NormalizedEmbedder<E> {
    pub fn new(inner: E) -> Self {
        let dimension = inner.dimension();
        Self { inner, dimension }
    }

    /// Expect vectors of `dimension` instead of the inner provider's value.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    fn finish(&self, result: Result<Embedding, EmbeddingError>) -> Embedding {
        let embedding = match result {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!("Embedding failed, using zero vector: {}", e);
                return Embedding::zeros(self.dimension);
            }
        };

        if embedding.dimension != self.dimension {
            let err = EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.dimension,
            };
            warn!("Embedding rejected, using zero vector: {}", err);
            return Embedding::zeros(self.dimension);
        }

        embedding.normalized()
    }
}

#[async_trait]
impl<E: EmbeddingProvider> EmbeddingProvider for NormalizedEmbedder<E> {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        Ok(self.finish(self.inner.embed(text).await))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        match self.inner.embed_batch(texts).await {
            Ok(embeddings) if embeddings.len() == texts.len() => {
                Ok(embeddings.into_iter().map(|e| self.finish(Ok(e))).collect())
            }
            Ok(embeddings) => {
                warn!(
                    "Embedding batch returned {} vectors for {} inputs, using zero vectors",
                    embeddings.len(),
                    texts.len()
                );
                Ok(vec![Embedding::zeros(self.dimension); texts.len()])
            }
            Err(e) => {
                warn!("Embedding batch failed, using zero vectors: {}", e);
                Ok(vec![Embedding::zeros(self.dimension); texts.len()])
            }
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
#[path = "embedding_tests.rs"]
mod tests;
