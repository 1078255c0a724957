//! Fixed-response collaborators shared by unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use membank_memory_vector::{Embedding, EmbeddingError, EmbeddingProvider};
use membank_protocols::error::MemoryError;
use membank_protocols::memory::{LexicalHit, LexicalIndex, VectorHit, VectorIndex};

pub fn lexical_hit(id: &str) -> LexicalHit {
    LexicalHit {
        id: id.to_string(),
        content: format!("lexical {}", id),
        tags: "kw tag".to_string(),
        note: String::new(),
    }
}

pub fn vector_hit(id: &str, distance: f32) -> VectorHit {
    VectorHit {
        id: id.to_string(),
        content: format!("vector {}", id),
        tags: "vec".to_string(),
        note: "n".to_string(),
        distance,
    }
}

/// Lexical index returning canned hits, or an error when `hits` is `None`.
pub struct StaticLexical {
    hits: Option<Vec<LexicalHit>>,
    pub last_limit: Mutex<Option<usize>>,
}

impl StaticLexical {
    pub fn new(hits: Vec<LexicalHit>) -> Self {
        Self {
            hits: Some(hits),
            last_limit: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            hits: None,
            last_limit: Mutex::new(None),
        }
    }
}

#[async_trait]
impl LexicalIndex for StaticLexical {
    async fn match_query(&self, _query: &str, limit: usize) -> Result<Vec<LexicalHit>, MemoryError> {
        *self.last_limit.lock() = Some(limit);
        match &self.hits {
            Some(hits) => Ok(hits.iter().take(limit).cloned().collect()),
            None => Err(MemoryError::QueryError("fts5: syntax error".to_string())),
        }
    }
}

/// Vector index returning canned hits, or an error when `hits` is `None`.
pub struct StaticVector {
    hits: Option<Vec<VectorHit>>,
    pub last_limit: Mutex<Option<usize>>,
    pub last_query: Mutex<Vec<f32>>,
}

impl StaticVector {
    pub fn new(hits: Vec<VectorHit>) -> Self {
        Self {
            hits: Some(hits),
            last_limit: Mutex::new(None),
            last_query: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            hits: None,
            last_limit: Mutex::new(None),
            last_query: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl VectorIndex for StaticVector {
    async fn nearest(&self, vector: &[f32], limit: usize) -> Result<Vec<VectorHit>, MemoryError> {
        *self.last_limit.lock() = Some(limit);
        *self.last_query.lock() = vector.to_vec();
        match &self.hits {
            Some(hits) => Ok(hits.iter().take(limit).cloned().collect()),
            None => Err(MemoryError::ConnectionError("index unavailable".to_string())),
        }
    }
}

/// Embedder returning the same vector for every input.
pub struct FixedEmbedder(pub Vec<f32>);

#[async_trait]
impl EmbeddingProvider for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Embedding, EmbeddingError> {
        Ok(Embedding::new(self.0.clone()))
    }

    fn dimension(&self) -> usize {
        self.0.len()
    }
}

/// Embedder that always fails.
pub struct FailingEmbedder(pub usize);

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Embedding, EmbeddingError> {
        Err(EmbeddingError::Failed("model unavailable".to_string()))
    }

    fn dimension(&self) -> usize {
        self.0
    }
}
