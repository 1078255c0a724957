//! In-memory vector index for nearest-neighbor search.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use membank_protocols::error::MemoryError;
use membank_protocols::memory::{join_tags, MemoryRecord, VectorHit, VectorIndex};

use crate::embedding::{Embedding, EmbeddingError};

/// Distance metric reported by the index. Both metrics are 0 for identical
/// unit vectors and grow as vectors diverge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DistanceMetric {
    /// Squared Euclidean distance.
    #[default]
    L2,
    /// `1 - cosine_similarity`.
    Cosine,
}

/// Distance reported when either side is the zero vector: similarity 0.
const UNRELATED_DISTANCE: f32 = 1.0;

impl DistanceMetric {
    fn distance(&self, stored: &Embedding, query: &[f32]) -> f32 {
        if stored.is_zero() || query.iter().all(|x| *x == 0.0) {
            return UNRELATED_DISTANCE;
        }
        match self {
            DistanceMetric::L2 => stored.squared_l2_distance(query),
            DistanceMetric::Cosine => 1.0 - stored.cosine_similarity(query),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = EmbeddingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l2" => Ok(DistanceMetric::L2),
            "cosine" => Ok(DistanceMetric::Cosine),
            other => Err(EmbeddingError::InvalidInput(format!(
                "unknown distance metric: {}",
                other
            ))),
        }
    }
}

struct IndexedVector {
    record: MemoryRecord,
    embedding: Embedding,
}

/// Brute-force vector index holding each record's payload next to its
/// embedding.
pub struct InMemoryVectorIndex {
    metric: DistanceMetric,
    vectors: RwLock<HashMap<String, IndexedVector>>,
}

impl InMemoryVectorIndex {
    pub fn new(metric: DistanceMetric) -> Self {
        Self {
            metric,
            vectors: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace the vector for a record.
    pub fn insert(&self, record: MemoryRecord, embedding: Embedding) {
        let id = record.id.clone();
        self.vectors
            .write()
            .insert(id, IndexedVector { record, embedding });
    }

    /// Remove a record's vector. Returns the removed embedding, if any.
    pub fn remove(&self, id: &str) -> Option<Embedding> {
        self.vectors.write().remove(id).map(|v| v.embedding)
    }

    pub fn len(&self) -> usize {
        self.vectors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.read().is_empty()
    }

    /// Compute the `limit` nearest vectors, ascending by distance. Ties are
    /// broken by id so results are stable across calls.
    pub fn search(&self, query: &[f32], limit: usize) -> Vec<VectorHit> {
        let vectors = self.vectors.read();
        let mut hits: Vec<VectorHit> = vectors
            .values()
            .filter(|v| {
                let matches = v.embedding.dimension == query.len();
                if !matches {
                    debug!(
                        "Skipping {}: dimension {} != query dimension {}",
                        v.record.id,
                        v.embedding.dimension,
                        query.len()
                    );
                }
                matches
            })
            .map(|v| VectorHit {
                id: v.record.id.clone(),
                content: v.record.content.clone(),
                tags: join_tags(&v.record.tags),
                note: v.record.note.clone(),
                distance: self.metric.distance(&v.embedding, query),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.truncate(limit);
        hits
    }
}

impl Default for InMemoryVectorIndex {
    fn default() -> Self {
        Self::new(DistanceMetric::default())
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn nearest(&self, vector: &[f32], limit: usize) -> Result<Vec<VectorHit>, MemoryError> {
        Ok(self.search(vector, limit))
    }
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod tests;
