//! Per-source retrieval adapters.
//!
//! Each adapter queries one collaborator and returns a [`SourceResults`]:
//! an explicit best-first ranking plus a payload map keyed by id. Failures
//! never leave the adapter; a failing source contributes nothing.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use membank_memory_vector::EmbeddingProvider;
use membank_protocols::error::MemoryError;
use membank_protocols::memory::{LexicalIndex, MemoryRecord, VectorIndex};

use crate::fusion::to_similarity;

/// Ranked ids from one source with their payloads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceResults {
    /// Identifiers, best first.
    pub ranking: Vec<String>,
    /// Payload for every identifier in `ranking`.
    pub records: HashMap<String, MemoryRecord>,
}

impl SourceResults {
    /// Append a record at the next rank. A repeated id keeps its first rank.
    pub fn push(&mut self, record: MemoryRecord) {
        if self.records.contains_key(&record.id) {
            return;
        }
        self.ranking.push(record.id.clone());
        self.records.insert(record.id.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }
}

impl FromIterator<MemoryRecord> for SourceResults {
    fn from_iter<I: IntoIterator<Item = MemoryRecord>>(iter: I) -> Self {
        let mut results = SourceResults::default();
        for record in iter {
            results.push(record);
        }
        results
    }
}

/// Collapse a failed source into an empty contribution.
pub(crate) fn best_effort(source: &str, result: Result<SourceResults, MemoryError>) -> SourceResults {
    match result {
        Ok(results) => results,
        Err(e) => {
            warn!("{} search failed, continuing without it: {}", source, e);
            SourceResults::default()
        }
    }
}

/// Keyword retrieval over a [`LexicalIndex`].
pub struct LexicalSearchAdapter {
    index: Arc<dyn LexicalIndex>,
}

impl LexicalSearchAdapter {
    pub fn new(index: Arc<dyn LexicalIndex>) -> Self {
        Self { index }
    }

    /// Query the index, propagating failures.
    pub async fn try_search(&self, query: &str, limit: usize) -> Result<SourceResults, MemoryError> {
        let hits = self.index.match_query(query, limit).await?;
        Ok(hits.into_iter().map(|hit| hit.into_record()).collect())
    }

    /// Query the index; any failure yields no results.
    pub async fn search(&self, query: &str, limit: usize) -> SourceResults {
        best_effort("Lexical", self.try_search(query, limit).await)
    }
}

/// Semantic retrieval: embed the query, ask a [`VectorIndex`] for neighbors,
/// keep those at or above the similarity threshold.
pub struct VectorSearchAdapter {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
}

impl VectorSearchAdapter {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Query the index, propagating failures.
    pub async fn try_search(
        &self,
        query: &str,
        limit: usize,
        threshold: f32,
    ) -> Result<SourceResults, MemoryError> {
        let embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| MemoryError::QueryError(e.to_string()))?;

        let hits = self.index.nearest(&embedding.vector, limit).await?;
        let total = hits.len();

        let results: SourceResults = hits
            .into_iter()
            .filter(|hit| to_similarity(hit.distance) >= threshold)
            .map(|hit| hit.into_record())
            .collect();

        debug!(
            "Vector search kept {}/{} hits at threshold {}",
            results.len(),
            total,
            threshold
        );
        Ok(results)
    }

    /// Query the index; any failure yields no results.
    pub async fn search(&self, query: &str, limit: usize, threshold: f32) -> SourceResults {
        best_effort("Vector", self.try_search(query, limit, threshold).await)
    }
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
