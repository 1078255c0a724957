//! Hybrid search orchestration.

use std::sync::Arc;

use tracing::debug;

use membank_memory_vector::EmbeddingProvider;
use membank_protocols::memory::{LexicalIndex, MemoryRecord, VectorIndex};

use crate::fusion::{fuse_rankings, rank_fused, DEFAULT_RRF_K};
use crate::source::{LexicalSearchAdapter, VectorSearchAdapter};

/// Candidates fetched from each source per requested result.
pub const DEFAULT_FETCH_MULTIPLIER: usize = 4;

/// Per-query search parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    /// Maximum number of results.
    pub top_k: usize,
    /// Minimum vector similarity (inclusive) for a semantic hit to count.
    pub threshold: f32,
    /// RRF smoothing constant.
    pub rrf_k: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            threshold: 0.7,
            rrf_k: DEFAULT_RRF_K,
        }
    }
}

impl SearchOptions {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_rrf_k(mut self, rrf_k: u32) -> Self {
        self.rrf_k = rrf_k;
        self
    }
}

/// Runs lexical and vector retrieval concurrently and merges them with RRF.
pub struct HybridSearchService {
    lexical: LexicalSearchAdapter,
    vector: VectorSearchAdapter,
    fetch_multiplier: usize,
}

impl HybridSearchService {
    pub fn new(
        lexical_index: Arc<dyn LexicalIndex>,
        vector_index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            lexical: LexicalSearchAdapter::new(lexical_index),
            vector: VectorSearchAdapter::new(embedder, vector_index),
            fetch_multiplier: DEFAULT_FETCH_MULTIPLIER,
        }
    }

    /// Override the per-source over-fetch factor (minimum 1).
    pub fn with_fetch_multiplier(mut self, multiplier: usize) -> Self {
        self.fetch_multiplier = multiplier.max(1);
        self
    }

    pub fn fetch_multiplier(&self) -> usize {
        self.fetch_multiplier
    }

    /// Return up to `options.top_k` records ranked by fused score.
    ///
    /// Never fails: a source that errors contributes nothing, and two empty
    /// sources give an empty result.
    pub async fn hybrid_search(&self, query: &str, options: &SearchOptions) -> Vec<MemoryRecord> {
        if options.top_k == 0 {
            return Vec::new();
        }

        let fetch_limit = options.top_k.saturating_mul(self.fetch_multiplier);

        let (lexical, vector) = tokio::join!(
            self.lexical.search(query, fetch_limit),
            self.vector.search(query, fetch_limit, options.threshold)
        );

        debug!(
            "Hybrid search: {} lexical, {} vector candidates (fetch limit {})",
            lexical.len(),
            vector.len(),
            fetch_limit
        );

        if lexical.is_empty() && vector.is_empty() {
            return Vec::new();
        }

        // Vector payloads overwrite lexical ones for the same id.
        let mut records = lexical.records;
        records.extend(vector.records);

        let rankings: Vec<Vec<String>> = [lexical.ranking, vector.ranking]
            .into_iter()
            .filter(|ranking| !ranking.is_empty())
            .collect();

        let fused = rank_fused(fuse_rankings(&rankings, options.rrf_k));
        debug!("Fused {} unique candidates", fused.len());

        fused
            .into_iter()
            .take(options.top_k)
            .filter_map(|(id, _)| records.remove(&id))
            .collect()
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
