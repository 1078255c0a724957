//! Hybrid memory search for membank.
//!
//! Combines keyword search (SQLite FTS5) with vector similarity search and
//! merges both rankings with Reciprocal Rank Fusion (RRF).
//!
//! ## How It Works
//!
//! 1. Each source is asked for `top_k * fetch_multiplier` candidates, in parallel
//! 2. Vector candidates below the similarity threshold are dropped
//! 3. A failing source contributes nothing instead of failing the query
//! 4. Rankings are fused with RRF and the first `top_k` records are returned

mod bank;
mod embedding;
mod fusion;
mod search;
mod source;

#[cfg(test)]
mod testing;

pub use bank::MemoryBank;
pub use embedding::{NormalizedEmbedder, OpenAIEmbedding, OpenAIEmbeddingConfig, DEFAULT_DIMENSION};
pub use fusion::{fuse_rankings, rank_fused, rrf_score, to_similarity, DEFAULT_RRF_K};
pub use search::{HybridSearchService, SearchOptions, DEFAULT_FETCH_MULTIPLIER};
pub use source::{LexicalSearchAdapter, SourceResults, VectorSearchAdapter};
