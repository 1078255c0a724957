//! Vector side of the membank store.
//!
//! Provides the [`Embedding`] type, the [`EmbeddingProvider`] trait, a
//! deterministic hashing embedder, and a brute-force in-memory index that
//! answers nearest-neighbor queries with raw distances.

mod embedding;
mod index;

pub use embedding::{Embedding, EmbeddingError, EmbeddingProvider, SimpleHashEmbedding};
pub use index::{DistanceMetric, InMemoryVectorIndex};
