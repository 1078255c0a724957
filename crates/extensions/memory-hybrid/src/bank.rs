//! Persistent memory bank combining record storage with hybrid search.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use membank_memory_sqlite::SqliteMemoryStore;
use membank_memory_vector::{DistanceMetric, Embedding, EmbeddingProvider, InMemoryVectorIndex};
use membank_protocols::error::MemoryError;
use membank_protocols::memory::{MemoryRecord, MemoryStore, NewMemory};

use crate::search::{HybridSearchService, SearchOptions};

/// A memory store searchable by keywords and by meaning.
///
/// Records and embeddings live in SQLite; embeddings are also kept in an
/// in-memory vector index, rebuilt from SQLite when the bank is opened.
pub struct MemoryBank {
    store: Arc<SqliteMemoryStore>,
    vectors: Arc<InMemoryVectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    search: HybridSearchService,
}

impl MemoryBank {
    /// Open (or create) a bank backed by the database at `path`.
    pub async fn open(
        path: impl AsRef<Path>,
        embedder: Arc<dyn EmbeddingProvider>,
        metric: DistanceMetric,
    ) -> Result<Self, MemoryError> {
        let store = SqliteMemoryStore::open(path).await?;
        let bank = Self::from_store(store, embedder, metric);
        bank.restore_embeddings().await?;
        Ok(bank)
    }

    /// A bank with no on-disk state.
    pub async fn in_memory(
        embedder: Arc<dyn EmbeddingProvider>,
        metric: DistanceMetric,
    ) -> Result<Self, MemoryError> {
        let store = SqliteMemoryStore::in_memory().await?;
        Ok(Self::from_store(store, embedder, metric))
    }

    fn from_store(
        store: SqliteMemoryStore,
        embedder: Arc<dyn EmbeddingProvider>,
        metric: DistanceMetric,
    ) -> Self {
        let store = Arc::new(store);
        let vectors = Arc::new(InMemoryVectorIndex::new(metric));
        let search = HybridSearchService::new(store.clone(), vectors.clone(), embedder.clone());

        Self {
            store,
            vectors,
            embedder,
            search,
        }
    }

    /// Override the per-source over-fetch factor.
    pub fn with_fetch_multiplier(mut self, multiplier: usize) -> Self {
        self.search = self.search.with_fetch_multiplier(multiplier);
        self
    }

    async fn restore_embeddings(&self) -> Result<(), MemoryError> {
        let stored = self.store.load_embeddings().await?;
        if stored.is_empty() {
            return Ok(());
        }

        let expected = self.embedder.dimension();
        let mut restored = 0;
        let mut skipped = 0;
        for (record, vector) in stored {
            let embedding = Embedding::new(vector);
            if embedding.is_zero() {
                continue;
            }
            if embedding.dimension != expected {
                skipped += 1;
                continue;
            }
            self.vectors.insert(record, embedding);
            restored += 1;
        }

        if skipped > 0 {
            warn!(
                "Skipped {} stored embeddings with dimension other than {}",
                skipped, expected
            );
        }
        info!("Restored {} embeddings from persistent storage", restored);
        Ok(())
    }

    /// Store a memory and index its embedding.
    pub async fn save(&self, memory: NewMemory) -> Result<MemoryRecord, MemoryError> {
        let embedding = self
            .embedder
            .embed(&memory.content)
            .await
            .map_err(|e| MemoryError::StorageError(e.to_string()))?;

        let record = self.store.insert(memory).await?;

        // A zero vector carries no meaning; the record stays keyword-only.
        if embedding.is_zero() {
            debug!("No embedding for {}, indexed for keyword search only", record.id);
            return Ok(record);
        }

        if let Err(e) = self.store.store_embedding(&record.id, &embedding.vector).await {
            warn!("Failed to persist embedding for {}: {}", record.id, e);
        }
        self.vectors.insert(record.clone(), embedding);

        debug!("Saved memory {}", record.id);
        Ok(record)
    }

    pub async fn get(&self, id: &str) -> Result<Option<MemoryRecord>, MemoryError> {
        self.store.get(id).await
    }

    /// Remove a memory everywhere. Returns `false` if it did not exist.
    pub async fn delete(&self, id: &str) -> Result<bool, MemoryError> {
        let removed = self.store.delete(id).await?;
        self.vectors.remove(id);
        Ok(removed)
    }

    /// Newest memories first.
    pub async fn list(&self, limit: usize) -> Result<Vec<MemoryRecord>, MemoryError> {
        self.store.list(limit).await
    }

    pub async fn count(&self) -> Result<usize, MemoryError> {
        self.store.count().await
    }

    /// Number of embeddings available to semantic search.
    pub fn indexed_vectors(&self) -> usize {
        self.vectors.len()
    }

    pub async fn search(&self, query: &str, options: &SearchOptions) -> Vec<MemoryRecord> {
        self.search.hybrid_search(query, options).await
    }
}

#[cfg(test)]
#[path = "bank_tests.rs"]
mod tests;
