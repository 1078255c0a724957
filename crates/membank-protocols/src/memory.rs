//! Memory record types and collaborator protocol definitions.
//!
//! The hybrid search core talks to three collaborators: a record store, a
//! lexical index and a vector index. Each is a trait here so the core never
//! holds a concrete database handle.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MemoryError;

/// A stored memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Unique identifier, assigned once at creation.
    pub id: String,

    /// Content of the memory.
    pub content: String,

    /// Ordered tags.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Free-form note attached to the memory.
    #[serde(default)]
    pub note: String,
}

impl MemoryRecord {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            tags: Vec::new(),
            note: String::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// A memory that has not been stored yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewMemory {
    pub content: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub note: String,

    /// Creation time; the store stamps `now` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl NewMemory {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// A hit returned by a lexical index, best match first.
#[derive(Debug, Clone, PartialEq)]
pub struct LexicalHit {
    pub id: String,
    pub content: String,
    /// Tags joined by single spaces.
    pub tags: String,
    pub note: String,
}

impl LexicalHit {
    pub fn into_record(self) -> MemoryRecord {
        MemoryRecord {
            id: self.id,
            content: self.content,
            tags: split_tags(&self.tags),
            note: self.note,
        }
    }
}

/// A hit returned by a vector index, nearest first.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorHit {
    pub id: String,
    pub content: String,
    /// Tags joined by single spaces.
    pub tags: String,
    pub note: String,
    /// Raw distance to the query vector; 0 means identical.
    pub distance: f32,
}

impl VectorHit {
    pub fn into_record(self) -> MemoryRecord {
        MemoryRecord {
            id: self.id,
            content: self.content,
            tags: split_tags(&self.tags),
            note: self.note,
        }
    }
}

/// Split a whitespace-joined tag string into an ordered tag list.
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split_whitespace().map(str::to_string).collect()
}

/// Join tags into the whitespace-separated form stored by the indexes.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(" ")
}

/// Persistent record storage.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Insert a new memory, assigning it a fresh identifier.
    async fn insert(&self, memory: NewMemory) -> Result<MemoryRecord, MemoryError>;

    /// Fetch a memory by id.
    async fn get(&self, id: &str) -> Result<Option<MemoryRecord>, MemoryError>;

    /// Delete a memory. Returns `false` if no such memory existed.
    async fn delete(&self, id: &str) -> Result<bool, MemoryError>;

    /// List memories, newest first.
    async fn list(&self, limit: usize) -> Result<Vec<MemoryRecord>, MemoryError>;
}

/// Keyword search over stored memories.
#[async_trait]
pub trait LexicalIndex: Send + Sync {
    /// Match `query` against the index, returning at most `limit` hits in
    /// relevance order.
    async fn match_query(&self, query: &str, limit: usize) -> Result<Vec<LexicalHit>, MemoryError>;
}

/// Nearest-neighbor search over memory embeddings.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return at most `limit` hits ordered by ascending distance.
    async fn nearest(&self, vector: &[f32], limit: usize) -> Result<Vec<VectorHit>, MemoryError>;
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
