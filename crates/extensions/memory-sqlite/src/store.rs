//! SQLite memory store implementation.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::params;
use tokio_rusqlite::Connection;
use tracing::debug;

use membank_protocols::error::MemoryError;
use membank_protocols::memory::{
    join_tags, split_tags, LexicalHit, LexicalIndex, MemoryRecord, MemoryStore, NewMemory,
};

use crate::fts::prefix_match_query;
use crate::schema::init_schema;

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

/// SQLite-backed record store and lexical index.
pub struct SqliteMemoryStore {
    conn: Connection,
}

impl SqliteMemoryStore {
    /// Create a new in-memory database.
    pub async fn in_memory() -> Result<Self, MemoryError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| MemoryError::ConnectionError(e.to_string()))?;
        Self::init(conn).await
    }

    /// Open (or create) a file-backed database.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| MemoryError::ConnectionError(e.to_string()))?;
        }

        let conn = Connection::open(path)
            .await
            .map_err(|e| MemoryError::ConnectionError(e.to_string()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, MemoryError> {
        conn.call(|conn| Ok(init_schema(conn)?))
            .await
            .map_err(|e| MemoryError::QueryError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Number of stored memories.
    pub async fn count(&self) -> Result<usize, MemoryError> {
        self.conn
            .call(|conn| {
                let count: i64 = conn.query_row("SELECT count(*) FROM memories", [], |row| row.get(0))?;
                Ok(count as usize)
            })
            .await
            .map_err(|e| MemoryError::QueryError(e.to_string()))
    }

    /// Persist the embedding vector of a memory, replacing any previous one.
    pub async fn store_embedding(&self, id: &str, vector: &[f32]) -> Result<(), MemoryError> {
        let id = id.to_string();
        let dimension = vector.len() as i64;
        let blob = encode_vector(vector);

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT OR REPLACE INTO memory_embeddings (memory_id, vector, dimension)
                     VALUES (?1, ?2, ?3)",
                    params![id, blob, dimension],
                )?;
                Ok(())
            })
            .await
            .map_err(|e| MemoryError::StorageError(e.to_string()))
    }

    /// Load all persisted embeddings with their records.
    pub async fn load_embeddings(&self) -> Result<Vec<(MemoryRecord, Vec<f32>)>, MemoryError> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT m.id, m.content, m.tags, m.note, e.vector
                     FROM memory_embeddings e
                     JOIN memories m ON m.id = e.memory_id",
                )?;

                let rows = stmt
                    .query_map([], |row| {
                        let record = MemoryRecord {
                            id: row.get(0)?,
                            content: row.get(1)?,
                            tags: split_tags(&row.get::<_, String>(2)?),
                            note: row.get(3)?,
                        };
                        let blob: Vec<u8> = row.get(4)?;
                        Ok((record, decode_vector(&blob)))
                    })?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(rows)
            })
            .await
            .map_err(|e| MemoryError::QueryError(e.to_string()))
    }
}

#[async_trait]
impl MemoryStore for SqliteMemoryStore {
    async fn insert(&self, memory: NewMemory) -> Result<MemoryRecord, MemoryError> {
        let record = MemoryRecord {
            id: uuid::Uuid::new_v4().to_string(),
            content: memory.content,
            tags: memory.tags,
            note: memory.note,
        };
        let created = memory.created_at.unwrap_or_else(Utc::now).to_rfc3339();

        let id = record.id.clone();
        let content = record.content.clone();
        let tags = join_tags(&record.tags);
        let note = record.note.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO memories (id, content, tags, note, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![id, content, tags, note, created],
                )?;
                Ok(())
            })
            .await
            .map_err(|e| MemoryError::StorageError(e.to_string()))?;

        debug!("Inserted memory {}", record.id);
        Ok(record)
    }

    async fn get(&self, id: &str) -> Result<Option<MemoryRecord>, MemoryError> {
        let id = id.to_string();
        self.conn
            .call(move |conn| {
                let result = conn.query_row(
                    "SELECT id, content, tags, note FROM memories WHERE id = ?1",
                    [&id],
                    |row| {
                        Ok(MemoryRecord {
                            id: row.get(0)?,
                            content: row.get(1)?,
                            tags: split_tags(&row.get::<_, String>(2)?),
                            note: row.get(3)?,
                        })
                    },
                );

                match result {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(|e| MemoryError::QueryError(e.to_string()))
    }

    async fn delete(&self, id: &str) -> Result<bool, MemoryError> {
        let id = id.to_string();
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute("DELETE FROM memory_embeddings WHERE memory_id = ?1", [&id])?;
                let removed = tx.execute("DELETE FROM memories WHERE id = ?1", [&id])?;
                tx.commit()?;
                Ok(removed > 0)
            })
            .await
            .map_err(|e| MemoryError::StorageError(e.to_string()))
    }

    async fn list(&self, limit: usize) -> Result<Vec<MemoryRecord>, MemoryError> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, content, tags, note FROM memories
                     ORDER BY created_at DESC, rowid DESC
                     LIMIT ?1",
                )?;

                let records = stmt
                    .query_map([limit as i64], |row| {
                        Ok(MemoryRecord {
                            id: row.get(0)?,
                            content: row.get(1)?,
                            tags: split_tags(&row.get::<_, String>(2)?),
                            note: row.get(3)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(records)
            })
            .await
            .map_err(|e| MemoryError::QueryError(e.to_string()))
    }
}

#[async_trait]
impl LexicalIndex for SqliteMemoryStore {
    async fn match_query(&self, query: &str, limit: usize) -> Result<Vec<LexicalHit>, MemoryError> {
        let Some(match_expr) = prefix_match_query(query) else {
            return Ok(Vec::new());
        };

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT m.id, m.content, m.tags, m.note
                     FROM memories_fts
                     JOIN memories m ON m.rowid = memories_fts.rowid
                     WHERE memories_fts MATCH ?1
                     ORDER BY bm25(memories_fts), m.id
                     LIMIT ?2",
                )?;

                let hits = stmt
                    .query_map(params![match_expr, limit as i64], |row| {
                        Ok(LexicalHit {
                            id: row.get(0)?,
                            content: row.get(1)?,
                            tags: row.get(2)?,
                            note: row.get(3)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(hits)
            })
            .await
            .map_err(|e| MemoryError::QueryError(format!("FTS search failed: {}", e)))
    }
}

fn encode_vector(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn decode_vector(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
