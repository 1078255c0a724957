//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod schema_embedding;
mod schema_search;

pub use schema_embedding::*;
pub use schema_search::*;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

/// Record storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database path. `~` is expanded at load time.
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

/// Base directory for membank state (`~/.membank`).
pub fn membank_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".membank"))
        .unwrap_or_else(|| PathBuf::from(".membank"))
}

fn default_storage_path() -> PathBuf {
    membank_dir().join("memories.db")
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
