//! Embedding provider configuration.

use serde::{Deserialize, Serialize};

/// Known embedding providers.
pub const EMBEDDING_PROVIDERS: [&str; 2] = ["hash", "openai"];

/// Known distance metrics for the vector index.
pub const DISTANCE_METRICS: [&str; 2] = ["l2", "cosine"];

/// Embedding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider name ("hash" or "openai").
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Output dimension of the embedding vector.
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Model name for remote providers.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL for OpenAI-compatible APIs.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Distance metric used by the vector index ("l2" or "cosine").
    #[serde(default = "default_metric")]
    pub metric: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            dimension: default_dimension(),
            model: default_model(),
            base_url: default_base_url(),
            api_key: None,
            metric: default_metric(),
        }
    }
}

fn default_provider() -> String {
    "hash".to_string()
}

fn default_dimension() -> usize {
    1024
}

fn default_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_metric() -> String {
    "l2".to_string()
}
