//! Hybrid search configuration.

use serde::{Deserialize, Serialize};

/// Defaults for hybrid search queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of results returned when the caller does not ask for a count.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Minimum vector similarity (0.0 - 1.0) for a semantic hit to count.
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// RRF constant.
    #[serde(default = "default_rrf_k")]
    pub rrf_k: u32,

    /// Each source fetches `top_k * fetch_multiplier` candidates before fusion.
    #[serde(default = "default_fetch_multiplier")]
    pub fetch_multiplier: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            threshold: default_threshold(),
            rrf_k: default_rrf_k(),
            fetch_multiplier: default_fetch_multiplier(),
        }
    }
}

fn default_top_k() -> usize {
    5
}

fn default_threshold() -> f32 {
    0.7
}

fn default_rrf_k() -> u32 {
    60
}

fn default_fetch_multiplier() -> usize {
    4
}
