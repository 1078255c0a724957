//! Reciprocal Rank Fusion.
//!
//! Combines any number of ranked identifier lists using:
//! `score(id) = sum over lists containing id of 1 / (k + rank)`
//!
//! Ranks are 1-indexed. Raw source scores are never consulted, so lists from
//! sources with incomparable scales (BM25, vector distance) can be merged
//! without normalization.

use std::collections::{HashMap, HashSet};

/// Default RRF smoothing constant.
pub const DEFAULT_RRF_K: u32 = 60;

/// Contribution of a single 1-indexed rank.
pub fn rrf_score(rank: usize, k: u32) -> f64 {
    1.0 / (k as f64 + rank as f64)
}

/// Accumulate RRF scores over all rankings.
///
/// Identifiers absent from a ranking receive no contribution from it. A
/// duplicate inside one ranking only counts at its first position.
pub fn fuse_rankings(rankings: &[Vec<String>], k: u32) -> HashMap<String, f64> {
    let mut scores: HashMap<String, f64> = HashMap::new();

    for ranking in rankings {
        let mut seen = HashSet::with_capacity(ranking.len());
        for (idx, id) in ranking.iter().enumerate() {
            if !seen.insert(id.as_str()) {
                continue;
            }
            *scores.entry(id.clone()).or_insert(0.0) += rrf_score(idx + 1, k);
        }
    }

    scores
}

/// Order fused scores descending. Equal scores fall back to ascending id so
/// the output never depends on hash iteration order.
pub fn rank_fused(scores: HashMap<String, f64>) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked
}

/// Map a raw distance to a similarity in `[0, 1]`.
pub fn to_similarity(distance: f32) -> f32 {
    (1.0 - distance).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "fusion_tests.rs"]
mod tests;
