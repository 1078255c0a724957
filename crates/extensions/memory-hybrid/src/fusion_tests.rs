use super::*;

const EPS: f64 = 1e-12;

fn list(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_rrf_score_first_rank() {
    assert!((rrf_score(1, 60) - 1.0 / 61.0).abs() < EPS);
}

#[test]
fn test_rrf_score_strictly_decreasing() {
    for rank in 1..100 {
        assert!(rrf_score(rank, DEFAULT_RRF_K) > rrf_score(rank + 1, DEFAULT_RRF_K));
    }
}

#[test]
fn test_rrf_score_zero_k() {
    assert!((rrf_score(1, 0) - 1.0).abs() < EPS);
}

#[test]
fn test_single_list_preserves_order() {
    let scores = fuse_rankings(&[list(&["a", "b", "c"])], 60);
    assert!(scores["a"] > scores["b"]);
    assert!(scores["b"] > scores["c"]);

    let ranked = rank_fused(scores);
    let ids: Vec<&str> = ranked.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn test_identical_lists_double_score() {
    let scores = fuse_rankings(&[list(&["a", "b"]), list(&["a", "b"])], 60);
    assert!((scores["a"] - 2.0 / 61.0).abs() < EPS);
    assert!((scores["b"] - 2.0 / 62.0).abs() < EPS);
}

#[test]
fn test_overlapping_lists() {
    let scores = fuse_rankings(&[list(&["a", "b", "c"]), list(&["c", "a", "b"])], 60);
    assert!((scores["a"] - (1.0 / 61.0 + 1.0 / 62.0)).abs() < EPS);
    assert!((scores["b"] - (1.0 / 62.0 + 1.0 / 63.0)).abs() < EPS);
    assert!((scores["c"] - (1.0 / 63.0 + 1.0 / 61.0)).abs() < EPS);
}

#[test]
fn test_disjoint_lists() {
    let scores = fuse_rankings(&[list(&["a", "b"]), list(&["c", "d"])], 60);
    assert_eq!(scores.len(), 4);
    assert!((scores["a"] - 1.0 / 61.0).abs() < EPS);
    assert!((scores["c"] - 1.0 / 61.0).abs() < EPS);
    assert!((scores["b"] - 1.0 / 62.0).abs() < EPS);
}

#[test]
fn test_empty_input() {
    assert!(fuse_rankings(&[], 60).is_empty());
    assert!(fuse_rankings(&[Vec::new(), Vec::new()], 60).is_empty());
    assert!(rank_fused(HashMap::new()).is_empty());
}

#[test]
fn test_duplicate_in_one_ranking_counts_once() {
    let scores = fuse_rankings(&[list(&["a", "b", "a"])], 60);
    assert!((scores["a"] - 1.0 / 61.0).abs() < EPS);
}

#[test]
fn test_scores_only_for_listed_ids() {
    let scores = fuse_rankings(&[list(&["a"]), list(&["b"])], 60);
    let mut keys: Vec<&String> = scores.keys().collect();
    keys.sort();
    assert_eq!(keys, vec!["a", "b"]);
    assert!(scores.values().all(|s| *s > 0.0));
}

#[test]
fn test_rank_fused_tie_break_by_id() {
    let scores = fuse_rankings(&[list(&["d", "b"]), list(&["c", "a"])], 60);
    let ranked = rank_fused(scores);
    let ids: Vec<&str> = ranked.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["c", "d", "a", "b"]);
}

#[test]
fn test_rank_fused_descending() {
    let scores = fuse_rankings(
        &[list(&["a", "b", "c", "d"]), list(&["d", "c", "e"])],
        60,
    );
    let ranked = rank_fused(scores);
    assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
}

#[test]
fn test_to_similarity() {
    assert_eq!(to_similarity(0.0), 1.0);
    assert_eq!(to_similarity(1.0), 0.0);
    assert!((to_similarity(0.3) - 0.7).abs() < 1e-6);
    assert_eq!(to_similarity(1.5), 0.0);
    assert_eq!(to_similarity(-0.5), 1.0);
}
