//! FTS5 query construction.

/// Build a prefix MATCH expression from free text.
///
/// Each whitespace-separated term becomes a quoted prefix token (`"term"*`),
/// and terms are joined by spaces, which FTS5 treats as AND. Double quotes
/// inside terms are dropped. Returns `None` when no terms remain.
pub fn prefix_match_query(query: &str) -> Option<String> {
    let terms: Vec<String> = query
        .split_whitespace()
        .map(|t| t.replace('"', ""))
        .filter(|t| !t.is_empty())
        .map(|t| format!("\"{}\"*", t))
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" "))
    }
}
