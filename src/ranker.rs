use std::cmp::Reverse;

use crate::data_models::SearchResult;

/// Most-cited first. The sort is stable, so equally cited results keep their fetch order.
pub fn rank_by_citations(mut results: Vec<SearchResult>) -> Vec<SearchResult> {
    results.sort_by_key(|r| Reverse(r.cited_by));
    results
}
