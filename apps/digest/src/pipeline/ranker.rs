use std::cmp::Ordering;

use crate::models::MatchResult;

/// Number of jobs that make it into the digest.
pub const TOP_N: usize = 10;

fn by_score_then_recency(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| b.job.posted_at.cmp(&a.job.posted_at))
}

/// Highest score first, newer postings first on ties, original order otherwise.
/// Truncated to `TOP_N`.
pub fn rank(mut results: Vec<MatchResult>) -> Vec<MatchResult> {
    // sort_by is stable, which keeps input order for full ties
    results.sort_by(by_score_then_recency);
    results.truncate(TOP_N);
    results
}
