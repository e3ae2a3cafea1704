// Fetch → aggregate → filter → score → rank.
// One run per invocation. Adapter failures never reach this layer; only bad config does.

pub mod aggregator;
pub mod filter;
pub mod ranker;
pub mod scorer;

use std::sync::Arc;

use tracing::info;

use crate::config::Preferences;
use crate::errors::AppError;
use crate::models::MatchResult;
use crate::sources::SourceAdapter;

pub use aggregator::{aggregate, fetch_all, AggregateOutcome};
pub use filter::filter_hard_nos;
pub use ranker::rank;
pub use scorer::score_all;

/// Stage counts plus the ranked list handed to the digest sender.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutcome {
    pub fetched: usize,
    pub duplicates: usize,
    pub excluded: usize,
    pub ranked: Vec<MatchResult>,
}

/// Runs one full pipeline pass over the given adapters.
pub async fn run_pipeline(
    adapters: &[Arc<dyn SourceAdapter>],
    preferences: &Preferences,
    hard_nos: &[String],
) -> Result<PipelineOutcome, AppError> {
    if preferences.skills.is_empty() {
        return Err(AppError::Config(
            "at least one preferred skill is required".to_string(),
        ));
    }

    let batches = fetch_all(adapters).await;
    let fetched = batches.iter().map(Vec::len).sum();

    let AggregateOutcome { jobs, duplicates } = aggregate(batches);

    let unique = jobs.len();
    let jobs = filter_hard_nos(jobs, hard_nos);
    let excluded = unique - jobs.len();

    let ranked = rank(score_all(&jobs, preferences));
    log_ranked(&ranked);

    Ok(PipelineOutcome {
        fetched,
        duplicates,
        excluded,
        ranked,
    })
}

fn log_ranked(ranked: &[MatchResult]) {
    info!(count = ranked.len(), "ranked top matches");
    for (position, result) in ranked.iter().enumerate() {
        info!(
            "#{} [{}] {} at {} ({})",
            position + 1,
            result.score,
            result.job.title,
            result.job.company,
            result.job.source
        );
        for line in &result.explanation {
            info!("    {line}");
        }
    }
}
