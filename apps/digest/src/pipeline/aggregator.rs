use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::info;

use crate::models::Job;
use crate::sources::SourceAdapter;

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOutcome {
    pub jobs: Vec<Job>,
    pub duplicates: usize,
}

/// Runs every adapter concurrently and waits for all of them. Batches come back in
/// adapter order, whatever order the fetches finished in.
pub async fn fetch_all(adapters: &[Arc<dyn SourceAdapter>]) -> Vec<Vec<Job>> {
    let batches = join_all(adapters.iter().map(|adapter| adapter.fetch())).await;

    for (adapter, batch) in adapters.iter().zip(&batches) {
        info!(source = %adapter.source(), count = batch.len(), "adapter finished");
    }

    batches
}

/// Concatenates batches in order and keeps the first job seen for each id.
///
/// The seen-id set lives only for this call. Earlier batches win cross-provider ties.
pub fn aggregate(batches: Vec<Vec<Job>>) -> AggregateOutcome {
    let total: usize = batches.iter().map(Vec::len).sum();
    let mut seen: HashSet<String> = HashSet::with_capacity(total);
    let mut jobs = Vec::with_capacity(total);

    for job in batches.into_iter().flatten() {
        if seen.insert(job.id.clone()) {
            jobs.push(job);
        }
    }

    let duplicates = total - jobs.len();
    info!(total, unique = jobs.len(), duplicates, "aggregated jobs");

    AggregateOutcome { jobs, duplicates }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::test_support::make_job;
    use crate::models::JobSource;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::time::Duration;

    struct StaticAdapter {
        source: JobSource,
        jobs: Vec<Job>,
        delay: Duration,
    }

    #[async_trait]
    impl SourceAdapter for StaticAdapter {
        fn source(&self) -> JobSource {
            self.source
        }

        async fn fetch(&self) -> Vec<Job> {
            tokio::time::sleep(self.delay).await;
            self.jobs.clone()
        }
    }

    fn with_source(source: JobSource, mut job: Job) -> Job {
        job.source = source;
        job
    }

    #[test]
    fn test_cross_provider_duplicate_keeps_first() {
        let first = with_source(JobSource::RemoteOk, make_job("Rust Engineer", "Acme", &[], 1));
        let second = with_source(JobSource::Findwork, make_job("rust engineer", "ACME", &[], 2));

        let outcome = aggregate(vec![vec![first.clone()], vec![second]]);

        assert_eq!(outcome.jobs, vec![first]);
        assert_eq!(outcome.duplicates, 1);
        assert_eq!(outcome.jobs[0].source, JobSource::RemoteOk);
    }

    #[test]
    fn test_preserves_order_across_batches() {
        let a = make_job("A", "X", &[], 1);
        let b = make_job("B", "X", &[], 1);
        let c = make_job("C", "X", &[], 1);

        let outcome = aggregate(vec![vec![a.clone(), b.clone()], vec![b.clone(), c.clone()]]);
        let titles: Vec<_> = outcome.jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert_eq!(outcome.duplicates, 1);
    }

    #[test]
    fn test_empty_input() {
        let outcome = aggregate(vec![vec![], vec![]]);
        assert!(outcome.jobs.is_empty());
        assert_eq!(outcome.duplicates, 0);
    }

    #[tokio::test]
    async fn test_fetch_all_keeps_adapter_order() {
        let slow = Arc::new(StaticAdapter {
            source: JobSource::RemoteOk,
            jobs: vec![make_job("Slow", "X", &[], 1)],
            delay: Duration::from_millis(50),
        }) as Arc<dyn SourceAdapter>;
        let fast = Arc::new(StaticAdapter {
            source: JobSource::Findwork,
            jobs: vec![make_job("Fast", "X", &[], 1)],
            delay: Duration::from_millis(0),
        }) as Arc<dyn SourceAdapter>;

        let batches = fetch_all(&[slow, fast]).await;
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0][0].title, "Slow");
        assert_eq!(batches[1][0].title, "Fast");
    }

    #[tokio::test]
    async fn test_empty_adapter_does_not_affect_others() {
        let empty = Arc::new(StaticAdapter {
            source: JobSource::Findwork,
            jobs: vec![],
            delay: Duration::from_millis(0),
        }) as Arc<dyn SourceAdapter>;
        let full = Arc::new(StaticAdapter {
            source: JobSource::RemoteOk,
            jobs: vec![make_job("A", "X", &[], 1), make_job("B", "X", &[], 1)],
            delay: Duration::from_millis(0),
        }) as Arc<dyn SourceAdapter>;

        let outcome = aggregate(fetch_all(&[empty, full]).await);
        assert_eq!(outcome.jobs.len(), 2);
    }

    fn batches_strategy() -> impl Strategy<Value = Vec<Vec<Job>>> {
        let job = (0u8..6, 0u8..3).prop_map(|(t, c)| {
            make_job(&format!("title {t}"), &format!("company {c}"), &[], 1)
        });
        prop::collection::vec(prop::collection::vec(job, 0..8), 0..4)
    }

    proptest! {
        #[test]
        fn dedup_is_idempotent(batches in batches_strategy()) {
            let once = aggregate(batches);
            let twice = aggregate(vec![once.jobs.clone()]);
            prop_assert_eq!(&twice.jobs, &once.jobs);
            prop_assert_eq!(twice.duplicates, 0);
        }

        #[test]
        fn dedup_keeps_first_of_each_id(batches in batches_strategy()) {
            let flat: Vec<Job> = batches.iter().flatten().cloned().collect();
            let outcome = aggregate(batches);

            let mut seen = HashSet::new();
            let expected: Vec<Job> = flat
                .iter()
                .filter(|j| seen.insert(j.id.clone()))
                .cloned()
                .collect();

            prop_assert_eq!(outcome.duplicates, flat.len() - expected.len());
            prop_assert_eq!(outcome.jobs, expected);
        }
    }
}
