use tracing::info;

use crate::models::Job;

/// Why a job was dropped by the hard-no filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Exclusion {
    pub job_id: String,
    pub title: String,
    pub patterns: Vec<String>,
}

/// Hard-no patterns that occur (case-insensitively) in the job's title, company or any skill.
/// Blank patterns never match.
pub fn matched_patterns(job: &Job, hard_nos: &[String]) -> Vec<String> {
    let mut fields = Vec::with_capacity(job.skills.len() + 2);
    fields.push(job.title.to_lowercase());
    fields.push(job.company.to_lowercase());
    fields.extend(job.skills.iter().map(|s| s.to_lowercase()));

    hard_nos
        .iter()
        .filter(|pattern| {
            let needle = pattern.trim().to_lowercase();
            !needle.is_empty() && fields.iter().any(|f| f.contains(&needle))
        })
        .cloned()
        .collect()
}

/// Splits jobs into survivors and exclusion records, preserving the survivors' order.
pub fn partition_hard_nos(jobs: Vec<Job>, hard_nos: &[String]) -> (Vec<Job>, Vec<Exclusion>) {
    let mut kept = Vec::with_capacity(jobs.len());
    let mut exclusions = Vec::new();

    for job in jobs {
        let patterns = matched_patterns(&job, hard_nos);
        if patterns.is_empty() {
            kept.push(job);
        } else {
            exclusions.push(Exclusion {
                job_id: job.id,
                title: job.title,
                patterns,
            });
        }
    }

    (kept, exclusions)
}

/// Drops jobs matching any hard-no pattern, keeping the survivors in their original order.
/// An empty pattern list returns the input untouched.
pub fn filter_hard_nos(jobs: Vec<Job>, hard_nos: &[String]) -> Vec<Job> {
    if hard_nos.is_empty() {
        return jobs;
    }

    let before = jobs.len();
    let (kept, exclusions) = partition_hard_nos(jobs, hard_nos);

    for exclusion in &exclusions {
        info!(
            job_id = %exclusion.job_id,
            title = %exclusion.title,
            patterns = ?exclusion.patterns,
            "excluded by hard-no"
        );
    }
    info!(before, after = kept.len(), "applied hard-no filter");

    kept
}
