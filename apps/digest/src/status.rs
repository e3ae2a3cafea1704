use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::pipeline::PipelineOutcome;

/// Summary of one run, written after every run whether it succeeded or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub fetched: usize,
    pub duplicates: usize,
    pub excluded: usize,
    pub ranked: usize,
    pub email_sent: bool,
    pub error: Option<RunError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunError {
    pub code: String,
    pub message: String,
}

impl RunSummary {
    pub fn success(
        started_at: DateTime<Utc>,
        outcome: &PipelineOutcome,
        email_sent: bool,
    ) -> Self {
        Self {
            started_at,
            finished_at: Utc::now(),
            fetched: outcome.fetched,
            duplicates: outcome.duplicates,
            excluded: outcome.excluded,
            ranked: outcome.ranked.len(),
            email_sent,
            error: None,
        }
    }

    pub fn failure(started_at: DateTime<Utc>, error: &AppError) -> Self {
        Self {
            started_at,
            finished_at: Utc::now(),
            fetched: 0,
            duplicates: 0,
            excluded: 0,
            ranked: 0,
            email_sent: false,
            error: Some(RunError {
                code: error.code().to_string(),
                message: error.to_string(),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(summary)
        .map_err(|e| AppError::Status(format!("failed to serialize run summary: {e}")))?;
    fs::write(path, json)
        .map_err(|e| AppError::Status(format!("failed to write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_success_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.json");
        let outcome = PipelineOutcome {
            fetched: 12,
            duplicates: 2,
            excluded: 1,
            ranked: vec![],
        };

        let summary = RunSummary::success(Utc::now(), &outcome, true);
        write_summary(&path, &summary).unwrap();

        let read: RunSummary = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read, summary);
        assert!(read.is_success());
        assert_eq!(read.fetched, 12);
        assert!(read.finished_at >= read.started_at);
    }

    #[test]
    fn test_failure_summary_records_error() {
        let err = AppError::Config("DIGEST_SKILLS must list at least one skill".to_string());
        let summary = RunSummary::failure(Utc::now(), &err);

        assert!(!summary.is_success());
        let error = summary.error.unwrap();
        assert_eq!(error.code, "CONFIG_ERROR");
        assert!(error.message.contains("DIGEST_SKILLS"));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("status.json");
        let summary = RunSummary::failure(Utc::now(), &AppError::Status("x".into()));
        assert!(matches!(
            write_summary(&path, &summary),
            Err(AppError::Status(_))
        ));
    }
}
