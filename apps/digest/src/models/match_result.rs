use serde::{Deserialize, Serialize};

use crate::models::job::Job;

/// A job scored against the user's preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub job: Job,
    pub score: u32, // 0 – 100
    pub matched_skills: Vec<String>,
    /// Always three lines: skills, salary, remote status.
    pub explanation: [String; 3],
}
