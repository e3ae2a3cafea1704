//! Match scoring: skill overlap plus salary and location bonuses, capped at 100.
//!
//! Pure and deterministic. The three explanation lines are built alongside the score
//! so the digest can show why a job ranked where it did.

use crate::config::Preferences;
use crate::models::{Job, MatchResult};

pub const SALARY_BONUS: f64 = 10.0;
pub const LOCATION_BONUS: f64 = 10.0;
pub const MAX_SCORE: f64 = 100.0;

/// Score components before clamping and rounding.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub skill_score: f64,
    pub salary_bonus: f64,
    pub location_bonus: f64,
    pub matched_skills: Vec<String>,
}

impl ScoreBreakdown {
    /// `round(min(100, skill + salary + location))`.
    pub fn total(&self) -> u32 {
        (self.skill_score + self.salary_bonus + self.location_bonus)
            .min(MAX_SCORE)
            .round() as u32
    }
}

/// Computes the breakdown for one job.
///
/// `preferences.skills` must be non-empty; config validation guarantees it.
pub fn breakdown(job: &Job, preferences: &Preferences) -> ScoreBreakdown {
    let matched_skills: Vec<String> = preferences
        .skills
        .iter()
        .map(|s| s.to_lowercase())
        .filter(|pref| job.skills.iter().any(|skill| skill.to_lowercase() == *pref))
        .collect();

    let skill_score = matched_skills.len() as f64 / preferences.skills.len() as f64 * 100.0;

    let salary_bonus = if job.salary.min >= preferences.salary_minimum {
        SALARY_BONUS
    } else {
        0.0
    };

    // Any preference mentioning "remote" earns the bonus whatever the job's location says.
    let wanted = preferences.location.to_lowercase();
    let location_bonus =
        if job.location.to_lowercase().contains(&wanted) || wanted.contains("remote") {
            LOCATION_BONUS
        } else {
            0.0
        };

    ScoreBreakdown {
        skill_score,
        salary_bonus,
        location_bonus,
        matched_skills,
    }
}

/// Scores a job and builds its explanation.
pub fn score_job(job: &Job, preferences: &Preferences) -> MatchResult {
    let breakdown = breakdown(job, preferences);
    let explanation = explain(job, preferences, &breakdown);

    MatchResult {
        job: job.clone(),
        score: breakdown.total(),
        matched_skills: breakdown.matched_skills,
        explanation,
    }
}

pub fn score_all(jobs: &[Job], preferences: &Preferences) -> Vec<MatchResult> {
    jobs.iter().map(|job| score_job(job, preferences)).collect()
}

/// Three lines in fixed order: skills, salary, remote status.
pub fn explain(job: &Job, preferences: &Preferences, breakdown: &ScoreBreakdown) -> [String; 3] {
    let wanted = preferences.skills.len();
    let matched = breakdown.matched_skills.len();

    let skills_line = if matched == wanted {
        format!(
            "Skills: 100% match ({})",
            breakdown.matched_skills.join(", ")
        )
    } else if matched == 0 {
        format!("Skills: 0 of {wanted} matched (0%)")
    } else {
        format!(
            "Skills: {matched} of {wanted} matched ({}%): {}",
            breakdown.skill_score.round() as u32,
            breakdown.matched_skills.join(", ")
        )
    };

    let salary_line = if job.salary.min == 0.0 {
        "Salary: Not disclosed".to_string()
    } else if job.salary.min >= preferences.salary_minimum {
        format!(
            "Salary: {} (meets your {} minimum)",
            job.salary.raw, preferences.salary_minimum
        )
    } else {
        format!(
            "Salary: {} (below your {} minimum)",
            job.salary.raw, preferences.salary_minimum
        )
    };

    let remote_line = if job.remote {
        format!("Remote: Yes ({})", job.location)
    } else {
        format!("Remote: Not specified ({})", job.location)
    };

    [skills_line, salary_line, remote_line]
}
