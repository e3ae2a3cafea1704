//! Digest hand-off. The ranked list leaves the core here.
//!
//! HTML rendering and mail transport live outside this crate. `LogDigestSender` renders a
//! plain-text digest into the log so a run is useful without a mail backend.

use async_trait::async_trait;
use tracing::info;

use crate::models::MatchResult;

/// Consumes the ranked list and reports whether the digest went out.
#[async_trait]
pub trait DigestSender: Send + Sync {
    async fn send(&self, matches: &[MatchResult]) -> bool;
}

pub struct LogDigestSender;

#[async_trait]
impl DigestSender for LogDigestSender {
    async fn send(&self, matches: &[MatchResult]) -> bool {
        info!("daily digest:\n{}", render_digest(matches));
        true
    }
}

/// Plain-text rendering: one numbered block per match, explanation lines indented.
pub fn render_digest(matches: &[MatchResult]) -> String {
    if matches.is_empty() {
        return "No matching jobs today.".to_string();
    }

    let mut out = format!("Top {} job matches\n", matches.len());
    for (i, m) in matches.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. [{}/100] {} at {}\n   {}\n",
            i + 1,
            m.score,
            m.job.title,
            m.job.company,
            m.job.url
        ));
        for line in &m.explanation {
            out.push_str(&format!("   - {line}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::test_support::make_job;

    fn result(title: &str, score: u32) -> MatchResult {
        MatchResult {
            job: make_job(title, "Acme", &["rust"], 1),
            score,
            matched_skills: vec!["rust".to_string()],
            explanation: [
                "Skills: 100% match (rust)".to_string(),
                "Salary: Not disclosed".to_string(),
                "Remote: Yes (Remote)".to_string(),
            ],
        }
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_digest(&[]), "No matching jobs today.");
    }

    #[test]
    fn test_render_numbers_entries_in_order() {
        let text = render_digest(&[result("Rust Engineer", 95), result("Go Engineer", 40)]);
        assert!(text.starts_with("Top 2 job matches"));
        let first = text.find("1. [95/100] Rust Engineer at Acme").unwrap();
        let second = text.find("2. [40/100] Go Engineer at Acme").unwrap();
        assert!(first < second);
        assert!(text.contains("   - Salary: Not disclosed"));
        assert!(text.contains("https://jobs.example.com/1"));
    }

    #[tokio::test]
    async fn test_log_sender_reports_sent() {
        assert!(LogDigestSender.send(&[result("Rust Engineer", 95)]).await);
        assert!(LogDigestSender.send(&[]).await);
    }
}
