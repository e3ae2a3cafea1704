use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Location used when a provider gives no usable location string.
pub const DEFAULT_LOCATION: &str = "Remote";

/// Upstream job board that produced a `Job`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSource {
    RemoteOk,
    Findwork,
}

impl JobSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobSource::RemoteOk => "remoteok",
            JobSource::Findwork => "findwork",
        }
    }
}

impl std::fmt::Display for JobSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Salary band. `currency` and `raw` are empty strings when nothing was disclosed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Salary {
    pub min: f64,
    pub max: f64,
    pub currency: String,
    pub raw: String,
}

impl Salary {
    pub fn not_disclosed() -> Self {
        Self::default()
    }

    /// Builds a salary band, deriving `raw` only when at least one bound is positive.
    pub fn from_bounds(min: f64, max: f64, currency: &str) -> Self {
        let min = min.max(0.0);
        let max = max.max(0.0);
        if min <= 0.0 && max <= 0.0 {
            return Self::not_disclosed();
        }

        let raw = if min > 0.0 && max > 0.0 {
            format!("{currency} {}-{}", format_amount(min), format_amount(max))
        } else if min > 0.0 {
            format!("{currency} {}+", format_amount(min))
        } else {
            format!("up to {currency} {}", format_amount(max))
        };

        Self {
            min,
            max,
            currency: currency.to_string(),
            raw,
        }
    }
}

fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

/// A normalized job posting. Built once by a source adapter and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    pub url: String,
    pub salary: Salary,
    pub location: String,
    pub remote: bool,
    pub skills: Vec<String>,
    pub posted_at: DateTime<Utc>,
    pub source: JobSource,
}

/// Content-derived identifier: SHA-256 of `lowercase(title + company)`, hex encoded.
///
/// The same title and company yield the same id regardless of provider, which is what
/// lets the aggregator collapse cross-provider duplicates.
pub fn job_id(title: &str, company: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{title}{company}").to_lowercase().as_bytes());
    format!("{:x}", hasher.finalize())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_id_is_case_insensitive() {
        assert_eq!(
            job_id("Rust Engineer", "Acme"),
            job_id("rust engineer", "ACME")
        );
    }

    #[test]
    fn test_job_id_differs_by_company() {
        assert_ne!(job_id("Rust Engineer", "Acme"), job_id("Rust Engineer", "Globex"));
    }

    #[test]
    fn test_job_id_is_hex_sha256() {
        let id = job_id("a", "b");
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_salary_zero_bounds_not_disclosed() {
        let salary = Salary::from_bounds(0.0, 0.0, "USD");
        assert_eq!(salary.raw, "");
        assert_eq!(salary.currency, "");
        assert_eq!(salary, Salary::not_disclosed());
    }

    #[test]
    fn test_salary_full_band() {
        let salary = Salary::from_bounds(90000.0, 120000.0, "USD");
        assert_eq!(salary.raw, "USD 90000-120000");
        assert_eq!(salary.currency, "USD");
    }

    #[test]
    fn test_salary_single_bounds() {
        assert_eq!(Salary::from_bounds(50000.0, 0.0, "EUR").raw, "EUR 50000+");
        assert_eq!(Salary::from_bounds(0.0, 70000.5, "EUR").raw, "up to EUR 70000.50");
    }

    #[test]
    fn test_salary_negative_bounds_clamped() {
        let salary = Salary::from_bounds(-5.0, -1.0, "USD");
        assert_eq!(salary.min, 0.0);
        assert_eq!(salary.max, 0.0);
        assert!(salary.raw.is_empty());
    }
}
