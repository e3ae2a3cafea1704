// Source adapters: one per upstream job board.
// Implements: bounded-retry fetch, envelope extraction, per-record validation, normalization.
// Adapters never fail the run. Every error in here degrades to "fewer jobs".

pub mod findwork;
pub mod raw_sink;
pub mod remoteok;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{Job, JobSource};

pub use findwork::FindworkAdapter;
pub use raw_sink::{FileRawSink, NoopRawSink, RawDataSink};
pub use remoteok::RemoteOkAdapter;

const USER_AGENT: &str = concat!("jobdigest/", env!("CARGO_PKG_VERSION"));

// ────────────────────────────────────────────────────────────────────────────
// Errors (never leave this module)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {status}")]
    Status { status: u16 },
}

/// The response body did not have the shape the provider promises.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected {expected}, found {found}")]
    Unexpected {
        expected: &'static str,
        found: &'static str,
    },
}

/// A single upstream record that cannot become a `Job`.
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("schema mismatch: {0}")]
    Schema(String),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid url '{0}'")]
    InvalidUrl(String),

    #[error("unparseable date '{0}'")]
    InvalidDate(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Adapter trait
// ────────────────────────────────────────────────────────────────────────────

/// One upstream job board. `fetch` never fails: errors are logged and yield an empty list.
///
/// The aggregator holds adapters as `Arc<dyn SourceAdapter>`, so adding a provider means
/// adding an implementation, nothing else.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn source(&self) -> JobSource;

    async fn fetch(&self) -> Vec<Job>;
}

// ────────────────────────────────────────────────────────────────────────────
// Retrying HTTP fetcher
// ────────────────────────────────────────────────────────────────────────────

/// Retry and timeout settings shared by every adapter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub timeout: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            retry_delay: Duration::from_millis(3000),
            timeout: Duration::from_millis(30000),
        }
    }
}

impl FetchPolicy {
    pub fn attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

/// GETs a URL with up to `max_retries + 1` sequential attempts and a fixed delay between them.
/// Each adapter owns its own fetcher, so no retry state is shared across providers.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    policy: FetchPolicy,
}

impl HttpFetcher {
    pub fn new(policy: FetchPolicy) -> Result<Self, FetchError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, policy })
    }

    /// Returns the response body, or `None` once every attempt has failed.
    pub async fn get_text(
        &self,
        source: JobSource,
        url: &str,
        query: &[(&str, String)],
        headers: &HeaderMap,
    ) -> Option<String> {
        let attempts = self.policy.attempts();

        for attempt in 1..=attempts {
            if attempt > 1 {
                tokio::time::sleep(self.policy.retry_delay).await;
            }

            match self.try_once(url, query, headers).await {
                Ok(body) => {
                    debug!(%source, attempt, bytes = body.len(), "fetch succeeded");
                    return Some(body);
                }
                Err(e) => {
                    warn!(%source, attempt, attempts, "fetch attempt failed: {e}");
                }
            }
        }

        warn!(%source, "giving up after {attempts} attempts");
        None
    }

    async fn try_once(
        &self,
        url: &str,
        query: &[(&str, String)],
        headers: &HeaderMap,
    ) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .headers(headers.clone())
            .timeout(self.policy.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Provider-specific parsing, shared batch processing
// ────────────────────────────────────────────────────────────────────────────

/// The pure, provider-specific half of an adapter: where the job array lives in the
/// response body and how a validated record becomes a `Job`.
pub trait Provider {
    type Record: DeserializeOwned;

    const SOURCE: JobSource;

    /// Locates exactly the job array inside the response envelope.
    fn extract_records(body: Value) -> Result<Vec<Value>, ShapeError>;

    /// Normalizes one record. All defaulting rules live here.
    fn normalize(record: Self::Record) -> Result<Job, RecordError>;
}

/// Parses a response body into jobs. Malformed records are dropped one at a time,
/// an unexpected envelope yields an empty list. The sink always receives the validated
/// raw records, even when there are none.
pub fn process_body<P: Provider>(body: &str, sink: &dyn RawDataSink) -> Vec<Job> {
    let source = P::SOURCE;

    let records = match serde_json::from_str::<Value>(body)
        .map_err(ShapeError::from)
        .and_then(P::extract_records)
    {
        Ok(records) => records,
        Err(e) => {
            warn!(%source, "unexpected response shape, treating as zero jobs: {e}");
            sink.store(source.as_str(), &[]);
            return Vec::new();
        }
    };

    let total = records.len();
    let mut jobs = Vec::with_capacity(total);
    let mut validated = Vec::with_capacity(total);

    for (index, value) in records.into_iter().enumerate() {
        let parsed = serde_json::from_value::<P::Record>(value.clone())
            .map_err(|e| RecordError::Schema(e.to_string()))
            .and_then(P::normalize);

        match parsed {
            Ok(job) => {
                jobs.push(job);
                validated.push(value);
            }
            Err(e) => warn!(%source, index, "skipping record: {e}"),
        }
    }

    info!(
        %source,
        count = jobs.len(),
        skipped = total - jobs.len(),
        "normalized jobs"
    );

    sink.store(source.as_str(), &validated);

    jobs
}

// ────────────────────────────────────────────────────────────────────────────
// Normalization helpers
// ────────────────────────────────────────────────────────────────────────────

/// Trims a required text field, rejecting blank or absent values.
pub(crate) fn require_text(
    value: Option<String>,
    field: &'static str,
) -> Result<String, RecordError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(RecordError::MissingField(field))
}

/// Requires a well-formed absolute URL.
pub(crate) fn require_url(value: Option<String>) -> Result<String, RecordError> {
    let raw = require_text(value, "url")?;
    match url::Url::parse(&raw) {
        Ok(parsed) if parsed.has_host() => Ok(raw),
        _ => Err(RecordError::InvalidUrl(raw)),
    }
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
pub(crate) fn parse_posted_at(value: &str) -> Result<DateTime<Utc>, RecordError> {
    let trimmed = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| RecordError::InvalidDate(value.to_string()))
}

pub(crate) fn lowercase_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// JSON type name for shape error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// First non-blank candidate, trimmed.
pub(crate) fn first_present(candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(String::from)
}
