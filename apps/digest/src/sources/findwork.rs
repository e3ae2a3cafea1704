//! Findwork token-authenticated search API. Jobs sit under `results` in an object envelope.
//! Without a token the adapter is disabled for the run.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::models::job::DEFAULT_LOCATION;
use crate::models::{job_id, Job, JobSource, Salary};
use crate::sources::{
    first_present, json_kind, lowercase_tags, parse_posted_at, process_body, require_text,
    require_url, HttpFetcher, Provider, RawDataSink, RecordError, ShapeError, SourceAdapter,
};

const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Deserialize)]
pub struct FindworkRecord {
    pub role: Option<String>,
    pub company_name: Option<String>,
    pub url: Option<String>,
    pub location: Option<String>,
    pub remote: Option<bool>,
    pub keywords: Option<Vec<String>>,
    pub date_posted: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_currency: Option<String>,
}

pub struct FindworkProvider;

impl Provider for FindworkProvider {
    type Record = FindworkRecord;

    const SOURCE: JobSource = JobSource::Findwork;

    fn extract_records(body: Value) -> Result<Vec<Value>, ShapeError> {
        let found = json_kind(&body);
        let Value::Object(mut envelope) = body else {
            return Err(ShapeError::Unexpected {
                expected: "object with a results array",
                found,
            });
        };

        match envelope.remove("results") {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(ShapeError::Unexpected {
                expected: "results array",
                found: json_kind(&other),
            }),
            None => Err(ShapeError::Unexpected {
                expected: "results array",
                found: "nothing",
            }),
        }
    }

    fn normalize(record: FindworkRecord) -> Result<Job, RecordError> {
        let title = require_text(record.role, "role")?;
        let company = require_text(record.company_name, "company_name")?;
        let url = require_url(record.url)?;
        let date = require_text(record.date_posted, "date_posted")?;
        let posted_at = parse_posted_at(&date)?;
        let remote = record.remote.unwrap_or(false);

        let currency = first_present(&[record.salary_currency.as_deref()])
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        Ok(Job {
            id: job_id(&title, &company),
            salary: Salary::from_bounds(
                record.salary_min.unwrap_or(0.0),
                record.salary_max.unwrap_or(0.0),
                &currency,
            ),
            location: first_present(&[record.location.as_deref()])
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            remote,
            skills: lowercase_tags(record.keywords.unwrap_or_default()),
            posted_at,
            source: JobSource::Findwork,
            title,
            company,
            url,
        })
    }
}

pub struct FindworkAdapter {
    fetcher: HttpFetcher,
    base_url: String,
    api_token: Option<String>,
    search: String,
    sink: Arc<dyn RawDataSink>,
}

impl FindworkAdapter {
    /// `search` is sent as the free-text query, typically the user's skills.
    pub fn new(
        fetcher: HttpFetcher,
        base_url: impl Into<String>,
        api_token: Option<String>,
        search: impl Into<String>,
        sink: Arc<dyn RawDataSink>,
    ) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            api_token,
            search: search.into(),
            sink,
        }
    }

    fn auth_headers(token: &str) -> Option<HeaderMap> {
        let value = HeaderValue::from_str(&format!("Token {token}")).ok()?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Some(headers)
    }
}

#[async_trait]
impl SourceAdapter for FindworkAdapter {
    fn source(&self) -> JobSource {
        JobSource::Findwork
    }

    async fn fetch(&self) -> Vec<Job> {
        let Some(token) = self.api_token.as_deref() else {
            warn!(source = %JobSource::Findwork, "FINDWORK_API_TOKEN not set, adapter disabled");
            return Vec::new();
        };
        let Some(headers) = Self::auth_headers(token) else {
            warn!(source = %JobSource::Findwork, "API token is not a valid header value, adapter disabled");
            return Vec::new();
        };

        let url = format!("{}/api/jobs/", self.base_url.trim_end_matches('/'));
        let query = [("search", self.search.clone())];

        match self
            .fetcher
            .get_text(JobSource::Findwork, &url, &query, &headers)
            .await
        {
            Some(body) => process_body::<FindworkProvider>(&body, self.sink.as_ref()),
            None => {
                self.sink.store(JobSource::Findwork.as_str(), &[]);
                Vec::new()
            }
        }
    }
}
