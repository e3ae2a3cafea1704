//! RemoteOK public feed, no credentials.
//!
//! The feed is a top-level JSON array whose first element is a legal notice, not a job.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::Value;

use crate::models::job::DEFAULT_LOCATION;
use crate::models::{job_id, Job, JobSource, Salary};
use crate::sources::{
    first_present, json_kind, lowercase_tags, parse_posted_at, process_body, require_text,
    require_url, HttpFetcher, Provider, RawDataSink, RecordError, ShapeError, SourceAdapter,
};

const CURRENCY: &str = "USD";

#[derive(Debug, Deserialize)]
pub struct RemoteOkRecord {
    pub position: Option<String>,
    pub company: Option<String>,
    pub url: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub location: Option<String>,
    pub date: Option<String>,
}

pub struct RemoteOkProvider;

impl Provider for RemoteOkProvider {
    type Record = RemoteOkRecord;

    const SOURCE: JobSource = JobSource::RemoteOk;

    fn extract_records(body: Value) -> Result<Vec<Value>, ShapeError> {
        match body {
            Value::Array(items) => Ok(items.into_iter().skip(1).collect()),
            other => Err(ShapeError::Unexpected {
                expected: "array",
                found: json_kind(&other),
            }),
        }
    }

    fn normalize(record: RemoteOkRecord) -> Result<Job, RecordError> {
        let title = require_text(record.position, "position")?;
        let company = require_text(record.company, "company")?;
        let url = require_url(record.url)?;
        let date = require_text(record.date, "date")?;
        let posted_at = parse_posted_at(&date)?;

        Ok(Job {
            id: job_id(&title, &company),
            salary: Salary::from_bounds(
                record.salary_min.unwrap_or(0.0),
                record.salary_max.unwrap_or(0.0),
                CURRENCY,
            ),
            location: first_present(&[record.location.as_deref()])
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            remote: true,
            skills: lowercase_tags(record.tags.unwrap_or_default()),
            posted_at,
            source: JobSource::RemoteOk,
            title,
            company,
            url,
        })
    }
}

pub struct RemoteOkAdapter {
    fetcher: HttpFetcher,
    base_url: String,
    sink: Arc<dyn RawDataSink>,
}

impl RemoteOkAdapter {
    pub fn new(
        fetcher: HttpFetcher,
        base_url: impl Into<String>,
        sink: Arc<dyn RawDataSink>,
    ) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            sink,
        }
    }
}

#[async_trait]
impl SourceAdapter for RemoteOkAdapter {
    fn source(&self) -> JobSource {
        JobSource::RemoteOk
    }

    async fn fetch(&self) -> Vec<Job> {
        let url = format!("{}/api", self.base_url.trim_end_matches('/'));
        match self
            .fetcher
            .get_text(JobSource::RemoteOk, &url, &[], &HeaderMap::new())
            .await
        {
            Some(body) => process_body::<RemoteOkProvider>(&body, self.sink.as_ref()),
            None => {
                self.sink.store(JobSource::RemoteOk.as_str(), &[]);
                Vec::new()
            }
        }
    }
}
