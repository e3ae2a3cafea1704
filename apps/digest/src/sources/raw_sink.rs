use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

/// Best-effort audit trail for validated upstream records.
/// Called once per adapter run that reached the network, with an empty slice when nothing
/// validated or every attempt failed. Implementations must swallow their own failures.
pub trait RawDataSink: Send + Sync {
    fn store(&self, provider: &str, records: &[Value]);
}

/// Discards everything. Used when no raw-data directory is configured.
pub struct NoopRawSink;

impl RawDataSink for NoopRawSink {
    fn store(&self, _provider: &str, _records: &[Value]) {}
}

/// Writes one pretty-printed JSON file per provider per run:
/// `<dir>/<provider>-<YYYYmmddTHHMMSSZ>.json`.
pub struct FileRawSink {
    dir: PathBuf,
}

impl FileRawSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn write(&self, provider: &str, records: &[Value]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create raw data directory {:?}", self.dir))?;

        let stamp = Utc::now().format("%Y%m%dT%H%M%SZ");
        let path = self.dir.join(format!("{provider}-{stamp}.json"));
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&path, json).with_context(|| format!("Failed to write raw data to {:?}", path))?;

        Ok(path)
    }
}

impl RawDataSink for FileRawSink {
    fn store(&self, provider: &str, records: &[Value]) {
        match self.write(provider, records) {
            Ok(path) => debug!(provider, count = records.len(), ?path, "stored raw records"),
            Err(e) => warn!(provider, "raw data sink failed: {e:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_sink_writes_provider_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileRawSink::new(dir.path().join("raw"));

        sink.store("remoteok", &[json!({"position": "Rust Engineer"})]);

        let entries: Vec<_> = fs::read_dir(dir.path().join("raw"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].starts_with("remoteok-"));
        assert!(entries[0].ends_with(".json"));

        let content = fs::read_to_string(dir.path().join("raw").join(&entries[0])).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed[0]["position"], "Rust Engineer");
    }

    #[test]
    fn test_file_sink_failure_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        // A file where the directory should be: write fails, store must not panic.
        let sink = FileRawSink::new(&blocker);
        sink.store("findwork", &[json!({})]);
        assert!(blocker.is_file());
    }
}
