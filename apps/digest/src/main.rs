mod config;
mod digest;
mod errors;
mod models;
mod pipeline;
mod sources;
mod status;

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::digest::{DigestSender, LogDigestSender};
use crate::errors::AppError;
use crate::pipeline::run_pipeline;
use crate::sources::{
    FetchPolicy, FileRawSink, FindworkAdapter, HttpFetcher, NoopRawSink, RawDataSink,
    RemoteOkAdapter, SourceAdapter,
};
use crate::status::{write_summary, RunSummary};

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv();

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), config::rust_log()))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobdigest v{}", env!("CARGO_PKG_VERSION"));

    let started_at = Utc::now();
    let summary = match run(started_at).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("Run failed: {e}");
            RunSummary::failure(started_at, &e)
        }
    };

    let status_path = config::run_status_path();
    write_summary(&status_path, &summary)?;
    info!("Run status written to {}", status_path.display());

    if !summary.is_success() {
        anyhow::bail!("run failed, see {}", status_path.display());
    }
    Ok(())
}

async fn run(started_at: DateTime<Utc>) -> Result<RunSummary, AppError> {
    let config = Config::from_env()?;
    let adapters = build_adapters(&config)?;

    let outcome = run_pipeline(&adapters, &config.preferences, &config.hard_nos).await?;

    let sent = LogDigestSender.send(&outcome.ranked).await;
    info!(sent, ranked = outcome.ranked.len(), "digest handed off");

    Ok(RunSummary::success(started_at, &outcome, sent))
}

/// Adapter order is dedup precedence: earlier adapters win duplicate postings.
fn build_adapters(config: &Config) -> Result<Vec<Arc<dyn SourceAdapter>>, AppError> {
    let sink: Arc<dyn RawDataSink> = match &config.raw_data_dir {
        Some(dir) => Arc::new(FileRawSink::new(dir)),
        None => Arc::new(NoopRawSink),
    };
    let policy = FetchPolicy::default();
    let fetcher = || HttpFetcher::new(policy).map_err(anyhow::Error::from);

    let remoteok: Arc<dyn SourceAdapter> = Arc::new(RemoteOkAdapter::new(
        fetcher()?,
        config.remoteok_url.clone(),
        sink.clone(),
    ));
    let findwork: Arc<dyn SourceAdapter> = Arc::new(FindworkAdapter::new(
        fetcher()?,
        config.findwork_url.clone(),
        config.findwork_api_token.clone(),
        config.preferences.skills.join(" "),
        sink,
    ));

    Ok(vec![remoteok, findwork])
}
