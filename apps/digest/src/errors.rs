use thiserror::Error;

/// Pipeline-fatal errors. Everything per-adapter or per-record is absorbed inside
/// `sources` and never surfaces here.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Run status error: {0}")]
    Status(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Short machine-readable code recorded in the run summary.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Status(_) => "STATUS_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
