use std::path::PathBuf;

use crate::errors::AppError;

pub const DEFAULT_REMOTEOK_URL: &str = "https://remoteok.com";
pub const DEFAULT_FINDWORK_URL: &str = "https://findwork.dev";

/// What the user is looking for. Skills are stored lower-cased.
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub skills: Vec<String>,
    pub salary_minimum: f64,
    pub location: String,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub preferences: Preferences,
    pub hard_nos: Vec<String>,
    pub remoteok_url: String,
    pub findwork_url: String,
    pub findwork_api_token: Option<String>,
    pub raw_data_dir: Option<PathBuf>,
}

impl Config {
    /// Expects `.env` to have been loaded already, see `load_dotenv`.
    pub fn from_env() -> Result<Self, AppError> {
        let skills = parse_list(&require_env("DIGEST_SKILLS")?);
        let salary_raw = require_env("DIGEST_SALARY_MIN")?;
        let location = require_env("DIGEST_LOCATION")?;

        let preferences = build_preferences(skills, &salary_raw, location)?;

        Ok(Config {
            preferences,
            hard_nos: optional_env("DIGEST_HARD_NOS")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            remoteok_url: optional_env("REMOTEOK_URL")
                .unwrap_or_else(|| DEFAULT_REMOTEOK_URL.to_string()),
            findwork_url: optional_env("FINDWORK_URL")
                .unwrap_or_else(|| DEFAULT_FINDWORK_URL.to_string()),
            findwork_api_token: optional_env("FINDWORK_API_TOKEN"),
            raw_data_dir: optional_env("RAW_DATA_DIR").map(PathBuf::from),
        })
    }
}

pub fn load_dotenv() {
    dotenvy::dotenv().ok(); // load .env if present; ignore if missing
}

/// Read separately from `Config` so a failed config load still gets a status record.
pub fn run_status_path() -> PathBuf {
    optional_env("RUN_STATUS_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("run-status.json"))
}

pub fn rust_log() -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
}

/// Validates raw preference values. Empty skills or a non-positive minimum are fatal.
pub fn build_preferences(
    skills: Vec<String>,
    salary_raw: &str,
    location: String,
) -> Result<Preferences, AppError> {
    if skills.is_empty() {
        return Err(AppError::Config(
            "DIGEST_SKILLS must list at least one skill".to_string(),
        ));
    }

    let salary_minimum = salary_raw.trim().parse::<f64>().map_err(|_| {
        AppError::Config(format!(
            "DIGEST_SALARY_MIN must be a number, got '{salary_raw}'"
        ))
    })?;
    if !salary_minimum.is_finite() || salary_minimum <= 0.0 {
        return Err(AppError::Config(format!(
            "DIGEST_SALARY_MIN must be positive, got {salary_minimum}"
        )));
    }

    Ok(Preferences {
        skills: skills.into_iter().map(|s| s.to_lowercase()).collect(),
        salary_minimum,
        location: location.trim().to_string(),
    })
}

/// Splits a comma-separated value, dropping blank items.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn require_env(key: &str) -> Result<String, AppError> {
    std::env::var(key)
        .map_err(|_| AppError::Config(format!("required environment variable '{key}' is not set")))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
