use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODEL;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub port: u16,
    pub rust_log: String,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Vendor invitations are disabled unless both are set.
    pub resend_api_key: Option<String>,
    pub mail_from: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            database_max_connections: optional_env("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|| "10".to_string())
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: optional_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            port: optional_env("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            cors_origins: parse_origins(
                &optional_env("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string()),
            ),
            request_timeout_secs: optional_env("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|| "120".to_string())
                .parse::<u64>()
                .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            resend_api_key: optional_env("RESEND_API_KEY"),
            mail_from: optional_env("MAIL_FROM"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
