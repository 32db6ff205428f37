use anyhow::{Context, Result};
use tracing::warn;

use crate::llm_client::DEFAULT_API_URL;

/// Application configuration loaded from environment variables.
///
/// The API key is the only secret. Its absence is not fatal: it is reported
/// once at startup and every remote call then fails on its own.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_api_url: optional_env("GEMINI_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Startup credential check. Logs the diagnostic and returns whether a key is held.
    pub fn check_credentials(&self) -> bool {
        if self.gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY is not set. Resume analysis and comparison will fail until it is provided.");
            return false;
        }
        true
    }
}

/// Unset and blank values are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
