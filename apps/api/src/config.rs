use std::path::PathBuf;

use anyhow::{bail, Context, Result};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Application configuration loaded from environment variables.
/// Call `validate()` once at startup; a missing credential is a startup failure.
#[derive(Debug, Clone)]
pub struct Config {
    /// Inference-service credential. Optional here so the request-time
    /// configuration error stays representable; `validate()` rejects `None`.
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub gemini_model: String,
    /// Directory for the JSON history store. In-memory history when unset.
    pub history_dir: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_api_base: optional_env("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            gemini_model: optional_env("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            history_dir: optional_env("HISTORY_DIR").map(PathBuf::from),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Startup validation. Fails if the inference-service credential is absent.
    pub fn validate(&self) -> Result<()> {
        if self.gemini_api_key.is_none() {
            bail!("Required environment variable 'GEMINI_API_KEY' is not set");
        }
        if !self.gemini_api_base.starts_with("http://")
            && !self.gemini_api_base.starts_with("https://")
        {
            bail!(
                "GEMINI_API_BASE must be an http(s) URL, got '{}'",
                self.gemini_api_base
            );
        }
        Ok(())
    }
}

/// Reads an env var, treating empty or whitespace-only values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
impl Config {
    pub fn for_tests(api_key: Option<&str>, api_base: &str) -> Self {
        Config {
            gemini_api_key: api_key.map(str::to_string),
            gemini_api_base: api_base.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            history_dir: None,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
