use anyhow::{bail, Context, Result};

use crate::llm_client::ANTHROPIC_API_URL;

const DEFAULT_PORT: &str = "8080";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is malformed or a required one is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub enable_llm_suggestions: bool,
    /// Required only when LLM suggestions are enabled.
    pub anthropic_api_key: Option<String>,
    pub anthropic_api_url: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let enable_llm_suggestions = match lookup("ENABLE_LLM_SUGGESTIONS") {
            Some(value) => parse_bool(&value)
                .with_context(|| format!("ENABLE_LLM_SUGGESTIONS must be a boolean, got '{value}'"))?,
            None => false,
        };

        let anthropic_api_key = lookup("ANTHROPIC_API_KEY").filter(|k| !k.trim().is_empty());
        if enable_llm_suggestions && anthropic_api_key.is_none() {
            bail!("Required environment variable 'ANTHROPIC_API_KEY' is not set (ENABLE_LLM_SUGGESTIONS=true)");
        }

        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| DEFAULT_PORT.to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            enable_llm_suggestions,
            anthropic_api_key,
            anthropic_api_url: lookup("ANTHROPIC_API_URL")
                .unwrap_or_else(|| ANTHROPIC_API_URL.to_string()),
            max_upload_bytes: match lookup("MAX_UPLOAD_BYTES") {
                Some(value) => value
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a positive integer")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
        })
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => bail!("not a boolean"),
    }
}
