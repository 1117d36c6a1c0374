use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::analysis::orchestrator::AnalysisSettings;

/// Which text-generation backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Anthropic,
    /// OpenAI-compatible API (OpenAI, Groq, Together.ai, etc.)
    OpenAi,
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "openai" | "groq" | "together" => Ok(Self::OpenAi),
            other => bail!("Unknown LLM_PROVIDER '{other}' (expected 'anthropic' or 'openai')"),
        }
    }
}

/// Provider selection and credentials. Credentials are optional here on purpose:
/// their absence is reported by the adapter constructor as `ProviderError::Unavailable`.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: Option<String>,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderConfig,
    pub analysis: AnalysisSettings,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let provider = ProviderConfig {
            kind: optional_env("LLM_PROVIDER")
                .unwrap_or_else(|| "anthropic".to_string())
                .parse()?,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            model: optional_env("LLM_MODEL"),
        };

        let defaults = AnalysisSettings::default();
        let analysis = AnalysisSettings {
            analysis_timeout: Duration::from_secs(parse_env(
                "ANALYSIS_TIMEOUT_SECS",
                defaults.analysis_timeout.as_secs(),
            )?),
            summary_timeout: Duration::from_secs(parse_env(
                "SUMMARY_TIMEOUT_SECS",
                defaults.summary_timeout.as_secs(),
            )?),
            max_retries: parse_env("ANALYSIS_MAX_RETRIES", defaults.max_retries)?,
            retry_backoff: Duration::from_millis(parse_env(
                "ANALYSIS_RETRY_BACKOFF_MS",
                defaults.retry_backoff.as_millis() as u64,
            )?),
            summary_char_budget: parse_env("SUMMARY_CHAR_BUDGET", defaults.summary_char_budget)?,
            summary_enabled: parse_env("SUMMARY_ENABLED", defaults.summary_enabled)?,
        };

        Ok(Config {
            provider,
            analysis,
            port: parse_env("PORT", 8080u16)?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Reads a variable, treating unset and blank values alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
