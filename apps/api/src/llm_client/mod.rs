/// LLM Client — the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call a provider API directly.
/// All LLM interactions MUST go through a `ProviderAdapter` built here.
///
/// Adapters never retry. Retry, backoff and deadlines belong to the analysis orchestrator.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::info;

use crate::config::{ProviderConfig, ProviderKind};

pub mod anthropic;
#[cfg(test)]
pub mod mock;
pub mod openai;
pub mod prompts;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;

/// Transport-level ceiling for a single HTTP exchange. The orchestrator applies
/// tighter per-stage budgets on top of this.
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    /// Missing or invalid credentials, detected when the adapter is built.
    #[error("provider {provider} unavailable: {reason}")]
    Unavailable {
        provider: &'static str,
        reason: String,
    },

    /// Network error, non-success status, undecodable envelope or timeout.
    #[error("provider {provider} call failed: {detail}")]
    CallFailed {
        provider: &'static str,
        detail: String,
    },
}

impl ProviderError {
    pub fn call_failed(provider: &'static str, detail: impl Into<String>) -> Self {
        ProviderError::CallFailed {
            provider,
            detail: detail.into(),
        }
    }

    /// Short machine-friendly label used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Unavailable { .. } => "provider_unavailable",
            ProviderError::CallFailed { .. } => "provider_call_failed",
        }
    }
}

/// A single text-generation backend behind a uniform completion call.
///
/// Carried by the orchestrator as `Arc<dyn ProviderAdapter>`, selected at startup via config.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Backend label for logs.
    fn name(&self) -> &'static str;

    /// Sends one prompt and returns the raw, untrusted reply text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ProviderError>;
}

/// Builds the configured backend. Credential absence is reported here, never at call time.
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn ProviderAdapter>, ProviderError> {
    let provider: Arc<dyn ProviderAdapter> = match config.kind {
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(
            config.anthropic_api_key.as_deref(),
            config.model.as_deref(),
        )?),
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(
            config.openai_api_key.as_deref(),
            &config.openai_base_url,
            config.model.as_deref(),
        )?),
    };
    info!("LLM provider initialized: {}", provider.name());
    Ok(provider)
}

/// Validates an API key, rejecting missing or blank values.
pub(crate) fn require_key(
    provider: &'static str,
    env_key: &str,
    api_key: Option<&str>,
) -> Result<String, ProviderError> {
    match api_key.map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => Err(ProviderError::Unavailable {
            provider,
            reason: format!("{env_key} is not set"),
        }),
    }
}

pub(crate) fn http_client(provider: &'static str) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| ProviderError::Unavailable {
            provider,
            reason: format!("failed to build HTTP client: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_config(kind: ProviderKind) -> ProviderConfig {
        ProviderConfig {
            kind,
            anthropic_api_key: None,
            openai_api_key: None,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            model: None,
        }
    }

    #[test]
    fn test_missing_anthropic_key_is_unavailable_at_construction() {
        let err = build_provider(&provider_config(ProviderKind::Anthropic))
            .err()
            .expect("missing key must fail");
        assert!(matches!(err, ProviderError::Unavailable { provider: "anthropic", .. }));
        assert_eq!(err.kind(), "provider_unavailable");
    }

    #[test]
    fn test_blank_openai_key_is_unavailable_at_construction() {
        let mut config = provider_config(ProviderKind::OpenAi);
        config.openai_api_key = Some("   ".to_string());
        let err = build_provider(&config).err().expect("blank key must fail");
        assert!(matches!(err, ProviderError::Unavailable { provider: "openai", .. }));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_present_key_builds_selected_backend() {
        let mut config = provider_config(ProviderKind::OpenAi);
        config.openai_api_key = Some("sk-test".to_string());
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "openai");

        let mut config = provider_config(ProviderKind::Anthropic);
        config.anthropic_api_key = Some("sk-ant-test".to_string());
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "anthropic");
    }

    #[test]
    fn test_call_failed_kind_label() {
        let err = ProviderError::call_failed("openai", "HTTP 503");
        assert_eq!(err.kind(), "provider_call_failed");
        assert!(err.to_string().contains("HTTP 503"));
    }
}
