//! OpenAI-compatible chat completions backend (OpenAI, Groq, Together.ai, ...).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{http_client, require_key, ProviderAdapter, ProviderError};

const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const MAX_TOKENS: u32 = 4096;
const TEMPERATURE: f32 = 0.2;
const PROVIDER: &str = "openai";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatError {
    error: ChatErrorBody,
}

#[derive(Debug, Deserialize)]
struct ChatErrorBody {
    message: String,
}

pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl OpenAiProvider {
    /// Fails with `ProviderError::Unavailable` when the key is missing or blank.
    pub fn new(
        api_key: Option<&str>,
        base_url: &str,
        model: Option<&str>,
    ) -> Result<Self, ProviderError> {
        let api_key = require_key(PROVIDER, ENV_API_KEY, api_key)?;
        Ok(Self {
            client: http_client(PROVIDER)?,
            api_key,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
        })
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::call_failed(PROVIDER, format!("HTTP error: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("OpenAI-compatible API returned {}: {}", status, body);
            return Err(ProviderError::call_failed(
                PROVIDER,
                format!("API error (status {}): {}", status.as_u16(), error_message(&body)),
            ));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            ProviderError::call_failed(PROVIDER, format!("undecodable response: {e}"))
        })?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "OpenAI-compatible call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        first_choice_text(parsed)
            .ok_or_else(|| ProviderError::call_failed(PROVIDER, "LLM returned empty content"))
    }
}

fn first_choice_text(response: ChatResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.trim().is_empty())
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ChatError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}
