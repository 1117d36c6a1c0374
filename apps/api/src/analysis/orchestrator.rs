//! Analysis Orchestrator — sequences the pipeline and owns the fallback decision.
//!
//! Flow: Prompting → AwaitingProvider → Parsing → Normalizing → Enriching → Done.
//! Any failure before Enriching moves straight to the fallback dataset. Enriching
//! failures only blank the narrative. Callers always get a valid `AnalysisResult`;
//! the only trace of a fallback is the diagnostic log.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::analysis::fallback::fallback_result;
use crate::analysis::models::{AnalysisRequest, AnalysisResult};
use crate::analysis::normalizer::{normalize, NormalizeError};
use crate::analysis::prompts::{build_analysis_prompt, ANALYSIS_SYSTEM};
use crate::analysis::response_parser::{parse_reply, ParseError};
use crate::analysis::summary::SummaryComposer;
use crate::llm_client::{ProviderAdapter, ProviderError};

/// Tunables for one deployment. The enrichment budget should stay well below the
/// primary budget so a slow summarizer never holds up the numeric result.
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub analysis_timeout: Duration,
    pub summary_timeout: Duration,
    /// Retries of the primary call on `CallFailed`. The summary call is never retried.
    pub max_retries: u32,
    /// First backoff delay; doubles on each retry.
    pub retry_backoff: Duration,
    pub summary_char_budget: usize,
    pub summary_enabled: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            analysis_timeout: Duration::from_secs(90),
            summary_timeout: Duration::from_secs(15),
            max_retries: 1,
            retry_backoff: Duration::from_millis(1000),
            summary_char_budget: 500,
            summary_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Prompting,
    AwaitingProvider,
    Parsing,
    Normalizing,
    Enriching,
}

/// Every way the primary path can fail. All of them end in the fallback transition.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

impl PipelineError {
    /// The stage the pipeline was in when it failed.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Provider(ProviderError::Unavailable { .. }) => Stage::Prompting,
            PipelineError::Provider(ProviderError::CallFailed { .. }) => Stage::AwaitingProvider,
            PipelineError::Parse(_) => Stage::Parsing,
            PipelineError::Normalize(_) => Stage::Normalizing,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Provider(e) => e.kind(),
            PipelineError::Parse(e) => e.kind(),
            PipelineError::Normalize(e) => e.kind(),
        }
    }
}

pub struct AnalysisOrchestrator {
    provider: Result<Arc<dyn ProviderAdapter>, ProviderError>,
    settings: AnalysisSettings,
    composer: SummaryComposer,
}

impl AnalysisOrchestrator {
    /// Accepts the outcome of `build_provider` as-is: an unavailable provider is kept
    /// so that every call falls back and reports the configuration defect.
    pub fn new(
        provider: Result<Arc<dyn ProviderAdapter>, ProviderError>,
        settings: AnalysisSettings,
    ) -> Self {
        let composer = SummaryComposer::new(settings.summary_char_budget, settings.summary_timeout);
        Self {
            provider,
            settings,
            composer,
        }
    }

    /// Runs the pipeline under the configured stage budgets. Never fails.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        self.run(request, None).await
    }

    /// Like `analyze`, but every stage also stops at the caller's `deadline`.
    /// Expiry during the primary call counts as `ProviderCallFailed`.
    #[allow(dead_code)]
    pub async fn analyze_with_deadline(
        &self,
        request: &AnalysisRequest,
        deadline: Instant,
    ) -> AnalysisResult {
        self.run(request, Some(deadline)).await
    }

    /// The primary path only (no enrichment, no fallback), as a tagged result.
    #[allow(dead_code)]
    pub async fn run_primary(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, PipelineError> {
        self.primary_until(request, Instant::now() + self.settings.analysis_timeout)
            .await
    }

    async fn run(&self, request: &AnalysisRequest, deadline: Option<Instant>) -> AnalysisResult {
        let analysis_id = Uuid::new_v4();
        let span = info_span!(
            "analysis",
            %analysis_id,
            document_type = request.document_type().as_str()
        );

        async move {
            let started = Instant::now();
            let mut primary_deadline = started + self.settings.analysis_timeout;
            if let Some(deadline) = deadline {
                primary_deadline = primary_deadline.min(deadline);
            }

            let mut result = match self.primary_until(request, primary_deadline).await {
                Ok(result) => result,
                Err(e) => {
                    log_fallback(&e);
                    return self.fallback();
                }
            };

            if let (true, Ok(provider)) = (self.settings.summary_enabled, &self.provider) {
                debug!(stage = ?Stage::Enriching, "Composing narrative summary");
                let enrich_deadline =
                    deadline.unwrap_or_else(|| Instant::now() + self.settings.summary_timeout);
                result.narrative_summary = self
                    .composer
                    .compose(&**provider, request.content(), &result, enrich_deadline)
                    .await;
            }

            info!(
                tasks = result.summary.total,
                automation_potential = result.summary.automation_potential_percent,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Analysis complete"
            );
            result
        }
        .instrument(span)
        .await
    }

    /// The fallback dataset, with its narrative dropped when it does not fit the budget.
    fn fallback(&self) -> AnalysisResult {
        let mut result = fallback_result();
        if result.narrative_summary.chars().count() > self.settings.summary_char_budget {
            result.narrative_summary.clear();
        }
        result
    }

    async fn primary_until(
        &self,
        request: &AnalysisRequest,
        deadline: Instant,
    ) -> Result<AnalysisResult, PipelineError> {
        let provider = self.provider.as_ref().map_err(Clone::clone)?;

        debug!(stage = ?Stage::Prompting, "Building analysis prompt");
        let prompt = build_analysis_prompt(request);

        debug!(stage = ?Stage::AwaitingProvider, provider = provider.name(), "Calling provider");
        let reply = tokio::time::timeout_at(deadline, self.complete_with_retry(&**provider, &prompt))
            .await
            .map_err(|_| {
                ProviderError::call_failed(provider.name(), "analysis call timed out before the deadline")
            })??;

        debug!(stage = ?Stage::Parsing, reply_chars = reply.len(), "Parsing provider reply");
        let value = parse_reply(&reply)?;

        debug!(stage = ?Stage::Normalizing, "Normalizing provider output");
        Ok(normalize(&value)?)
    }

    /// Retries `CallFailed` with exponential backoff. `Unavailable` is never retried.
    async fn complete_with_retry(
        &self,
        provider: &dyn ProviderAdapter,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        let mut attempt: u32 = 0;
        loop {
            match provider.complete(ANALYSIS_SYSTEM, prompt).await {
                Ok(reply) => return Ok(reply),
                Err(e @ ProviderError::CallFailed { .. }) if attempt < self.settings.max_retries => {
                    let delay = self
                        .settings
                        .retry_backoff
                        .saturating_mul(2u32.saturating_pow(attempt));
                    warn!(
                        "Analysis call attempt {} failed ({e}), retrying after {}ms...",
                        attempt + 1,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Out-of-band signal that a fallback happened. Configuration defects are logged loudly.
fn log_fallback(e: &PipelineError) {
    match e {
        PipelineError::Provider(ProviderError::Unavailable { .. }) => error!(
            stage = ?e.stage(),
            error_kind = e.kind(),
            "Provider misconfigured, returning fallback analysis: {e}"
        ),
        _ => warn!(
            stage = ?e.stage(),
            error_kind = e.kind(),
            "Analysis failed, returning fallback analysis: {e}"
        ),
    }
}
