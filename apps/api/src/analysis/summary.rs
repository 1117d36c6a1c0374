//! Summary Composer — best-effort narrative synthesis of a normalized result.
//!
//! Never fails: any provider error, timeout or blank reply yields an empty string.
//! The numeric analysis must not depend on this step.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::analysis::models::AnalysisResult;
use crate::analysis::prompts::{build_summary_prompt, SUMMARY_SYSTEM};
use crate::llm_client::ProviderAdapter;

/// Characters of the original document shown to the summarizer.
pub const SUMMARY_EXCERPT_CHARS: usize = 1_500;

#[derive(Debug, Clone)]
pub struct SummaryComposer {
    char_budget: usize,
    timeout: Duration,
}

impl SummaryComposer {
    pub fn new(char_budget: usize, timeout: Duration) -> Self {
        Self {
            char_budget,
            timeout,
        }
    }

    /// Returns a narrative of at most `char_budget` characters, or `""` on any failure.
    /// The call is bounded by the composer's own timeout and by `deadline`, whichever is sooner.
    pub async fn compose(
        &self,
        provider: &dyn ProviderAdapter,
        document: &str,
        result: &AnalysisResult,
        deadline: Instant,
    ) -> String {
        if self.char_budget == 0 {
            return String::new();
        }

        let excerpt = truncate_chars(document.trim(), SUMMARY_EXCERPT_CHARS);
        let prompt = build_summary_prompt(excerpt, result, self.char_budget);
        let budget = self.call_budget(deadline, Instant::now());

        match tokio::time::timeout(budget, provider.complete(SUMMARY_SYSTEM, &prompt)).await {
            Ok(Ok(reply)) => {
                let narrative = truncate_chars(clean_reply(&reply), self.char_budget)
                    .trim_end()
                    .to_string();
                if narrative.is_empty() {
                    warn!("Narrative summary reply was blank");
                }
                debug!("Narrative summary composed ({} chars)", narrative.chars().count());
                narrative
            }
            Ok(Err(e)) => {
                warn!(error_kind = e.kind(), "Narrative summary skipped: {e}");
                String::new()
            }
            Err(_) => {
                warn!(
                    "Narrative summary skipped: timed out after {}ms",
                    budget.as_millis()
                );
                String::new()
            }
        }
    }

    /// Time allowed for the summary call started at `now`: the composer timeout, capped by `deadline`.
    fn call_budget(&self, deadline: Instant, now: Instant) -> Duration {
        deadline.saturating_duration_since(now).min(self.timeout)
    }
}

/// Truncates to at most `max_chars` characters, always on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Strips fences and wrapping quotes models sometimes put around prose.
fn clean_reply(reply: &str) -> &str {
    let mut text = reply.trim();
    if let Some(inner) = text.strip_prefix("```").and_then(|t| t.strip_suffix("```")) {
        text = inner.trim();
    }
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        text = text[1..text.len() - 1].trim();
    }
    text
}
