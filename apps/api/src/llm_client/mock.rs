//! Scripted in-memory provider for pipeline tests.
//!
//! Replays queued outcomes in call order and records every prompt it receives.
//! Once the queue is drained, the default outcome (if any) is repeated.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::{ProviderAdapter, ProviderError};

#[derive(Debug, Clone)]
pub enum Outcome {
    Reply(String),
    Fail(ProviderError),
    /// Sleeps before replying; used with paused tokio time to simulate slow backends.
    Delayed(Duration, String),
}

#[derive(Clone, Default)]
pub struct MockProvider {
    script: Arc<Mutex<VecDeque<Outcome>>>,
    default_outcome: Arc<Mutex<Option<Outcome>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose every call fails with `CallFailed`.
    pub fn always_failing() -> Self {
        Self::new().with_default(Outcome::Fail(ProviderError::call_failed(
            "mock",
            "connection refused",
        )))
    }

    pub fn then_reply(self, text: impl Into<String>) -> Self {
        self.push(Outcome::Reply(text.into()))
    }

    pub fn then_fail(self, error: ProviderError) -> Self {
        self.push(Outcome::Fail(error))
    }

    pub fn then_delay(self, delay: Duration, text: impl Into<String>) -> Self {
        self.push(Outcome::Delayed(delay, text.into()))
    }

    pub fn with_default(self, outcome: Outcome) -> Self {
        *self.default_outcome.lock().unwrap() = Some(outcome);
        self
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn push(self, outcome: Outcome) -> Self {
        self.script.lock().unwrap().push_back(outcome);
        self
    }

    fn next_outcome(&self) -> Option<Outcome> {
        let queued = self.script.lock().unwrap().pop_front();
        queued.or_else(|| self.default_outcome.lock().unwrap().clone())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, _system: &str, prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        match self.next_outcome() {
            Some(Outcome::Reply(text)) => Ok(text),
            Some(Outcome::Fail(error)) => Err(error),
            Some(Outcome::Delayed(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            None => Err(ProviderError::call_failed("mock", "no scripted outcome")),
        }
    }
}
