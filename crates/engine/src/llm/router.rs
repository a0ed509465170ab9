//! Unified LLM Caller
//!
//! Tries configured providers in a fixed priority order and falls back to
//! the deterministic mock layer when none succeeds. Total exhaustion is not
//! an error here: the router always returns a response string.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{
    mock::{self, MockKind, MOCK_DELAY},
    provider::{GeminiProvider, HuggingFaceProvider, LlmProvider},
};
use crate::config::LlmConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub input: &'a str,
    pub instruction: &'a str,
    pub format: ResponseFormat,
    pub mock: MockKind,
}

/// The seam the validator and step executors call through.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, req: CompletionRequest<'_>) -> String;
}

pub struct LlmRouter {
    providers: Vec<Arc<dyn LlmProvider>>,
    mock_delay: Duration,
}

impl LlmRouter {
    pub fn from_config(config: &LlmConfig) -> Self {
        let mut providers: Vec<Arc<dyn LlmProvider>> = Vec::new();

        if let Some(key) = &config.primary_api_key {
            providers.push(Arc::new(HuggingFaceProvider::new(
                key.clone(),
                &config.primary_model,
            )));
        }
        if let Some(key) = &config.fallback_api_key {
            providers.push(Arc::new(GeminiProvider::new(
                key.clone(),
                &config.fallback_model,
            )));
        }

        Self {
            providers,
            mock_delay: MOCK_DELAY,
        }
    }

    /// Router with no providers at all; every call lands on the mock layer.
    pub fn mock_only() -> Self {
        Self {
            providers: Vec::new(),
            mock_delay: MOCK_DELAY,
        }
    }

    #[cfg(test)]
    pub fn with_providers(providers: Vec<Arc<dyn LlmProvider>>) -> Self {
        Self {
            providers,
            mock_delay: Duration::from_millis(0),
        }
    }
}

#[async_trait]
impl Completion for LlmRouter {
    async fn complete(&self, req: CompletionRequest<'_>) -> String {
        let prompt = format!("{}:\n\n{}", req.instruction, req.input);

        // A failing provider only forfeits its priority slot.
        for provider in &self.providers {
            match provider.generate(&prompt).await {
                Ok(text) if !text.is_empty() => {
                    debug!(provider = provider.name(), "provider call succeeded");
                    return text;
                }
                Ok(_) => {
                    warn!(
                        provider = provider.name(),
                        "provider returned an empty response, falling through"
                    );
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "provider call failed, falling through"
                    );
                }
            }
        }

        tokio::time::sleep(self.mock_delay).await;
        mock::render(&req)
    }
}
