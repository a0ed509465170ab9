//! Step Execution
//!
//! Dispatches one step against its input and always produces exactly one
//! result: any internal error is caught at this boundary and converted into
//! a failed result with a descriptive output string.

use std::sync::Arc;
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use tokio::time::Instant;
use tracing::{error, info};

use super::{
    model::{StepKind, StepStatus, WorkflowStep, WorkflowStepResult},
    persona,
    schemas::{
        ActionItemsOutput, KeyPointsOutput, PoliteRewriteOutput, SentimentOutput, SummaryOutput,
    },
};
use crate::{
    llm::{request_structured, Completion, MockKind, RetryConfig},
    metrics,
};

/// Simulated processing cost for the local transform.
const CLEAN_TEXT_DELAY: Duration = Duration::from_millis(500);

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

pub struct StepExecutor {
    llm: Arc<dyn Completion>,
    retry: RetryConfig,
}

impl StepExecutor {
    pub fn new(llm: Arc<dyn Completion>, retry: RetryConfig) -> Self {
        Self { llm, retry }
    }

    /// Execute one step. Elapsed time is wall-clock from entry here to
    /// result construction, success or failure.
    pub async fn execute_step(&self, step: &WorkflowStep, input: &str) -> WorkflowStepResult {
        info!(step_id = %step.id, step_type = %step.kind, "executing step");
        let started = Instant::now();

        let outcome = match step.kind {
            StepKind::CleanText => {
                let output = clean_text(input);
                tokio::time::sleep(CLEAN_TEXT_DELAY).await;
                Ok(output)
            }
            StepKind::Summarize => self.summarize(input).await,
            StepKind::ExtractKeyPoints => self.extract_key_points(input).await,
            StepKind::AnalyzeSentiment => self.analyze_sentiment(input).await,
            StepKind::ExtractActionItems => self.extract_action_items(input).await,
            StepKind::RewritePolite => self.rewrite_polite(input).await,
        };

        let (status, output) = match outcome {
            Ok(output) => (StepStatus::Success, output),
            Err(e) => {
                error!(step_id = %step.id, step_type = %step.kind, error = %e, "step failed");
                metrics::STEP_FAILURES_TOTAL.inc();
                (StepStatus::Failed, format!("Error processing step: {e}"))
            }
        };

        WorkflowStepResult {
            step_id: step.id.clone(),
            step_type: step.kind,
            input: input.to_string(),
            output,
            status,
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }

    async fn summarize(&self, input: &str) -> crate::Result<String> {
        let out: SummaryOutput = self.request(input, StepKind::Summarize, MockKind::Summary).await?;
        Ok(out.summary)
    }

    async fn extract_key_points(&self, input: &str) -> crate::Result<String> {
        let out: KeyPointsOutput = self
            .request(input, StepKind::ExtractKeyPoints, MockKind::KeyPoints)
            .await?;
        let bullets: Vec<String> = out.points.iter().map(|p| format!("- {p}")).collect();
        Ok(bullets.join("\n"))
    }

    async fn analyze_sentiment(&self, input: &str) -> crate::Result<String> {
        let out: SentimentOutput = self
            .request(input, StepKind::AnalyzeSentiment, MockKind::Sentiment)
            .await?;
        let confidence = out
            .confidence
            .map(|c| format!("{:.0}%", c * 100.0))
            .unwrap_or_else(|| "N/A".to_string());
        Ok(format!(
            "Sentiment: {}\nConfidence: {}\nExplanation: {}",
            out.sentiment, confidence, out.explanation
        ))
    }

    async fn extract_action_items(&self, input: &str) -> crate::Result<String> {
        let out: ActionItemsOutput = self
            .request(input, StepKind::ExtractActionItems, MockKind::ActionItems)
            .await?;
        if out.items.is_empty() {
            return Ok("No specific action items detected.".to_string());
        }
        let checklist: Vec<String> = out
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. [ ] {}", i + 1, item))
            .collect();
        Ok(checklist.join("\n"))
    }

    async fn rewrite_polite(&self, input: &str) -> crate::Result<String> {
        let out: PoliteRewriteOutput = self
            .request(input, StepKind::RewritePolite, MockKind::PoliteRewrite)
            .await?;
        Ok(format!("Tone Shift: {}\n\n{}", out.tone_shift, out.rewritten))
    }

    async fn request<T: crate::llm::StructuredOutput>(
        &self,
        input: &str,
        kind: StepKind,
        mock: MockKind,
    ) -> crate::Result<T> {
        request_structured(
            self.llm.as_ref(),
            input,
            &persona::instruction(kind),
            mock,
            &self.retry,
        )
        .await
    }
}

/// Collapse all consecutive whitespace (including newlines and tabs) into a
/// single ASCII space, then trim.
pub fn clean_text(input: &str) -> String {
    WHITESPACE.replace_all(input, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionRequest, LlmRouter};
    use async_trait::async_trait;

    fn step(id: &str, kind: StepKind) -> WorkflowStep {
        WorkflowStep {
            id: id.to_string(),
            kind,
            params: None,
        }
    }

    fn mock_executor() -> StepExecutor {
        StepExecutor::new(Arc::new(LlmRouter::mock_only()), RetryConfig::default())
    }

    /// Always answers with unparseable text, so every LLM step exhausts
    /// its retries.
    struct GarbageCompletion;

    #[async_trait]
    impl Completion for GarbageCompletion {
        async fn complete(&self, _req: CompletionRequest<'_>) -> String {
            "no json here".to_string()
        }
    }

    #[test]
    fn clean_text_collapses_mixed_whitespace() {
        assert_eq!(clean_text("  Hello \t\n  World  "), "Hello World");
        assert_eq!(clean_text("a\n\nb\tc"), "a b c");
    }

    #[test]
    fn clean_text_is_idempotent() {
        let once = clean_text("  foo \n bar\t baz ");
        assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn clean_text_preserves_word_sequence() {
        assert_eq!(clean_text("one  two   three"), clean_text("one two three"));
    }

    #[tokio::test(start_paused = true)]
    async fn clean_text_step_succeeds() {
        let result = mock_executor()
            .execute_step(&step("1", StepKind::CleanText), "  Hello   World  ")
            .await;
        assert_eq!(result.status, StepStatus::Success);
        assert_eq!(result.output, "Hello World");
        assert_eq!(result.input, "  Hello   World  ");
        assert!(result.duration_ms >= 500);
    }

    #[tokio::test(start_paused = true)]
    async fn mock_sentiment_is_tagged() {
        let result = mock_executor()
            .execute_step(&step("2", StepKind::AnalyzeSentiment), "Test")
            .await;
        assert_eq!(result.status, StepStatus::Success);
        assert!(result.output.contains("[MOCK]"));
        assert!(result.output.contains("Sentiment"));
        assert!(result.output.contains("Confidence"));
    }

    #[tokio::test(start_paused = true)]
    async fn mock_key_points_are_bulleted() {
        let result = mock_executor()
            .execute_step(&step("3", StepKind::ExtractKeyPoints), "Test")
            .await;
        assert_eq!(result.status, StepStatus::Success);
        assert!(result.output.contains("[MOCK]"));
        assert!(result.output.starts_with("- "));
    }

    #[tokio::test(start_paused = true)]
    async fn mock_action_items_are_a_numbered_checklist() {
        let result = mock_executor()
            .execute_step(&step("4", StepKind::ExtractActionItems), "Test")
            .await;
        assert_eq!(result.status, StepStatus::Success);
        assert!(result.output.contains("[MOCK]"));
        assert!(result.output.starts_with("1. [ ]"));
    }

    #[tokio::test(start_paused = true)]
    async fn mock_polite_rewrite_reports_tone_shift() {
        let result = mock_executor()
            .execute_step(&step("5", StepKind::RewritePolite), "Test")
            .await;
        assert_eq!(result.status, StepStatus::Success);
        assert!(result.output.contains("Tone Shift"));
        assert!(result.output.contains("[MOCK]"));
    }

    #[tokio::test(start_paused = true)]
    async fn mock_summary_is_tagged() {
        let result = mock_executor()
            .execute_step(&step("6", StepKind::Summarize), "Test")
            .await;
        assert_eq!(result.status, StepStatus::Success);
        assert!(result.output.contains("[MOCK]"));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_validation_becomes_a_failed_result() {
        let executor = StepExecutor::new(Arc::new(GarbageCompletion), RetryConfig::default());
        let result = executor
            .execute_step(&step("7", StepKind::Summarize), "Test")
            .await;
        assert_eq!(result.status, StepStatus::Failed);
        assert!(result.output.starts_with("Error processing step:"));
        assert!(result.output.contains("summary"));
    }
}
