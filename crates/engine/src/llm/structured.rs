//! Structured Output Validation
//!
//! Language models are unreliable at producing strictly valid structured
//! output. Each attempt extracts the first balanced JSON substring from the
//! raw response, parses it, and runs the schema's typed validation; a failed
//! attempt amends the instruction with the concrete validation error before
//! retrying, so the model gets told what to fix rather than being asked the
//! same thing again.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::mock::MockKind;
use super::router::{Completion, CompletionRequest, ResponseFormat};
use crate::{Error, Result};

/// Validation failure detail, carried as a value so the retry loop can
/// branch on it without exceptions for control flow.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct SchemaError(pub String);

/// A typed output shape for one LLM-backed step.
pub trait StructuredOutput: DeserializeOwned {
    const SCHEMA_NAME: &'static str;

    fn validate(&self) -> std::result::Result<(), SchemaError>;
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff_base: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff_base: Duration::from_secs(1),
        }
    }
}

/// Ask the completion layer for a value conforming to `T`, retrying with
/// feedback until the attempt cap is exhausted.
pub async fn request_structured<T: StructuredOutput>(
    llm: &dyn Completion,
    input: &str,
    instruction: &str,
    mock: MockKind,
    retry: &RetryConfig,
) -> Result<T> {
    let mut amended = instruction.to_string();
    let mut last_error = String::new();

    for attempt in 1..=retry.max_attempts {
        let raw = llm
            .complete(CompletionRequest {
                input,
                instruction: &amended,
                format: ResponseFormat::Json,
                mock,
            })
            .await;

        match parse_and_validate::<T>(&raw) {
            Ok(value) => {
                debug!(schema = T::SCHEMA_NAME, attempt, "structured output accepted");
                return Ok(value);
            }
            Err(SchemaError(detail)) => {
                warn!(
                    schema = T::SCHEMA_NAME,
                    attempt,
                    error = %detail,
                    "structured output rejected"
                );
                last_error = detail;
            }
        }

        if attempt < retry.max_attempts {
            amended = format!(
                "{instruction}\n\nYour previous reply was rejected: {last_error}. \
                 Respond again and strictly conform to the expected JSON shape.",
            );
            tokio::time::sleep(retry.backoff_base * attempt).await;
        }
    }

    Err(Error::Schema {
        schema: T::SCHEMA_NAME,
        attempts: retry.max_attempts,
        detail: last_error,
    })
}

fn parse_and_validate<T: StructuredOutput>(raw: &str) -> std::result::Result<T, SchemaError> {
    let extracted = extract_json(raw)
        .ok_or_else(|| SchemaError("response contains no JSON object or array".to_string()))?;

    // Models sometimes emit literal \n escapes mid-string.
    let normalized = extracted.replace("\\n", " ");

    let value: T = serde_json::from_str(&normalized)
        .map_err(|e| SchemaError(format!("invalid JSON: {e}")))?;
    value.validate()?;
    Ok(value)
}

/// Extract the first balanced JSON object or array substring, respecting
/// string literals and escapes.
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let bytes = text.as_bytes();
    let open = bytes[start];
    let close = if open == b'{' { b'}' } else { b']' };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            _ if b == open => depth += 1,
            _ if b == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}
