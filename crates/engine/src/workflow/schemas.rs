//! Structured Output Schemas
//!
//! Typed shapes for what each LLM-backed step expects back from the model,
//! with the runtime contracts the validator checks before a step may format
//! its display output.

use serde::Deserialize;

use crate::llm::{SchemaError, StructuredOutput};

pub const SENTIMENT_LABELS: [&str; 3] = ["Positive", "Negative", "Neutral"];

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryOutput {
    pub summary: String,
}

impl StructuredOutput for SummaryOutput {
    const SCHEMA_NAME: &'static str = "summary";

    fn validate(&self) -> Result<(), SchemaError> {
        if self.summary.trim().is_empty() {
            return Err(SchemaError("summary must not be empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyPointsOutput {
    pub points: Vec<String>,
}

impl StructuredOutput for KeyPointsOutput {
    const SCHEMA_NAME: &'static str = "key_points";

    fn validate(&self) -> Result<(), SchemaError> {
        if self.points.is_empty() {
            return Err(SchemaError("points must contain at least one entry".to_string()));
        }
        if self.points.iter().any(|p| p.trim().is_empty()) {
            return Err(SchemaError("points must not contain empty entries".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SentimentOutput {
    pub sentiment: String,
    pub confidence: Option<f64>,
    pub explanation: String,
}

impl StructuredOutput for SentimentOutput {
    const SCHEMA_NAME: &'static str = "sentiment";

    fn validate(&self) -> Result<(), SchemaError> {
        if !SENTIMENT_LABELS
            .iter()
            .any(|label| label.eq_ignore_ascii_case(&self.sentiment))
        {
            return Err(SchemaError(format!(
                "sentiment must be one of {:?}, got {:?}",
                SENTIMENT_LABELS, self.sentiment
            )));
        }
        if let Some(confidence) = self.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(SchemaError(format!(
                    "confidence must be within 0.0..=1.0, got {confidence}"
                )));
            }
        }
        if self.explanation.trim().is_empty() {
            return Err(SchemaError("explanation must not be empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionItemsOutput {
    pub items: Vec<String>,
}

impl StructuredOutput for ActionItemsOutput {
    const SCHEMA_NAME: &'static str = "action_items";

    // An empty list is valid; the step renders it as "no items".
    fn validate(&self) -> Result<(), SchemaError> {
        if self.items.iter().any(|item| item.trim().is_empty()) {
            return Err(SchemaError("items must not contain empty entries".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoliteRewriteOutput {
    pub tone_shift: String,
    pub rewritten: String,
}

impl StructuredOutput for PoliteRewriteOutput {
    const SCHEMA_NAME: &'static str = "polite_rewrite";

    fn validate(&self) -> Result<(), SchemaError> {
        if self.tone_shift.trim().is_empty() {
            return Err(SchemaError("tone_shift must not be empty".to_string()));
        }
        if self.rewritten.trim().is_empty() {
            return Err(SchemaError("rewritten must not be empty".to_string()));
        }
        Ok(())
    }
}
