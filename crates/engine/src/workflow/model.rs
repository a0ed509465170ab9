use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The six step types a pipeline can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    CleanText,
    Summarize,
    ExtractKeyPoints,
    AnalyzeSentiment,
    ExtractActionItems,
    RewritePolite,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepKind::CleanText => "clean_text",
            StepKind::Summarize => "summarize",
            StepKind::ExtractKeyPoints => "extract_key_points",
            StepKind::AnalyzeSentiment => "analyze_sentiment",
            StepKind::ExtractActionItems => "extract_action_items",
            StepKind::RewritePolite => "rewrite_polite",
        };
        write!(f, "{name}")
    }
}

/// One configured transformation unit. Immutable once created; owned by the
/// caller and passed by value into the runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: StepKind,
    /// Free-form parameters; part of the contract but unused by the
    /// current step types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<JsonValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Success,
    Failed,
    /// Part of the wire contract; the current engine never emits it.
    AugmentFailed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Success => write!(f, "success"),
            RunStatus::Failed => write!(f, "failed"),
            RunStatus::AugmentFailed => write!(f, "augment_failed"),
        }
    }
}

impl FromStr for RunStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "success" => Ok(RunStatus::Success),
            "failed" => Ok(RunStatus::Failed),
            "augment_failed" => Ok(RunStatus::AugmentFailed),
            other => Err(crate::Error::Validation(format!(
                "unknown run status: {other}"
            ))),
        }
    }
}

/// Outcome of a single step execution. Constructed exactly once, never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStepResult {
    pub step_id: String,
    pub step_type: StepKind,
    pub input: String,
    pub output: String,
    pub status: StepStatus,
    pub duration_ms: u64,
}

/// One execution of an ordered step list against an input. `duration_ms`
/// is the sum of step durations, excluding persistence overhead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRunResult {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub steps: Vec<WorkflowStepResult>,
    pub status: RunStatus,
    pub original_input: String,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_kind_round_trips_through_snake_case() {
        let kind: StepKind = serde_json::from_str(r#""extract_key_points""#).unwrap();
        assert_eq!(kind, StepKind::ExtractKeyPoints);
        assert_eq!(
            serde_json::to_string(&StepKind::RewritePolite).unwrap(),
            r#""rewrite_polite""#
        );
    }

    #[test]
    fn unknown_step_kind_is_rejected() {
        assert!(serde_json::from_str::<StepKind>(r#""translate""#).is_err());
    }

    #[test]
    fn step_result_serializes_camel_case() {
        let result = WorkflowStepResult {
            step_id: "1".to_string(),
            step_type: StepKind::CleanText,
            input: "in".to_string(),
            output: "out".to_string(),
            status: StepStatus::Success,
            duration_ms: 12,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["stepId"], "1");
        assert_eq!(json["stepType"], "clean_text");
        assert_eq!(json["durationMs"], 12);
        assert_eq!(json["status"], "success");
    }

    #[test]
    fn run_status_display_matches_wire_labels() {
        assert_eq!(RunStatus::AugmentFailed.to_string(), "augment_failed");
        assert_eq!(
            "augment_failed".parse::<RunStatus>().unwrap(),
            RunStatus::AugmentFailed
        );
        assert!("bogus".parse::<RunStatus>().is_err());
    }
}
