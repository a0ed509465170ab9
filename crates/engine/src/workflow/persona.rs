//! Agent Personas
//!
//! Role framings prefixed to prompts for each step type, and the task
//! instructions the LLM-backed steps send through the completion layer.

use super::model::StepKind;

/// Natural-language role description for a step type. Total over all six
/// kinds; `clean_text` runs locally and never reaches a prompt.
pub fn persona(kind: StepKind) -> &'static str {
    match kind {
        StepKind::CleanText => {
            "You are a data sanitizer who normalizes messy whitespace without touching content."
        }
        StepKind::Summarize => {
            "You are an executive briefer who distills long documents into their essential message."
        }
        StepKind::ExtractKeyPoints => {
            "You are a meticulous analyst who isolates the load-bearing facts in any text."
        }
        StepKind::AnalyzeSentiment => {
            "You are an empathic reviewer who judges the emotional tone of writing."
        }
        StepKind::ExtractActionItems => {
            "You are a project coordinator who turns prose into concrete follow-ups."
        }
        StepKind::RewritePolite => {
            "You are a diplomatic editor who softens blunt language without losing meaning."
        }
    }
}

/// Persona-prefixed instruction for an LLM-backed step, including the JSON
/// shape the structured validator expects back.
pub fn instruction(kind: StepKind) -> String {
    let task = match kind {
        StepKind::Summarize => {
            "Summarize the following text concisely. \
             Respond with a JSON object: {\"summary\": string}."
        }
        StepKind::ExtractKeyPoints => {
            "Extract the main key points from the following text. \
             Respond with a JSON object: {\"points\": [string, ...]}."
        }
        StepKind::AnalyzeSentiment => {
            "Classify the sentiment of the following text as Positive, Negative, or Neutral \
             and explain why. Respond with a JSON object: \
             {\"sentiment\": \"Positive\"|\"Negative\"|\"Neutral\", \
             \"confidence\": number between 0 and 1 (optional), \"explanation\": string}."
        }
        StepKind::ExtractActionItems => {
            "Extract every action item from the following text. \
             Respond with a JSON object: {\"items\": [string, ...]}; \
             use an empty array when there are none."
        }
        StepKind::RewritePolite => {
            "Rewrite the following text in a polite, professional tone. \
             Respond with a JSON object: {\"tone_shift\": string describing the change, \
             \"rewritten\": string}."
        }
        // Local transform; kept so the mapping stays total.
        StepKind::CleanText => "Collapse all runs of whitespace into single spaces and trim.",
    };

    format!("{} {}", persona(kind), task)
}
