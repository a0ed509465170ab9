//! LLM Provider Adapters
//!
//! Thin adapters over the two hosted inference APIs. Each provider returns
//! its response data in its own envelope shape; normalization to a single
//! trimmed string happens here, at the adapter boundary.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Trait for hosted providers that can complete a prompt
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Send a fully composed prompt and get raw response text
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Hugging Face Inference API provider
pub struct HuggingFaceProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl HuggingFaceProvider {
    pub fn new(api_key: String, model: &str) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.to_string(),
        }
    }
}

/// The inference API answers with either an array of generation objects or
/// a single object, depending on the model backend.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HuggingFaceResponse {
    Many(Vec<HuggingFaceGeneration>),
    One(HuggingFaceGeneration),
}

#[derive(Debug, Deserialize)]
struct HuggingFaceGeneration {
    generated_text: String,
}

impl HuggingFaceResponse {
    fn into_text(self) -> Result<String> {
        let generation = match self {
            HuggingFaceResponse::Many(mut list) => {
                if list.is_empty() {
                    return Err(anyhow!("Hugging Face returned an empty generation list"));
                }
                list.remove(0)
            }
            HuggingFaceResponse::One(generation) => generation,
        };
        Ok(generation.generated_text.trim().to_string())
    }
}

#[async_trait]
impl LlmProvider for HuggingFaceProvider {
    fn name(&self) -> &'static str {
        "hugging_face"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("https://api-inference.huggingface.co/models/{}", self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "inputs": format!("<s>[INST] {} [/INST]", prompt),
                "parameters": {
                    "max_new_tokens": 500,
                    "return_full_text": false,
                }
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Hugging Face API error: {} {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("unknown"),
            ));
        }

        response.json::<HuggingFaceResponse>().await?.into_text()
    }
}

/// Google Generative Language API provider
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: &str) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: model.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: String,
}

impl GeminiResponse {
    fn into_text(self) -> Result<String> {
        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| anyhow!("Gemini returned no candidates"))?;
        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key,
        );

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "contents": [{ "parts": [{ "text": prompt }] }]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Gemini API error: {} {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("unknown"),
            ));
        }

        response.json::<GeminiResponse>().await?.into_text()
    }
}
