use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::store::DatabaseConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub addr: String,
}

/// Credentials and model names for the two hosted providers, plus the
/// structured-output retry knobs. A missing key is a valid state: the
/// router runs in mock mode when neither is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub primary_api_key: Option<String>,
    pub primary_model: String,
    pub fallback_api_key: Option<String>,
    pub fallback_model: String,
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
}

impl Config {
    pub fn load() -> crate::Result<Self> {
        // Load environment variables from .env file if it exists
        let _ = dotenvy::dotenv();

        let config = Config {
            server: ServerConfig {
                addr: std::env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            },
            database: DatabaseConfig {
                sqlite_path: std::env::var("SQLITE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("data/textflow.db")),
            },
            llm: LlmConfig {
                primary_api_key: env_key("HUGGING_FACE_API_KEY"),
                primary_model: std::env::var("HUGGING_FACE_MODEL")
                    .unwrap_or_else(|_| "mistralai/Mistral-7B-Instruct-v0.2".to_string()),
                fallback_api_key: env_key("GEMINI_API_KEY"),
                fallback_model: std::env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| "gemini-pro".to_string()),
                max_attempts: std::env::var("STRUCTURED_OUTPUT_MAX_ATTEMPTS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(2),
                backoff_base_ms: std::env::var("STRUCTURED_OUTPUT_BACKOFF_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1000),
            },
        };

        if config.llm.primary_api_key.is_none() && config.llm.fallback_api_key.is_none() {
            tracing::warn!("No provider API key is set. LLM steps will run in mock mode.");
        }

        if config.llm.max_attempts == 0 {
            return Err(crate::Error::Config(
                "STRUCTURED_OUTPUT_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }
}

// A credential set to the empty string counts as absent.
fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                addr: "0.0.0.0:8080".to_string(),
            },
            database: DatabaseConfig {
                sqlite_path: PathBuf::from("data/textflow.db"),
            },
            llm: LlmConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            primary_api_key: None,
            primary_model: "mistralai/Mistral-7B-Instruct-v0.2".to_string(),
            fallback_api_key: None,
            fallback_model: "gemini-pro".to_string(),
            max_attempts: 2,
            backoff_base_ms: 1000,
        }
    }
}
