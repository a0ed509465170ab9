pub mod config;
pub mod llm;
pub mod metrics;
pub mod server;
pub mod store;
pub mod workflow;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Structured output for {schema} failed after {attempts} attempts: {detail}")]
    Schema {
        schema: &'static str,
        attempts: u32,
        detail: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("UUID error: {0}")]
    Uuid(#[from] uuid::Error),
    #[error("Timestamp error: {0}")]
    Chrono(#[from] chrono::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
