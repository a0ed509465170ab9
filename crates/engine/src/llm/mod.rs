//! LLM Call Layer
//!
//! Provider adapters, the prioritized fallback router, the deterministic
//! mock layer, and the structured-output validation loop.

pub mod mock;
pub mod provider;
pub mod router;
pub mod structured;

pub use mock::MockKind;
pub use provider::{GeminiProvider, HuggingFaceProvider, LlmProvider};
pub use router::{Completion, CompletionRequest, LlmRouter, ResponseFormat};
pub use structured::{request_structured, RetryConfig, SchemaError, StructuredOutput};
