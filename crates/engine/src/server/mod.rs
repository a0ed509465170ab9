mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{config::LlmConfig, store::Store, workflow::WorkflowRunner};

/// Which provider credential is configured, reported by the health route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmCredentialStatus {
    HuggingFace,
    Gemini,
    MissingKey,
}

impl LlmCredentialStatus {
    pub fn from_config(config: &LlmConfig) -> Self {
        if config.primary_api_key.is_some() {
            LlmCredentialStatus::HuggingFace
        } else if config.fallback_api_key.is_some() {
            LlmCredentialStatus::Gemini
        } else {
            LlmCredentialStatus::MissingKey
        }
    }
}

pub struct Server {
    runner: Arc<WorkflowRunner>,
    store: Arc<dyn Store>,
    llm_status: LlmCredentialStatus,
}

impl Server {
    pub fn new(
        llm: &LlmConfig,
        runner: Arc<WorkflowRunner>,
        store: Arc<dyn Store>,
    ) -> Self {
        Self {
            runner,
            store,
            llm_status: LlmCredentialStatus::from_config(llm),
        }
    }

    pub fn build_router(self) -> Router {
        let state = Arc::new(self);

        Router::new()
            .route("/workflow/run", post(routes::run_workflow))
            .route("/history", get(routes::history))
            .route("/health", get(routes::health))
            .route("/metrics", get(routes::metrics))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    pub async fn start(self, addr: &str) -> crate::Result<()> {
        let router = self.build_router();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;
        Ok(())
    }
}
