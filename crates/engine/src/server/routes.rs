use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use http::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use super::Server;
use crate::{
    metrics,
    store::HISTORY_LIMIT,
    workflow::{WorkflowRunResult, WorkflowStep},
    Error,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
    #[serde(default)]
    pub input_text: String,
}

pub async fn run_workflow(
    State(server): State<Arc<Server>>,
    Json(request): Json<RunRequest>,
) -> Response {
    match server.runner.run(&request.steps, &request.input_text).await {
        Ok(run) => (StatusCode::OK, Json(run)).into_response(),
        Err(Error::Validation(message)) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "workflow execution error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}

// Read failures degrade to an empty history rather than an error.
pub async fn history(State(server): State<Arc<Server>>) -> Json<Vec<WorkflowRunResult>> {
    match server.store.list_runs(HISTORY_LIMIT).await {
        Ok(runs) => Json(runs),
        Err(e) => {
            error!(error = %e, "failed to read history");
            Json(Vec::new())
        }
    }
}

pub async fn health(State(server): State<Arc<Server>>) -> Response {
    let database = match server.store.list_runs(1).await {
        Ok(_) => "connected",
        Err(e) => {
            error!(error = %e, "history store health check failed");
            "error"
        }
    };

    Json(json!({
        "backend": "healthy",
        "database": database,
        "llm": server.llm_status,
        "timestamp": Utc::now(),
    }))
    .into_response()
}

pub async fn metrics() -> String {
    metrics::gather_metrics()
}
