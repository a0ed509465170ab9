//! Workflow Runner
//!
//! Sequential execution of a step list against an evolving input. Each
//! step's output becomes the next step's input; the run halts on the first
//! failed step and the remaining steps are never attempted.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{
    executor::StepExecutor,
    model::{RunStatus, StepStatus, WorkflowRunResult, WorkflowStep},
};
use crate::{metrics, store::Store, Error, Result};

pub struct WorkflowRunner {
    executor: Arc<StepExecutor>,
    store: Arc<dyn Store>,
}

impl WorkflowRunner {
    pub fn new(executor: Arc<StepExecutor>, store: Arc<dyn Store>) -> Self {
        Self { executor, store }
    }

    /// Run the pipeline and return the complete result record. Only request
    /// validation can error out of here; step failures are reported inside
    /// the result, and persistence failures are logged and swallowed.
    pub async fn run(&self, steps: &[WorkflowStep], input_text: &str) -> Result<WorkflowRunResult> {
        if steps.is_empty() {
            return Err(Error::Validation("Invalid steps".to_string()));
        }
        if input_text.is_empty() {
            return Err(Error::Validation("Missing input text".to_string()));
        }

        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, step_count = steps.len(), "initialized workflow execution");

        let mut step_results = Vec::with_capacity(steps.len());
        let mut current_input = input_text.to_string();
        let mut status = RunStatus::Success;

        for step in steps {
            let result = self.executor.execute_step(step, &current_input).await;
            info!(
                run_id = %run_id,
                step_type = %step.kind,
                status = ?result.status,
                duration_ms = result.duration_ms,
                "step execution result"
            );

            let failed = result.status == StepStatus::Failed;
            current_input = result.output.clone();
            step_results.push(result);

            if failed {
                status = RunStatus::Failed;
                error!(run_id = %run_id, step_type = %step.kind, "workflow execution halted");
                break;
            }
        }

        let run = WorkflowRunResult {
            id: run_id,
            timestamp: Utc::now(),
            duration_ms: step_results.iter().map(|s| s.duration_ms).sum(),
            steps: step_results,
            status,
            original_input: input_text.to_string(),
        };

        metrics::WORKFLOW_RUNS_TOTAL.inc();

        if let Err(e) = self.store.append_run(&run).await {
            warn!(run_id = %run_id, error = %e, "failed to save run to history");
        }

        Ok(run)
    }
}
