use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref WORKFLOW_RUNS_TOTAL: IntCounter = IntCounter::with_opts(Opts::new(
        "textflow_workflow_runs_total",
        "Total number of workflow runs executed."
    ))
    .unwrap();
    pub static ref STEP_FAILURES_TOTAL: IntCounter = IntCounter::with_opts(Opts::new(
        "textflow_step_failures_total",
        "Total number of workflow steps that failed."
    ))
    .unwrap();
}

pub fn register_metrics() {
    REGISTRY
        .register(Box::new(WORKFLOW_RUNS_TOTAL.clone()))
        .expect("Failed to register WORKFLOW_RUNS_TOTAL");
    REGISTRY
        .register(Box::new(STEP_FAILURES_TOTAL.clone()))
        .expect("Failed to register STEP_FAILURES_TOTAL");
}

// Function to gather metrics for exposition
pub fn gather_metrics() -> String {
    let mut buffer = vec![];
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Failed to convert metrics to string")
}
