pub mod executor;
pub mod model;
pub mod persona;
pub mod runner;
pub mod schemas;

pub use executor::StepExecutor;
pub use model::{RunStatus, StepKind, StepStatus, WorkflowRunResult, WorkflowStep, WorkflowStepResult};
pub use runner::WorkflowRunner;
