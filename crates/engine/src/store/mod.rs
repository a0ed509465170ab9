mod config;
mod factory;
mod sqlite;

pub use config::DatabaseConfig;
pub use factory::create_store;
pub use sqlite::SqliteStore;

use async_trait::async_trait;

use crate::workflow::WorkflowRunResult;

/// Maximum number of runs retained in history; older entries are evicted.
pub const HISTORY_LIMIT: i64 = 50;

/// Run history collaborator. Backing storage is opaque to the engine; it
/// only needs append plus most-recent-first retrieval.
#[async_trait]
pub trait Store: Send + Sync {
    /// Initialize the backing schema.
    async fn init(&self) -> crate::Result<()>;

    /// Persist one finished run. Re-appending the same run id is safe.
    async fn append_run(&self, run: &WorkflowRunResult) -> crate::Result<()>;

    /// Most-recent-first, at most `limit` entries.
    async fn list_runs(&self, limit: i64) -> crate::Result<Vec<WorkflowRunResult>>;
}
