use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Row, Sqlite};
use std::path::Path;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::{
    store::{Store, HISTORY_LIMIT},
    workflow::{WorkflowRunResult, WorkflowStepResult},
    Error, Result,
};

pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    pub async fn new(path: &str) -> Result<Self> {
        info!("Connecting to SQLite database: {}", path);

        let url = if path == ":memory:" {
            "sqlite::memory:".to_string()
        } else {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            format!("sqlite://{path}?mode=rwc")
        };

        // A single connection keeps history writes serialized and makes the
        // in-memory database shared across all callers.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .map_err(|e| {
                error!("Failed to connect to SQLite: {}", e);
                Error::Sqlx(e)
            })?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn init(&self) -> Result<()> {
        info!("Initializing run history schema");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS runs (
                id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                status TEXT NOT NULL,
                original_input TEXT NOT NULL,
                duration_ms INTEGER NOT NULL,
                steps TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_runs_created_at ON runs(created_at DESC)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn append_run(&self, run: &WorkflowRunResult) -> Result<()> {
        debug!("Saving run: {}", run.id);

        let steps_json = serde_json::to_string(&run.steps)?;
        let created_at = run.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true);

        sqlx::query(
            r#"
            INSERT INTO runs (id, created_at, status, original_input, duration_ms, steps)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                created_at = excluded.created_at,
                status = excluded.status,
                original_input = excluded.original_input,
                duration_ms = excluded.duration_ms,
                steps = excluded.steps
            "#,
        )
        .bind(run.id.to_string())
        .bind(created_at)
        .bind(run.status.to_string())
        .bind(&run.original_input)
        .bind(run.duration_ms as i64)
        .bind(steps_json)
        .execute(&self.pool)
        .await?;

        // Evict everything beyond the newest HISTORY_LIMIT entries.
        sqlx::query(
            r#"
            DELETE FROM runs
            WHERE id NOT IN (
                SELECT id FROM runs ORDER BY created_at DESC LIMIT ?1
            )
            "#,
        )
        .bind(HISTORY_LIMIT)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_runs(&self, limit: i64) -> Result<Vec<WorkflowRunResult>> {
        let rows = sqlx::query(
            r#"
            SELECT id, created_at, status, original_input, duration_ms, steps
            FROM runs
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut runs = Vec::with_capacity(rows.len());
        for row in rows {
            let steps: Vec<WorkflowStepResult> = serde_json::from_str(row.get("steps"))?;
            let timestamp = DateTime::parse_from_rfc3339(row.get("created_at"))?
                .with_timezone(&Utc);

            runs.push(WorkflowRunResult {
                id: row.get::<String, _>("id").parse::<Uuid>()?,
                timestamp,
                steps,
                status: row.get::<String, _>("status").parse()?,
                original_input: row.get("original_input"),
                duration_ms: row.get::<i64, _>("duration_ms") as u64,
            });
        }

        Ok(runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{RunStatus, StepKind, StepStatus};
    use chrono::Duration;

    fn sample_run(offset_ms: i64) -> WorkflowRunResult {
        let timestamp = Utc::now() + Duration::milliseconds(offset_ms);
        WorkflowRunResult {
            id: Uuid::new_v4(),
            timestamp,
            steps: vec![WorkflowStepResult {
                step_id: "1".to_string(),
                step_type: StepKind::CleanText,
                input: "  a  b  ".to_string(),
                output: "a b".to_string(),
                status: StepStatus::Success,
                duration_ms: 500,
            }],
            status: RunStatus::Success,
            original_input: "  a  b  ".to_string(),
            duration_ms: 500,
        }
    }

    async fn memory_store() -> SqliteStore {
        let store = SqliteStore::new(":memory:").await.unwrap();
        store.init().await.unwrap();
        store
    }

    #[tokio::test]
    async fn round_trips_a_full_run() {
        let store = memory_store().await;
        let run = sample_run(0);
        store.append_run(&run).await.unwrap();

        let listed = store.list_runs(HISTORY_LIMIT).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, run.id);
        assert_eq!(listed[0].status, RunStatus::Success);
        assert_eq!(listed[0].original_input, run.original_input);
        assert_eq!(listed[0].steps.len(), 1);
        assert_eq!(listed[0].steps[0].output, "a b");
    }

    #[tokio::test]
    async fn empty_history_lists_nothing() {
        let store = memory_store().await;
        assert!(store.list_runs(HISTORY_LIMIT).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reappending_the_same_run_is_idempotent() {
        let store = memory_store().await;
        let run = sample_run(0);
        store.append_run(&run).await.unwrap();
        store.append_run(&run).await.unwrap();
        assert_eq!(store.list_runs(HISTORY_LIMIT).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn lists_most_recent_first() {
        let store = memory_store().await;
        let older = sample_run(0);
        let newer = sample_run(5000);
        store.append_run(&older).await.unwrap();
        store.append_run(&newer).await.unwrap();

        let listed = store.list_runs(HISTORY_LIMIT).await.unwrap();
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
    }

    #[tokio::test]
    async fn history_is_capped_at_the_limit() {
        let store = memory_store().await;
        let mut last_id = None;
        for i in 0..(HISTORY_LIMIT + 5) {
            let run = sample_run(i * 1000);
            last_id = Some(run.id);
            store.append_run(&run).await.unwrap();
        }

        let listed = store.list_runs(HISTORY_LIMIT + 5).await.unwrap();
        assert_eq!(listed.len(), HISTORY_LIMIT as usize);
        // The newest entry survives eviction and leads the list.
        assert_eq!(listed[0].id, last_id.unwrap());
    }
}
