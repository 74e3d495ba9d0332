//! Repository for the `workflow_runs` audit table.
//!
//! Status updates are guarded in SQL by the statuses
//! [`RunStatus::can_transition_to`] allows as a source, so a run can only
//! move pending -> running -> completed/failed. A guarded update that
//! matches no row returns `None`.

use sqlx::PgPool;
use storyloom_core::types::{DbId, UserId};
use storyloom_core::workflow::RunStatus;

use crate::models::workflow_run::{CreateWorkflowRun, WorkflowRun};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, workflow, status_id, input, output, error, \
    started_at, completed_at, created_at";

/// Provides audit-log operations for workflow runs.
pub struct WorkflowRunRepo;

impl WorkflowRunRepo {
    /// Open a new run in the `Pending` state.
    pub async fn create(
        pool: &PgPool,
        input: &CreateWorkflowRun,
    ) -> Result<WorkflowRun, sqlx::Error> {
        let query = format!(
            "INSERT INTO workflow_runs (user_id, workflow, status_id, input)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowRun>(&query)
            .bind(input.user_id)
            .bind(input.workflow.as_str())
            .bind(RunStatus::Pending.id())
            .bind(&input.input)
            .fetch_one(pool)
            .await
    }

    /// Move a pending run to `Running` and stamp `started_at`.
    pub async fn mark_running(pool: &PgPool, id: DbId) -> Result<Option<WorkflowRun>, sqlx::Error> {
        let query = format!(
            "UPDATE workflow_runs SET status_id = $2, started_at = NOW()
             WHERE id = $1 AND status_id = ANY($3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowRun>(&query)
            .bind(id)
            .bind(RunStatus::Running.id())
            .bind(RunStatus::source_ids(RunStatus::Running))
            .fetch_optional(pool)
            .await
    }

    /// Move a running run to `Completed`, recording its output summary.
    pub async fn mark_completed(
        pool: &PgPool,
        id: DbId,
        output: &serde_json::Value,
    ) -> Result<Option<WorkflowRun>, sqlx::Error> {
        let query = format!(
            "UPDATE workflow_runs SET status_id = $2, output = $3, completed_at = NOW()
             WHERE id = $1 AND status_id = ANY($4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowRun>(&query)
            .bind(id)
            .bind(RunStatus::Completed.id())
            .bind(output)
            .bind(RunStatus::source_ids(RunStatus::Completed))
            .fetch_optional(pool)
            .await
    }

    /// Move a pending or running run to `Failed`, recording the error text.
    pub async fn mark_failed(
        pool: &PgPool,
        id: DbId,
        error: &str,
    ) -> Result<Option<WorkflowRun>, sqlx::Error> {
        let query = format!(
            "UPDATE workflow_runs SET status_id = $2, error = $3, completed_at = NOW()
             WHERE id = $1 AND status_id = ANY($4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkflowRun>(&query)
            .bind(id)
            .bind(RunStatus::Failed.id())
            .bind(error)
            .bind(RunStatus::source_ids(RunStatus::Failed))
            .fetch_optional(pool)
            .await
    }

    /// Find a run owned by `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
    ) -> Result<Option<WorkflowRun>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workflow_runs WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, WorkflowRun>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's runs, newest first, optionally filtered by workflow name.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
        workflow: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WorkflowRun>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workflow_runs
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR workflow = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, WorkflowRun>(&query)
            .bind(user_id)
            .bind(workflow)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
