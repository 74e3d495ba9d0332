//! Workflow run audit model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use storyloom_core::types::{DbId, Timestamp, UserId};
use storyloom_core::workflow::{RunStatus, StatusId, WorkflowName};

/// A row from the `workflow_runs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkflowRun {
    pub id: DbId,
    pub user_id: UserId,
    pub workflow: String,
    pub status_id: StatusId,
    pub input: serde_json::Value,
    pub output: Option<serde_json::Value>,
    pub error: Option<String>,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl WorkflowRun {
    /// Decode `status_id`. Unknown IDs are treated as `None`.
    pub fn status(&self) -> Option<RunStatus> {
        RunStatus::from_id(self.status_id)
    }
}

/// DTO for opening a new run in the `Pending` state.
#[derive(Debug, Clone)]
pub struct CreateWorkflowRun {
    pub user_id: UserId,
    pub workflow: WorkflowName,
    pub input: serde_json::Value,
}
