//! Handlers for the `/workflow-runs` audit log.

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;
use storyloom_core::error::CoreError;
use storyloom_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use storyloom_core::types::{DbId, Timestamp};
use storyloom_core::workflow::{RunStatus, StatusId, WorkflowName};
use storyloom_db::models::workflow_run::WorkflowRun;
use storyloom_db::repositories::WorkflowRunRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::WorkflowRunListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// A workflow run with its status spelled out.
#[derive(Debug, Serialize)]
pub struct WorkflowRunResponse {
    pub id: DbId,
    pub workflow: String,
    pub status_id: StatusId,
    pub status: &'static str,
    /// `true` once the run is completed or failed.
    pub finished: bool,
    pub input: serde_json::Value,
    pub output: Option<serde_json::Value>,
    pub error: Option<String>,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<WorkflowRun> for WorkflowRunResponse {
    fn from(run: WorkflowRun) -> Self {
        let decoded = run.status();
        let status = decoded.map(|s| s.label()).unwrap_or("unknown");
        let finished = decoded.is_some_and(RunStatus::is_terminal);
        Self {
            id: run.id,
            workflow: run.workflow,
            status_id: run.status_id,
            status,
            finished,
            input: run.input,
            output: run.output,
            error: run.error,
            started_at: run.started_at,
            completed_at: run.completed_at,
            created_at: run.created_at,
        }
    }
}

/// GET /api/workflow-runs
///
/// Newest first. `?workflow=` must name a known workflow.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<WorkflowRunListParams>,
) -> AppResult<Json<DataResponse<Vec<WorkflowRunResponse>>>> {
    let workflow = params
        .workflow
        .as_deref()
        .map(WorkflowName::from_str)
        .transpose()?;
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let runs = WorkflowRunRepo::list_for_user(
        &state.pool,
        auth.user_id,
        workflow.map(WorkflowName::as_str),
        limit,
        offset,
    )
    .await?;
    Ok(Json(DataResponse::new(
        runs.into_iter().map(WorkflowRunResponse::from).collect(),
    )))
}

/// GET /api/workflow-runs/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkflowRunResponse>>> {
    let run = WorkflowRunRepo::find_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkflowRun",
            id,
        }))?;
    Ok(Json(DataResponse::new(run.into())))
}
