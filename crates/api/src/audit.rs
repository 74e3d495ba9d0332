//! Workflow run auditing.
//!
//! Every generation handler wraps its work in a [`RunTracker`]: a
//! `workflow_runs` row is opened as pending, moved to running before the
//! first model call, and closed as completed or failed. A failure is
//! recorded and then returned to the caller unchanged.
//!
//! The work runs on its own task. If the request is dropped (client
//! disconnect or request timeout) the workflow still finishes and the run
//! still reaches a terminal status.

use std::future::Future;

use serde_json::Value;
use storyloom_core::types::{DbId, UserId};
use storyloom_core::workflow::{RunStatus, WorkflowName};
use storyloom_db::models::workflow_run::CreateWorkflowRun;
use storyloom_db::repositories::WorkflowRunRepo;
use storyloom_db::DbPool;

use crate::error::{AppError, AppResult};

/// Handle to an open workflow run.
#[derive(Debug)]
pub struct RunTracker {
    run_id: DbId,
    workflow: WorkflowName,
}

impl RunTracker {
    /// Open a run for `user_id` and mark it running.
    pub async fn start(
        pool: &DbPool,
        user_id: UserId,
        workflow: WorkflowName,
        input: Value,
    ) -> AppResult<Self> {
        let run = WorkflowRunRepo::create(
            pool,
            &CreateWorkflowRun {
                user_id,
                workflow,
                input,
            },
        )
        .await?;

        if WorkflowRunRepo::mark_running(pool, run.id).await?.is_none() {
            tracing::error!(run_id = run.id, %workflow, "New run was not pending");
            return Err(AppError::InternalError(format!(
                "Workflow run {} could not be started",
                run.id
            )));
        }
        tracing::info!(run_id = run.id, %workflow, %user_id, "Workflow run started");

        Ok(Self {
            run_id: run.id,
            workflow,
        })
    }

    pub fn run_id(&self) -> DbId {
        self.run_id
    }

    /// Drive `work` to completion on a separate task and close the run with
    /// its outcome.
    ///
    /// `summarize` builds the small JSON output stored on success. Dropping
    /// the returned future does not cancel the work.
    pub async fn run<T, F, S>(self, pool: &DbPool, work: F, summarize: S) -> AppResult<T>
    where
        T: Send + 'static,
        F: Future<Output = AppResult<T>> + Send + 'static,
        S: FnOnce(&T) -> Value + Send + 'static,
    {
        let run_id = self.run_id;
        let workflow = self.workflow;
        let task_pool = pool.clone();
        let task = tokio::spawn(async move {
            let result = work.await;
            self.finish(&task_pool, result, summarize).await
        });

        match task.await {
            Ok(result) => result,
            Err(join_err) => {
                let err =
                    AppError::InternalError(format!("Workflow task did not finish: {join_err}"));
                record_failure(pool, run_id, workflow, &err.to_string()).await;
                Err(err)
            }
        }
    }

    /// Close the run according to `result` and pass the result through.
    ///
    /// Once the work succeeded its value is always returned: the resource is
    /// already committed, so a failure to record completion is only logged.
    async fn finish<T>(
        self,
        pool: &DbPool,
        result: AppResult<T>,
        summarize: impl FnOnce(&T) -> Value,
    ) -> AppResult<T> {
        let value = match result {
            Ok(value) => value,
            Err(err) => {
                record_failure(pool, self.run_id, self.workflow, &err.to_string()).await;
                return Err(err);
            }
        };

        let output = summarize(&value);
        match WorkflowRunRepo::mark_completed(pool, self.run_id, &output).await {
            Ok(Some(run)) => {
                debug_assert!(run.status().is_some_and(RunStatus::is_terminal));
                tracing::info!(run_id = self.run_id, workflow = %self.workflow, "Workflow run completed");
            }
            Ok(None) => {
                tracing::error!(
                    run_id = self.run_id,
                    workflow = %self.workflow,
                    "Workflow finished but its run was no longer running"
                );
            }
            Err(db_err) => {
                tracing::error!(
                    run_id = self.run_id,
                    workflow = %self.workflow,
                    error = %db_err,
                    "Could not record run completion"
                );
                record_failure(
                    pool,
                    self.run_id,
                    self.workflow,
                    &format!("Output stored but completion could not be recorded: {db_err}"),
                )
                .await;
            }
        }
        Ok(value)
    }
}

async fn record_failure(pool: &DbPool, run_id: DbId, workflow: WorkflowName, message: &str) {
    tracing::error!(run_id, %workflow, error = %message, "Workflow run failed");
    match WorkflowRunRepo::mark_failed(pool, run_id, message).await {
        Ok(Some(_)) => {}
        Ok(None) => tracing::error!(run_id, "Run was already closed when recording failure"),
        Err(db_err) => {
            tracing::error!(run_id, error = %db_err, "Could not record run failure")
        }
    }
}
