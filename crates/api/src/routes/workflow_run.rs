//! Route definitions for the `/workflow-runs` audit log (read-only).

use axum::routing::get;
use axum::Router;

use crate::handlers::workflow_run;
use crate::state::AppState;

/// Routes mounted at `/workflow-runs`.
///
/// ```text
/// GET /       -> list (?workflow=&limit=&offset=)
/// GET /{id}   -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(workflow_run::list))
        .route("/{id}", get(workflow_run::get_by_id))
}
