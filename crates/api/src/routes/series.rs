//! Route definitions for the `/series` resource.
//!
//! Also nests episode generation and listing under `/series/{id}/episodes`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{episode, series};
use crate::state::AppState;

/// Routes mounted at `/series`.
///
/// ```text
/// GET    /                        -> list
/// POST   /generate                -> generate
/// GET    /{id}                    -> get_by_id
/// DELETE /{id}                    -> delete
///
/// GET    /{id}/episodes           -> episode::list_by_series
/// POST   /{id}/episodes/generate  -> episode::generate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(series::list))
        .route("/generate", post(series::generate))
        .route("/{id}", get(series::get_by_id).delete(series::delete))
        .route("/{id}/episodes", get(episode::list_by_series))
        .route("/{id}/episodes/generate", post(episode::generate))
}
