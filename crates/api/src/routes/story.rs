//! Route definitions for the `/stories` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::story;
use crate::state::AppState;

/// Routes mounted at `/stories`.
///
/// ```text
/// GET    /                    -> list
/// POST   /generate            -> generate
/// GET    /{id}                -> get_by_id
/// DELETE /{id}                -> delete
/// POST   /{id}/image-prompts  -> regenerate_image_prompts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(story::list))
        .route("/generate", post(story::generate))
        .route("/{id}", get(story::get_by_id).delete(story::delete))
        .route("/{id}/image-prompts", post(story::regenerate_image_prompts))
}
