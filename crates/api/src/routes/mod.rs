pub mod episode;
pub mod health;
pub mod series;
pub mod story;
pub mod workflow_run;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Every route here requires a bearer token.
///
/// Route hierarchy:
///
/// ```text
/// /stories                                  list
/// /stories/generate                         generate (POST)
/// /stories/{id}                             get, delete
/// /stories/{id}/image-prompts               regenerate image prompts (POST)
///
/// /series                                   list
/// /series/generate                          generate (POST)
/// /series/{id}                              get, delete
/// /series/{id}/episodes                     list episodes
/// /series/{id}/episodes/generate            generate episode (POST)
///
/// /episodes/{id}                            get, delete
///
/// /workflow-runs                            list (?workflow=)
/// /workflow-runs/{id}                       get
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/stories", story::router())
        .nest("/series", series::router())
        .nest("/episodes", episode::router())
        .nest("/workflow-runs", workflow_run::router())
}
