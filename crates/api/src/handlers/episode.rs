//! Handlers for episodes: generation and listing under a series, plus
//! direct access by id.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use storyloom_core::content::EpisodeOutline;
use storyloom_core::error::CoreError;
use storyloom_core::types::DbId;
use storyloom_core::validation::{validate_episode_number, validate_optional_label};
use storyloom_core::workflow::WorkflowName;
use storyloom_db::models::episode::{CreateEpisode, Episode};
use storyloom_db::models::scene::Scene;
use storyloom_db::models::series::Series;
use storyloom_db::repositories::{EpisodeRepo, SceneRepo, SeriesRepo};
use storyloom_pipeline::episode::{EpisodeContext, EpisodeWorkflow};

use crate::audit::RunTracker;
use crate::error::{AppError, AppResult};
use crate::handlers::series;
use crate::handlers::story::scene_rows;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for `POST /series/{id}/episodes/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateEpisodeRequest {
    pub episode_number: i32,
    pub image_style: Option<String>,
}

/// An episode together with its ordered scenes.
#[derive(Debug, Serialize)]
pub struct EpisodeDetail {
    #[serde(flatten)]
    pub episode: Episode,
    pub scenes: Vec<Scene>,
}

/// An episode produced by a workflow run.
#[derive(Debug, Serialize)]
pub struct EpisodeRunResponse {
    #[serde(flatten)]
    pub detail: EpisodeDetail,
    pub workflow_run_id: DbId,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Episode",
        id,
    })
}

/// POST /api/series/{id}/episodes/generate
///
/// Writes one episode from its outline. Episodes already written for the
/// series are passed along for continuity. Returns 409 if the episode
/// exists.
pub async fn generate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(series_id): Path<DbId>,
    Json(input): Json<GenerateEpisodeRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<EpisodeRunResponse>>)> {
    validate_optional_label("image_style", input.image_style.as_deref())?;

    let series = SeriesRepo::find_for_user(&state.pool, series_id, auth.user_id)
        .await?
        .ok_or_else(|| series::not_found(series_id))?;
    validate_episode_number(input.episode_number, series.episode_outlines.len())?;

    if EpisodeRepo::find_by_number(&state.pool, series.id, input.episode_number)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Episode {} of series {} already exists",
            input.episode_number, series.id
        ))));
    }

    let tracker = RunTracker::start(
        &state.pool,
        auth.user_id,
        WorkflowName::EpisodeGeneration,
        json!({
            "series_id": series.id,
            "episode_number": input.episode_number,
            "image_style": input.image_style,
        }),
    )
    .await?;

    let run_id = tracker.run_id();
    let pool = state.pool.clone();
    let detail = tracker
        .run(&pool, generate_episode(state, series, input), |d: &EpisodeDetail| {
            json!({
                "episode_id": d.episode.id,
                "episode_number": d.episode.episode_number,
                "scene_count": d.scenes.len(),
            })
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(EpisodeRunResponse {
            detail,
            workflow_run_id: run_id,
        })),
    ))
}

async fn generate_episode(
    state: AppState,
    series: Series,
    input: GenerateEpisodeRequest,
) -> AppResult<EpisodeDetail> {
    let outline = series.outline(input.episode_number).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Series {} has no outline for episode {}",
            series.id, input.episode_number
        )))
    })?;

    let previous: Vec<EpisodeOutline> = EpisodeRepo::list_for_series(&state.pool, series.id)
        .await?
        .into_iter()
        .filter(|e| e.episode_number < input.episode_number)
        .map(|e| EpisodeOutline {
            episode_number: e.episode_number,
            title: e.title,
            synopsis: e.synopsis,
        })
        .collect();

    let context = EpisodeContext {
        series_title: &series.title,
        series_summary: &series.summary,
        genre: series.genre.as_deref(),
        characters: &series.characters.0,
        plot_threads: &series.plot_threads.0,
        outline,
        total_episodes: series.episode_outlines.0.len(),
        previous: &previous,
        image_style: input.image_style.as_deref(),
    };
    let generated = EpisodeWorkflow::new(state.generator.as_ref())
        .run(&context)
        .await?;

    let (episode, scenes) = EpisodeRepo::create_with_scenes(
        &state.pool,
        &CreateEpisode {
            series_id: series.id,
            episode_number: input.episode_number,
            title: generated.draft.title,
            synopsis: generated.draft.synopsis,
            content: generated.draft.content,
        },
        &scene_rows(generated.scenes, generated.image_prompts),
    )
    .await?;

    tracing::info!(
        episode_id = episode.id,
        series_id = series.id,
        episode_number = episode.episode_number,
        "Episode stored"
    );
    Ok(EpisodeDetail { episode, scenes })
}

/// GET /api/series/{id}/episodes
pub async fn list_by_series(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(series_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Episode>>>> {
    let series = SeriesRepo::find_for_user(&state.pool, series_id, auth.user_id)
        .await?
        .ok_or_else(|| series::not_found(series_id))?;
    let episodes = EpisodeRepo::list_for_series(&state.pool, series.id).await?;
    Ok(Json(DataResponse::new(episodes)))
}

/// GET /api/episodes/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<EpisodeDetail>>> {
    let episode = EpisodeRepo::find_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let scenes = SceneRepo::list_for_episode(&state.pool, episode.id).await?;
    Ok(Json(DataResponse::new(EpisodeDetail { episode, scenes })))
}

/// DELETE /api/episodes/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if EpisodeRepo::delete_for_user(&state.pool, id, auth.user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
