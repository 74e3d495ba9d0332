//! Handlers for the `/series` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use storyloom_core::error::CoreError;
use storyloom_core::types::{DbId, UserId};
use storyloom_core::validation::{
    validate_episode_count, validate_optional_label, validate_premise, DEFAULT_EPISODE_COUNT,
};
use storyloom_core::workflow::WorkflowName;
use storyloom_db::models::episode::Episode;
use storyloom_db::models::series::{CreateSeries, Series};
use storyloom_db::repositories::{EpisodeRepo, SeriesRepo};
use storyloom_pipeline::series::generate_series_metadata;

use crate::audit::RunTracker;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for `POST /series/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateSeriesRequest {
    pub premise: String,
    pub genre: Option<String>,
    /// Defaults to [`DEFAULT_EPISODE_COUNT`].
    pub episode_count: Option<i32>,
}

impl GenerateSeriesRequest {
    fn validate(&self) -> Result<(), CoreError> {
        validate_premise(&self.premise)?;
        validate_optional_label("genre", self.genre.as_deref())?;
        validate_episode_count(self.episode_count())
    }

    fn episode_count(&self) -> i32 {
        self.episode_count.unwrap_or(DEFAULT_EPISODE_COUNT)
    }
}

/// A series with the episodes written so far.
#[derive(Debug, Serialize)]
pub struct SeriesDetail {
    #[serde(flatten)]
    pub series: Series,
    pub episodes: Vec<Episode>,
}

/// A series produced by a workflow run.
#[derive(Debug, Serialize)]
pub struct SeriesRunResponse {
    #[serde(flatten)]
    pub series: Series,
    pub workflow_run_id: DbId,
}

pub(crate) fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Series",
        id,
    })
}

/// POST /api/series/generate
pub async fn generate(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<GenerateSeriesRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SeriesRunResponse>>)> {
    input.validate()?;

    let tracker = RunTracker::start(
        &state.pool,
        auth.user_id,
        WorkflowName::SeriesGeneration,
        json!({
            "premise": input.premise,
            "genre": input.genre,
            "episode_count": input.episode_count(),
        }),
    )
    .await?;

    let run_id = tracker.run_id();
    let pool = state.pool.clone();
    let series = tracker
        .run(&pool, generate_series(state, auth.user_id, input), |s: &Series| {
            json!({
                "series_id": s.id,
                "title": s.title,
                "episode_count": s.episode_outlines.len(),
            })
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(SeriesRunResponse {
            series,
            workflow_run_id: run_id,
        })),
    ))
}

async fn generate_series(
    state: AppState,
    user_id: UserId,
    input: GenerateSeriesRequest,
) -> AppResult<Series> {
    let metadata = generate_series_metadata(
        state.generator.as_ref(),
        &input.premise,
        input.genre.as_deref(),
        input.episode_count(),
    )
    .await?;

    let series = SeriesRepo::create(
        &state.pool,
        &CreateSeries {
            user_id,
            title: metadata.title,
            premise: input.premise,
            genre: input.genre,
            summary: metadata.summary,
            characters: metadata.characters,
            episode_outlines: metadata.episode_outlines,
            plot_threads: metadata.plot_threads,
        },
    )
    .await?;

    tracing::info!(series_id = series.id, "Series stored");
    Ok(series)
}

/// GET /api/series
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Series>>>> {
    let (limit, offset) = params.resolve();
    let series = SeriesRepo::list_for_user(&state.pool, auth.user_id, limit, offset).await?;
    Ok(Json(DataResponse::new(series)))
}

/// GET /api/series/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SeriesDetail>>> {
    let series = SeriesRepo::find_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let episodes = EpisodeRepo::list_for_series(&state.pool, series.id).await?;
    Ok(Json(DataResponse::new(SeriesDetail { series, episodes })))
}

/// DELETE /api/series/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if SeriesRepo::delete_for_user(&state.pool, id, auth.user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
