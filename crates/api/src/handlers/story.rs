//! Handlers for the `/stories` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use storyloom_core::error::CoreError;
use storyloom_core::types::{DbId, UserId};
use storyloom_core::validation::{validate_optional_label, validate_summary, validate_target_words};
use storyloom_core::workflow::WorkflowName;
use storyloom_db::models::scene::{CreateScene, Scene};
use storyloom_db::models::story::{CreateStory, Story};
use storyloom_db::repositories::{SceneRepo, StoryRepo};
use storyloom_pipeline::story::{generate_image_prompts, SceneDraft, StoryOptions, StoryWorkflow};

use crate::audit::RunTracker;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body for `POST /stories/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateStoryRequest {
    pub summary: String,
    pub genre: Option<String>,
    pub tone: Option<String>,
    pub image_style: Option<String>,
    pub target_words: Option<u32>,
}

impl GenerateStoryRequest {
    fn validate(&self) -> Result<(), CoreError> {
        validate_summary(&self.summary)?;
        validate_optional_label("genre", self.genre.as_deref())?;
        validate_optional_label("tone", self.tone.as_deref())?;
        validate_optional_label("image_style", self.image_style.as_deref())?;
        validate_target_words(self.target_words)
    }
}

/// Body for `POST /stories/{id}/image-prompts`.
#[derive(Debug, Default, Deserialize)]
pub struct RegenerateImagePromptsRequest {
    /// New style; the story's current style is reused when absent.
    pub image_style: Option<String>,
}

/// A story together with its ordered scenes.
#[derive(Debug, Serialize)]
pub struct StoryDetail {
    #[serde(flatten)]
    pub story: Story,
    pub scenes: Vec<Scene>,
}

/// A story produced or updated by a workflow run.
#[derive(Debug, Serialize)]
pub struct StoryRunResponse {
    #[serde(flatten)]
    pub detail: StoryDetail,
    pub workflow_run_id: DbId,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Story",
        id,
    })
}

/// Turn generated scenes into rows, pairing each with its image prompt.
///
/// Positions are 1-based in generation order.
pub(crate) fn scene_rows(scenes: Vec<SceneDraft>, image_prompts: Vec<String>) -> Vec<CreateScene> {
    let mut prompts = image_prompts.into_iter();
    scenes
        .into_iter()
        .zip(1..)
        .map(|(scene, position)| CreateScene {
            position,
            title: scene.title,
            description: scene.description,
            content: scene.content,
            characters: scene.characters,
            image_prompt: prompts.next(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/stories/generate
///
/// Runs the story workflow and persists the story with its scenes.
pub async fn generate(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<GenerateStoryRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<StoryRunResponse>>)> {
    input.validate()?;

    let tracker = RunTracker::start(
        &state.pool,
        auth.user_id,
        WorkflowName::StoryGeneration,
        json!({
            "summary": input.summary,
            "genre": input.genre,
            "tone": input.tone,
            "image_style": input.image_style,
            "target_words": input.target_words,
        }),
    )
    .await?;

    let run_id = tracker.run_id();
    let pool = state.pool.clone();
    let detail = tracker
        .run(&pool, generate_story(state, auth.user_id, input), |d: &StoryDetail| {
            json!({ "story_id": d.story.id, "title": d.story.title, "scene_count": d.scenes.len() })
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(StoryRunResponse {
            detail,
            workflow_run_id: run_id,
        })),
    ))
}

async fn generate_story(
    state: AppState,
    user_id: UserId,
    input: GenerateStoryRequest,
) -> AppResult<StoryDetail> {
    let options = StoryOptions {
        genre: input.genre,
        tone: input.tone,
        image_style: input.image_style,
        target_words: input.target_words,
    };
    let generated = StoryWorkflow::new(state.generator.as_ref())
        .run(&input.summary, &options)
        .await?;

    let (story, scenes) = StoryRepo::create_with_scenes(
        &state.pool,
        &CreateStory {
            user_id,
            title: generated.title,
            summary: input.summary,
            genre: options.genre,
            tone: options.tone,
            image_style: options.image_style,
            content: generated.content,
            characters: generated.characters,
        },
        &scene_rows(generated.scenes, generated.image_prompts),
    )
    .await?;

    tracing::info!(story_id = story.id, scenes = scenes.len(), "Story stored");
    Ok(StoryDetail { story, scenes })
}

/// GET /api/stories
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Story>>>> {
    let (limit, offset) = params.resolve();
    let stories = StoryRepo::list_for_user(&state.pool, auth.user_id, limit, offset).await?;
    Ok(Json(DataResponse::new(stories)))
}

/// GET /api/stories/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<StoryDetail>>> {
    let story = StoryRepo::find_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let scenes = SceneRepo::list_for_story(&state.pool, story.id).await?;
    Ok(Json(DataResponse::new(StoryDetail { story, scenes })))
}

/// DELETE /api/stories/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if StoryRepo::delete_for_user(&state.pool, id, auth.user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// POST /api/stories/{id}/image-prompts
///
/// Rewrites the image prompt of every scene, optionally in a new style.
pub async fn regenerate_image_prompts(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RegenerateImagePromptsRequest>,
) -> AppResult<Json<DataResponse<StoryRunResponse>>> {
    validate_optional_label("image_style", input.image_style.as_deref())?;

    let story = StoryRepo::find_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let scenes = SceneRepo::list_for_story(&state.pool, story.id).await?;
    if scenes.is_empty() {
        return Err(AppError::BadRequest(format!("Story {id} has no scenes")));
    }
    let style = input.image_style.or_else(|| story.image_style.clone());

    let tracker = RunTracker::start(
        &state.pool,
        auth.user_id,
        WorkflowName::SceneImagePrompts,
        json!({ "story_id": story.id, "image_style": style }),
    )
    .await?;

    let run_id = tracker.run_id();
    let pool = state.pool.clone();
    let work = rewrite_image_prompts(state, auth.user_id, story, scenes, style);
    let detail = tracker
        .run(&pool, work, |d: &StoryDetail| {
            json!({ "story_id": d.story.id, "scene_count": d.scenes.len() })
        })
        .await?;

    Ok(Json(DataResponse::new(StoryRunResponse {
        detail,
        workflow_run_id: run_id,
    })))
}

async fn rewrite_image_prompts(
    state: AppState,
    user_id: UserId,
    story: Story,
    scenes: Vec<Scene>,
    style: Option<String>,
) -> AppResult<StoryDetail> {
    let drafts: Vec<SceneDraft> = scenes
        .iter()
        .map(|s| SceneDraft {
            title: s.title.clone(),
            description: s.description.clone(),
            content: s.content.clone(),
            characters: s.characters.0.clone(),
        })
        .collect();

    let prompts = generate_image_prompts(
        state.generator.as_ref(),
        &drafts,
        &story.characters.0,
        style.as_deref(),
    )
    .await?;

    let updates: Vec<(DbId, String)> = scenes.iter().map(|s| s.id).zip(prompts).collect();
    StoryRepo::update_image_prompts(&state.pool, story.id, &updates, style.as_deref()).await?;

    let story = StoryRepo::find_for_user(&state.pool, story.id, user_id)
        .await?
        .ok_or_else(|| not_found(story.id))?;
    let scenes = SceneRepo::list_for_story(&state.pool, story.id).await?;
    Ok(StoryDetail { story, scenes })
}
