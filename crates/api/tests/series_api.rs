//! HTTP-level integration tests for series and episode generation.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, delete, episode_responses, get_auth, post_json, token_for, SERIES_JSON};
use sqlx::PgPool;
use storyloom_llm::ScriptedGenerator;
use uuid::Uuid;

const PREMISE: &str = "A drowned town resurfaces for one night every year.";

async fn create_series(pool: PgPool, token: &str) -> i64 {
    let generator = Arc::new(ScriptedGenerator::with_responses([SERIES_JSON]));
    let app = common::build_test_app(pool, generator);
    let response = post_json(
        app,
        "/api/series/generate",
        token,
        serde_json::json!({ "premise": PREMISE, "episode_count": 3 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn generate_episode(
    pool: PgPool,
    generator: Arc<ScriptedGenerator>,
    token: &str,
    series_id: i64,
    episode_number: i32,
) -> axum::http::Response<axum::body::Body> {
    let app = common::build_test_app(pool, generator);
    post_json(
        app,
        &format!("/api/series/{series_id}/episodes/generate"),
        token,
        serde_json::json!({ "episode_number": episode_number }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn generate_series_returns_201_with_outline(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let generator = Arc::new(ScriptedGenerator::with_responses([SERIES_JSON]));
    let app = common::build_test_app(pool, generator);
    let response = post_json(
        app,
        "/api/series/generate",
        &token,
        serde_json::json!({ "premise": PREMISE, "genre": "mystery", "episode_count": 3 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["title"], "Tidewater");
    assert_eq!(data["premise"], PREMISE);
    assert_eq!(data["genre"], "mystery");
    assert!(data["workflow_run_id"].is_number());

    let outlines = data["episode_outlines"].as_array().unwrap();
    let numbers: Vec<i64> = outlines
        .iter()
        .map(|o| o["episode_number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(outlines[1]["title"], "Undertow");
    assert_eq!(data["plot_threads"][0]["name"], "The bell");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn short_outline_returns_502_and_stores_nothing(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let generator = Arc::new(ScriptedGenerator::with_responses([SERIES_JSON]));
    let app = common::build_test_app(pool.clone(), generator);
    let response = post_json(
        app,
        "/api/series/generate",
        &token,
        serde_json::json!({ "premise": PREMISE, "episode_count": 5 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let app = common::build_plain_app(pool.clone());
    let list = body_json(get_auth(app, "/api/series", &token).await).await;
    assert!(list["data"].as_array().unwrap().is_empty());

    let app = common::build_plain_app(pool);
    let runs = body_json(get_auth(app, "/api/workflow-runs", &token).await).await;
    assert_eq!(runs["data"][0]["workflow"], "series_generation");
    assert_eq!(runs["data"][0]["status"], "failed");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn too_many_episodes_returns_400(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let app = common::build_plain_app(pool);
    let response = post_json(
        app,
        "/api/series/generate",
        &token,
        serde_json::json!({ "premise": PREMISE, "episode_count": 500 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn other_users_series_is_not_found(pool: PgPool) {
    let owner = token_for(Uuid::new_v4());
    let stranger = token_for(Uuid::new_v4());
    let series_id = create_series(pool.clone(), &owner).await;

    let app = common::build_plain_app(pool.clone());
    let response = get_auth(app, &format!("/api/series/{series_id}"), &stranger).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let generator = Arc::new(ScriptedGenerator::with_responses(episode_responses()));
    let response = generate_episode(pool, generator.clone(), &stranger, series_id, 1).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(generator.requests().is_empty());
}

// ---------------------------------------------------------------------------
// Episodes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn generate_episode_returns_201_with_scenes(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let series_id = create_series(pool.clone(), &token).await;

    let generator = Arc::new(ScriptedGenerator::with_responses(episode_responses()));
    let response = generate_episode(pool.clone(), generator.clone(), &token, series_id, 1).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["series_id"], series_id);
    assert_eq!(data["episode_number"], 1);
    assert_eq!(data["title"], "Low Tide");
    assert_eq!(data["scenes"].as_array().unwrap().len(), 2);
    assert_eq!(data["scenes"][0]["image_prompt"], "An old diver on a foggy dock at dawn");
    assert_eq!(generator.remaining(), 0);

    let app = common::build_plain_app(pool);
    let detail = body_json(get_auth(app, &format!("/api/series/{series_id}"), &token).await).await;
    assert_eq!(detail["data"]["episodes"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn existing_episode_returns_409_without_model_calls(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let series_id = create_series(pool.clone(), &token).await;

    let generator = Arc::new(ScriptedGenerator::with_responses(episode_responses()));
    let response = generate_episode(pool.clone(), generator, &token, series_id, 1).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let generator = Arc::new(ScriptedGenerator::with_responses(episode_responses()));
    let response = generate_episode(pool, generator.clone(), &token, series_id, 1).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
    assert!(generator.requests().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn episode_number_outside_outline_returns_400(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let series_id = create_series(pool.clone(), &token).await;

    let generator = Arc::new(ScriptedGenerator::new());
    let response = generate_episode(pool, generator, &token, series_id, 9).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn later_episode_prompt_includes_earlier_episodes(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let series_id = create_series(pool.clone(), &token).await;

    let generator = Arc::new(ScriptedGenerator::with_responses(episode_responses()));
    generate_episode(pool.clone(), generator, &token, series_id, 1).await;

    let generator = Arc::new(ScriptedGenerator::with_responses(episode_responses()));
    let response = generate_episode(pool, generator.clone(), &token, series_id, 2).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let first = &generator.requests()[0];
    assert!(first
        .prompt
        .contains("Episode 1 \"Low Tide\": The town appears in the fog."));
    assert!(first.prompt.contains("THIS EPISODE: \"Undertow\""));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_get_and_delete_episode(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let series_id = create_series(pool.clone(), &token).await;
    let generator = Arc::new(ScriptedGenerator::with_responses(episode_responses()));
    let created = body_json(generate_episode(pool.clone(), generator, &token, series_id, 1).await).await;
    let episode_id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_plain_app(pool.clone());
    let list = body_json(
        get_auth(app, &format!("/api/series/{series_id}/episodes"), &token).await,
    )
    .await;
    assert_eq!(list["data"][0]["id"], episode_id);

    let app = common::build_plain_app(pool.clone());
    let response = get_auth(app, &format!("/api/episodes/{episode_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let detail = body_json(response).await;
    assert_eq!(detail["data"]["scenes"].as_array().unwrap().len(), 2);

    let app = common::build_plain_app(pool.clone());
    let response = delete(app, &format!("/api/episodes/{episode_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_plain_app(pool);
    let response = get_auth(app, &format!("/api/episodes/{episode_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deleting_series_removes_its_episodes(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let series_id = create_series(pool.clone(), &token).await;
    let generator = Arc::new(ScriptedGenerator::with_responses(episode_responses()));
    let created = body_json(generate_episode(pool.clone(), generator, &token, series_id, 1).await).await;
    let episode_id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_plain_app(pool.clone());
    let response = delete(app, &format!("/api/series/{series_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_plain_app(pool);
    let response = get_auth(app, &format!("/api/episodes/{episode_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
