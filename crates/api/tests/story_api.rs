//! HTTP-level integration tests for story generation and the `/stories`
//! resource.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, delete, get, get_auth, post_json, story_script, token_for};
use sqlx::PgPool;
use storyloom_llm::ScriptedGenerator;
use uuid::Uuid;

const SUMMARY: &str = "A retired diver hears a bell ringing under the harbor every night.";

async fn generate_story(pool: PgPool, generator: Arc<ScriptedGenerator>, token: &str) -> serde_json::Value {
    let app = common::build_test_app(pool, generator);
    let response = post_json(
        app,
        "/api/stories/generate",
        token,
        serde_json::json!({ "summary": SUMMARY, "genre": "folk horror" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn generate_story_returns_201_with_scenes(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let generator = story_script();
    let json = generate_story(pool, generator.clone(), &token).await;

    assert_eq!(json["success"], true);
    let data = &json["data"];
    assert_eq!(data["title"], "The Bell Below");
    assert_eq!(data["summary"], SUMMARY);
    assert_eq!(data["genre"], "folk horror");
    assert_eq!(data["characters"].as_array().unwrap().len(), 2);
    assert!(data["workflow_run_id"].is_number());

    let scenes = data["scenes"].as_array().unwrap();
    assert_eq!(scenes.len(), 2);
    assert_eq!(scenes[0]["position"], 1);
    assert_eq!(scenes[0]["title"], "The Sound");
    assert_eq!(scenes[1]["position"], 2);
    assert_eq!(scenes[1]["image_prompt"], "A diver meets a pale ghost underwater");

    assert_eq!(generator.remaining(), 0);
    assert_eq!(generator.requests().len(), 4);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn generate_story_records_completed_run(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let json = generate_story(pool.clone(), story_script(), &token).await;
    let run_id = json["data"]["workflow_run_id"].as_i64().unwrap();
    let story_id = json["data"]["id"].as_i64().unwrap();

    let app = common::build_plain_app(pool);
    let response = get_auth(app, &format!("/api/workflow-runs/{run_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let run = body_json(response).await;
    assert_eq!(run["data"]["workflow"], "story_generation");
    assert_eq!(run["data"]["status"], "completed");
    assert_eq!(run["data"]["output"]["story_id"], story_id);
    assert_eq!(run["data"]["output"]["scene_count"], 2);
    assert_eq!(run["data"]["input"]["summary"], SUMMARY);
    assert!(run["data"]["completed_at"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn model_failure_returns_502_and_marks_run_failed(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let generator = Arc::new(ScriptedGenerator::new());
    generator.push_failure(503, "model overloaded");

    let app = common::build_test_app(pool.clone(), generator);
    let response = post_json(
        app,
        "/api/stories/generate",
        &token,
        serde_json::json!({ "summary": SUMMARY }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "UPSTREAM_ERROR");

    let app = common::build_plain_app(pool.clone());
    let runs = body_json(get_auth(app, "/api/workflow-runs", &token).await).await;
    let runs = runs["data"].as_array().unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0]["status"], "failed");
    assert!(runs[0]["error"].as_str().unwrap().contains("expand_story"));

    let app = common::build_plain_app(pool);
    let stories = body_json(get_auth(app, "/api/stories", &token).await).await;
    assert!(stories["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_summary_returns_400_without_opening_a_run(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let generator = story_script();

    let app = common::build_test_app(pool.clone(), generator.clone());
    let response = post_json(
        app,
        "/api/stories/generate",
        &token,
        serde_json::json!({ "summary": "short" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    assert!(generator.requests().is_empty());

    let app = common::build_plain_app(pool);
    let runs = body_json(get_auth(app, "/api/workflow-runs", &token).await).await;
    assert!(runs["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn out_of_range_target_words_returns_400(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let app = common::build_plain_app(pool);
    let response = post_json(
        app,
        "/api/stories/generate",
        &token,
        serde_json::json!({ "summary": SUMMARY, "target_words": 10 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_token_returns_401(pool: PgPool) {
    let app = common::build_plain_app(pool);
    let response = get(app, "/api/stories").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn garbage_token_returns_401(pool: PgPool) {
    let app = common::build_plain_app(pool);
    let response = get_auth(app, "/api/stories", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn other_users_story_is_not_found(pool: PgPool) {
    let owner = token_for(Uuid::new_v4());
    let stranger = token_for(Uuid::new_v4());
    let json = generate_story(pool.clone(), story_script(), &owner).await;
    let id = json["data"]["id"].as_i64().unwrap();

    let app = common::build_plain_app(pool.clone());
    let response = get_auth(app, &format!("/api/stories/{id}"), &stranger).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_plain_app(pool.clone());
    let response = delete(app, &format!("/api/stories/{id}"), &stranger).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_plain_app(pool);
    let list = body_json(get_auth(app, "/api/stories", &stranger).await).await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Read / delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn get_story_includes_ordered_scenes(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let json = generate_story(pool.clone(), story_script(), &token).await;
    let id = json["data"]["id"].as_i64().unwrap();

    let app = common::build_plain_app(pool);
    let response = get_auth(app, &format!("/api/stories/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], id);
    let positions: Vec<i64> = json["data"]["scenes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["position"].as_i64().unwrap())
        .collect();
    assert_eq!(positions, vec![1, 2]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_respects_limit(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    generate_story(pool.clone(), story_script(), &token).await;
    generate_story(pool.clone(), story_script(), &token).await;

    let app = common::build_plain_app(pool.clone());
    let all = body_json(get_auth(app, "/api/stories", &token).await).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);

    let app = common::build_plain_app(pool);
    let page = body_json(get_auth(app, "/api/stories?limit=1", &token).await).await;
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_story_returns_204_then_404(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let json = generate_story(pool.clone(), story_script(), &token).await;
    let id = json["data"]["id"].as_i64().unwrap();

    let app = common::build_plain_app(pool.clone());
    let response = delete(app, &format!("/api/stories/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_plain_app(pool);
    let response = get_auth(app, &format!("/api/stories/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Image prompt regeneration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn regenerate_image_prompts_updates_scenes_and_style(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let generator = story_script();
    let json = generate_story(pool.clone(), generator.clone(), &token).await;
    let id = json["data"]["id"].as_i64().unwrap();

    generator.push_text(r#"["Watercolor dock in fog", "Watercolor ghost below the waves"]"#);
    let app = common::build_test_app(pool.clone(), generator.clone());
    let response = post_json(
        app,
        &format!("/api/stories/{id}/image-prompts"),
        &token,
        serde_json::json!({ "image_style": "watercolor" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["image_style"], "watercolor");
    assert_eq!(json["data"]["scenes"][0]["image_prompt"], "Watercolor dock in fog");
    assert_eq!(
        json["data"]["scenes"][1]["image_prompt"],
        "Watercolor ghost below the waves"
    );

    let last = generator.requests().pop().unwrap();
    assert!(last.prompt.contains("watercolor"));

    let app = common::build_plain_app(pool);
    let runs = body_json(
        get_auth(app, "/api/workflow-runs?workflow=scene_image_prompts", &token).await,
    )
    .await;
    assert_eq!(runs["data"][0]["status"], "completed");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn regenerate_with_mismatched_prompt_count_fails_and_keeps_old_prompts(pool: PgPool) {
    let token = token_for(Uuid::new_v4());
    let generator = story_script();
    let json = generate_story(pool.clone(), generator.clone(), &token).await;
    let id = json["data"]["id"].as_i64().unwrap();

    generator.push_text(r#"["only one"]"#);
    let app = common::build_test_app(pool.clone(), generator);
    let response = post_json(
        app,
        &format!("/api/stories/{id}/image-prompts"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let app = common::build_plain_app(pool);
    let story = body_json(get_auth(app, &format!("/api/stories/{id}"), &token).await).await;
    assert_eq!(
        story["data"]["scenes"][0]["image_prompt"],
        "An old diver on a foggy dock at dawn"
    );
}
