#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use storyloom_api::auth::jwt::{issue_token, JwtConfig};
use storyloom_api::config::ServerConfig;
use storyloom_api::router::build_app_router;
use storyloom_api::state::AppState;
use storyloom_llm::{GenerationRequest, LlmError, ScriptedGenerator, TextGenerator};

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hs256";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            audience: None,
        },
    }
}

/// Build the full application router over `pool`, answering model calls
/// from `generator`.
pub fn build_test_app(pool: PgPool, generator: Arc<ScriptedGenerator>) -> Router {
    build_app_with(pool, generator, test_config())
}

/// Build the router with any generator and configuration.
pub fn build_app_with(
    pool: PgPool,
    generator: Arc<dyn TextGenerator>,
    config: ServerConfig,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        generator,
    };
    build_app_router(state, &config)
}

/// Answers from a script after sleeping `delay` on every call.
pub struct SlowGenerator {
    pub delay: Duration,
    pub inner: ScriptedGenerator,
}

#[async_trait]
impl TextGenerator for SlowGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        tokio::time::sleep(self.delay).await;
        self.inner.generate(request).await
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

/// Router with an empty script, for tests that never reach the model.
pub fn build_plain_app(pool: PgPool) -> Router {
    build_test_app(pool, Arc::new(ScriptedGenerator::new()))
}

/// A valid bearer token for `user_id`.
pub fn token_for(user_id: Uuid) -> String {
    issue_token(user_id, &test_config().jwt, 3600).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

/// Unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::post(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::delete(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Model scripts
// ---------------------------------------------------------------------------

pub const STORY_TEXT: &str =
    "# The Bell Below\n\nOskar heard the bell under the harbor. He dove and found Mira.";

pub const CHARACTERS_JSON: &str = r#"[
    {"name": "Oskar", "description": "retired diver", "role": "protagonist", "appearance": "white beard"},
    {"name": "Mira", "description": "drowned girl", "role": "ghost", "appearance": "pale"}
]"#;

pub const SCENES_JSON: &str = r#"```json
[
    {"title": "The Sound", "description": "Oskar hears it", "content": "Oskar heard the bell under the harbor.", "characters": ["Oskar"]},
    {"title": "The Dive", "description": "He goes down", "content": "He dove and found Mira.", "characters": ["Oskar", "Mira"]}
]
```"#;

pub const IMAGE_PROMPTS_JSON: &str =
    r#"["An old diver on a foggy dock at dawn", "A diver meets a pale ghost underwater"]"#;

/// The four responses a full story run consumes, in order.
pub fn story_script() -> Arc<ScriptedGenerator> {
    Arc::new(ScriptedGenerator::with_responses([
        STORY_TEXT,
        CHARACTERS_JSON,
        SCENES_JSON,
        IMAGE_PROMPTS_JSON,
    ]))
}

pub const SERIES_JSON: &str = r#"{
    "title": "Tidewater",
    "summary": "A drowned town resurfaces one night a year.",
    "characters": [{"name": "Oskar", "role": "protagonist"}],
    "episodes": [
        {"title": "Low Tide", "synopsis": "The town appears."},
        {"title": "Undertow", "synopsis": "The bell rings again."},
        {"title": "High Water", "synopsis": "The town sinks for good."}
    ],
    "plot_threads": [{"name": "The bell", "description": "Who rings it?"}]
}"#;

pub const EPISODE_JSON: &str = r#"{
    "title": "Low Tide",
    "synopsis": "The town appears in the fog.",
    "content": "Oskar heard the bell under the harbor. He dove and found Mira."
}"#;

/// The three responses an episode run consumes, in order.
pub fn episode_responses() -> [&'static str; 3] {
    [EPISODE_JSON, SCENES_JSON, IMAGE_PROMPTS_JSON]
}
