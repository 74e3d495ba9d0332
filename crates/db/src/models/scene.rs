//! Scene entity model and DTOs.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use storyloom_core::types::{DbId, Timestamp};

/// A row from the `scenes` table.
///
/// Exactly one of `story_id` and `episode_id` is set.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Scene {
    pub id: DbId,
    pub story_id: Option<DbId>,
    pub episode_id: Option<DbId>,
    /// 1-based position within the owning story or episode.
    pub position: i32,
    pub title: String,
    pub description: String,
    pub content: String,
    /// Names of the characters appearing in the scene.
    pub characters: Json<Vec<String>>,
    pub image_prompt: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The row a scene belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneOwner {
    Story(DbId),
    Episode(DbId),
}

/// DTO for creating a new scene. The owner is supplied separately.
#[derive(Debug, Clone)]
pub struct CreateScene {
    pub position: i32,
    pub title: String,
    pub description: String,
    pub content: String,
    pub characters: Vec<String>,
    pub image_prompt: Option<String>,
}
