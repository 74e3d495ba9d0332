//! Story entity model and DTOs.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use storyloom_core::content::Character;
use storyloom_core::types::{DbId, Timestamp, UserId};

/// A row from the `stories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Story {
    pub id: DbId,
    pub user_id: UserId,
    pub title: String,
    /// The summary the story was expanded from.
    pub summary: String,
    pub genre: Option<String>,
    pub tone: Option<String>,
    pub image_style: Option<String>,
    /// The full expanded story text.
    pub content: String,
    pub characters: Json<Vec<Character>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new story.
#[derive(Debug, Clone)]
pub struct CreateStory {
    pub user_id: UserId,
    pub title: String,
    pub summary: String,
    pub genre: Option<String>,
    pub tone: Option<String>,
    pub image_style: Option<String>,
    pub content: String,
    pub characters: Vec<Character>,
}
