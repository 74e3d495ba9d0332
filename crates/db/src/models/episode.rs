//! Episode entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use storyloom_core::types::{DbId, Timestamp};

/// A row from the `episodes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Episode {
    pub id: DbId,
    pub series_id: DbId,
    pub episode_number: i32,
    pub title: String,
    pub synopsis: String,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new episode.
#[derive(Debug, Clone)]
pub struct CreateEpisode {
    pub series_id: DbId,
    pub episode_number: i32,
    pub title: String,
    pub synopsis: String,
    pub content: String,
}
