//! Series entity model and DTOs.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use storyloom_core::content::{Character, EpisodeOutline, PlotThread};
use storyloom_core::types::{DbId, Timestamp, UserId};

/// A row from the `series` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Series {
    pub id: DbId,
    pub user_id: UserId,
    pub title: String,
    /// The premise the series was generated from.
    pub premise: String,
    pub genre: Option<String>,
    pub summary: String,
    pub characters: Json<Vec<Character>>,
    pub episode_outlines: Json<Vec<EpisodeOutline>>,
    pub plot_threads: Json<Vec<PlotThread>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Series {
    /// Find the outline for a 1-based episode number.
    pub fn outline(&self, episode_number: i32) -> Option<&EpisodeOutline> {
        self.episode_outlines
            .iter()
            .find(|o| o.episode_number == episode_number)
    }
}

/// DTO for creating a new series.
#[derive(Debug, Clone)]
pub struct CreateSeries {
    pub user_id: UserId,
    pub title: String,
    pub premise: String,
    pub genre: Option<String>,
    pub summary: String,
    pub characters: Vec<Character>,
    pub episode_outlines: Vec<EpisodeOutline>,
    pub plot_threads: Vec<PlotThread>,
}
