//! Structured content shared between the generation pipeline and storage.
//!
//! These are stored as JSONB columns, so field names are part of the
//! persisted format.

use serde::{Deserialize, Serialize};

/// A character extracted from a story or defined in a series roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Narrative role, e.g. `"protagonist"` or `"mentor"`.
    #[serde(default)]
    pub role: String,
    /// Physical appearance, used to keep image prompts consistent.
    #[serde(default)]
    pub appearance: String,
}

/// One planned episode in a series outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeOutline {
    pub episode_number: i32,
    pub title: String,
    pub synopsis: String,
}

/// A storyline that spans several episodes of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotThread {
    pub name: String,
    #[serde(default)]
    pub description: String,
}
