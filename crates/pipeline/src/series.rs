//! Series workflow: premise -> title, roster, episode outlines, plot threads.

use serde::Deserialize;
use storyloom_core::content::{Character, EpisodeOutline, PlotThread};
use storyloom_llm::{GenerationRequest, TextGenerator};

use crate::error::PipelineError;
use crate::prompts;
use crate::step::generate_json;
use crate::story::CREATIVE_TEMPERATURE;

pub const STEP_SERIES_METADATA: &str = "generate_series_metadata";

/// Generated series metadata, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesMetadata {
    pub title: String,
    pub summary: String,
    pub characters: Vec<Character>,
    pub episode_outlines: Vec<EpisodeOutline>,
    pub plot_threads: Vec<PlotThread>,
}

#[derive(Debug, Deserialize)]
struct RawOutline {
    #[serde(default)]
    title: String,
    #[serde(default)]
    synopsis: String,
}

#[derive(Debug, Deserialize)]
struct RawSeries {
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    characters: Vec<Character>,
    #[serde(default, alias = "episode_outlines")]
    episodes: Vec<RawOutline>,
    #[serde(default)]
    plot_threads: Vec<PlotThread>,
}

/// Generate series metadata for `episode_count` episodes.
///
/// Outlines are renumbered 1..=n in the order returned. Extra outlines are
/// dropped; fewer than requested is an error.
pub async fn generate_series_metadata(
    model: &dyn TextGenerator,
    premise: &str,
    genre: Option<&str>,
    episode_count: i32,
) -> Result<SeriesMetadata, PipelineError> {
    let request = GenerationRequest::json(prompts::series_metadata(premise, genre, episode_count))
        .with_system(prompts::EDITOR_SYSTEM)
        .with_temperature(CREATIVE_TEMPERATURE);

    let raw: RawSeries = generate_json(model, STEP_SERIES_METADATA, request).await?;
    let metadata = normalize(raw, episode_count)?;

    tracing::info!(
        title = %metadata.title,
        episodes = metadata.episode_outlines.len(),
        threads = metadata.plot_threads.len(),
        "Series workflow finished"
    );
    Ok(metadata)
}

fn normalize(raw: RawSeries, episode_count: i32) -> Result<SeriesMetadata, PipelineError> {
    let title = raw.title.trim().to_string();
    if title.is_empty() {
        return Err(PipelineError::invalid(STEP_SERIES_METADATA, "blank series title"));
    }

    let wanted = usize::try_from(episode_count).unwrap_or(0);
    if raw.episodes.len() < wanted {
        return Err(PipelineError::invalid(
            STEP_SERIES_METADATA,
            format!("expected {wanted} episode outlines, got {}", raw.episodes.len()),
        ));
    }

    let episode_outlines = raw
        .episodes
        .into_iter()
        .take(wanted)
        .zip(1..)
        .map(|(o, episode_number)| EpisodeOutline {
            episode_number,
            title: if o.title.trim().is_empty() {
                format!("Episode {episode_number}")
            } else {
                o.title.trim().to_string()
            },
            synopsis: o.synopsis.trim().to_string(),
        })
        .collect();

    Ok(SeriesMetadata {
        title,
        summary: raw.summary.trim().to_string(),
        characters: raw
            .characters
            .into_iter()
            .filter(|c| !c.name.trim().is_empty())
            .collect(),
        episode_outlines,
        plot_threads: raw.plot_threads,
    })
}
