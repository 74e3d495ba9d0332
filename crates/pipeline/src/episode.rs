//! Episode workflow: series outline -> episode -> scenes -> image prompts.
//!
//! Scene segmentation and image prompts reuse the story steps.

use serde::Deserialize;
use storyloom_core::content::{Character, EpisodeOutline, PlotThread};
use storyloom_llm::{GenerationRequest, TextGenerator};

use crate::error::PipelineError;
use crate::prompts::{self, EpisodePromptInput};
use crate::step::generate_json;
use crate::story::{
    generate_image_prompts, segment_scenes, SceneDraft, CREATIVE_TEMPERATURE,
    DEFAULT_TARGET_WORDS,
};

pub const STEP_WRITE_EPISODE: &str = "write_episode";

/// Everything the model needs to write one episode.
#[derive(Debug, Clone)]
pub struct EpisodeContext<'a> {
    pub series_title: &'a str,
    pub series_summary: &'a str,
    pub genre: Option<&'a str>,
    pub characters: &'a [Character],
    pub plot_threads: &'a [PlotThread],
    pub outline: &'a EpisodeOutline,
    pub total_episodes: usize,
    /// Episodes already written, ordered by number.
    pub previous: &'a [EpisodeOutline],
    pub image_style: Option<&'a str>,
}

/// Output of the writing step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EpisodeDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub synopsis: String,
    pub content: String,
}

/// Everything the episode workflow produces.
#[derive(Debug, Clone)]
pub struct GeneratedEpisode {
    pub draft: EpisodeDraft,
    pub scenes: Vec<SceneDraft>,
    pub image_prompts: Vec<String>,
}

/// Write the full text of one episode.
///
/// A blank title or synopsis falls back to the outline's.
pub async fn write_episode(
    model: &dyn TextGenerator,
    context: &EpisodeContext<'_>,
) -> Result<EpisodeDraft, PipelineError> {
    let prompt = prompts::write_episode(&EpisodePromptInput {
        series_title: context.series_title,
        series_summary: context.series_summary,
        genre: context.genre,
        characters: context.characters,
        plot_threads: context.plot_threads,
        outline: context.outline,
        total_episodes: context.total_episodes,
        previous: context.previous,
        target_words: DEFAULT_TARGET_WORDS,
    });
    let request = GenerationRequest::json(prompt)
        .with_system(prompts::STORYTELLER_SYSTEM)
        .with_temperature(CREATIVE_TEMPERATURE);

    let mut draft: EpisodeDraft = generate_json(model, STEP_WRITE_EPISODE, request).await?;
    if draft.content.trim().is_empty() {
        return Err(PipelineError::invalid(STEP_WRITE_EPISODE, "blank episode content"));
    }
    if draft.title.trim().is_empty() {
        draft.title = context.outline.title.clone();
    }
    if draft.synopsis.trim().is_empty() {
        draft.synopsis = context.outline.synopsis.clone();
    }
    Ok(draft)
}

/// Chains the episode steps against one model.
pub struct EpisodeWorkflow<'a> {
    model: &'a dyn TextGenerator,
}

impl<'a> EpisodeWorkflow<'a> {
    pub fn new(model: &'a dyn TextGenerator) -> Self {
        Self { model }
    }

    /// Run write -> scenes -> image prompts sequentially.
    pub async fn run(&self, context: &EpisodeContext<'_>) -> Result<GeneratedEpisode, PipelineError> {
        let draft = write_episode(self.model, context).await?;
        let scenes = segment_scenes(self.model, &draft.content, context.characters).await?;
        let image_prompts =
            generate_image_prompts(self.model, &scenes, context.characters, context.image_style)
                .await?;

        tracing::info!(
            episode_number = context.outline.episode_number,
            title = %draft.title,
            scenes = scenes.len(),
            "Episode workflow finished"
        );

        Ok(GeneratedEpisode {
            draft,
            scenes,
            image_prompts,
        })
    }
}
