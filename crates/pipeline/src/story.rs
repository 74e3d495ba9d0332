//! Story workflow: summary -> story -> characters -> scenes -> image prompts.

use serde::{Deserialize, Serialize};
use storyloom_core::content::Character;
use storyloom_llm::{GenerationRequest, TextGenerator};

use crate::error::PipelineError;
use crate::prompts::{self, SceneBrief};
use crate::step::{generate_json, generate_text};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default story length requested from the model.
pub const DEFAULT_TARGET_WORDS: u32 = 1_500;

/// Upper bound on scenes requested during segmentation.
pub const MAX_SCENES: usize = 12;

/// Temperature for creative writing steps.
pub const CREATIVE_TEMPERATURE: f32 = 0.9;

/// Temperature for structuring steps (extraction, segmentation).
pub const STRUCTURED_TEMPERATURE: f32 = 0.3;

/// Fallback title length, in words, when the model omits a heading.
const FALLBACK_TITLE_WORDS: usize = 6;

pub const STEP_EXPAND: &str = "expand_story";
pub const STEP_CHARACTERS: &str = "extract_characters";
pub const STEP_SCENES: &str = "segment_scenes";
pub const STEP_IMAGE_PROMPTS: &str = "generate_image_prompts";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Optional knobs for story generation.
#[derive(Debug, Clone, Default)]
pub struct StoryOptions {
    pub genre: Option<String>,
    pub tone: Option<String>,
    pub image_style: Option<String>,
    /// `None` uses [`DEFAULT_TARGET_WORDS`].
    pub target_words: Option<u32>,
}

/// Output of the expansion step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedStory {
    pub title: String,
    pub content: String,
}

/// One scene as produced by segmentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub content: String,
    #[serde(default)]
    pub characters: Vec<String>,
}

/// Everything the story workflow produces.
#[derive(Debug, Clone)]
pub struct GeneratedStory {
    pub title: String,
    pub content: String,
    pub characters: Vec<Character>,
    pub scenes: Vec<SceneDraft>,
    /// One prompt per scene, same order as `scenes`.
    pub image_prompts: Vec<String>,
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// Split a leading `# Title` heading off the story text.
///
/// Without a heading the first words of `summary` become the title.
pub fn split_title(text: &str, summary: &str) -> ExpandedStory {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix('#') {
        let (heading, body) = rest.split_once('\n').unwrap_or((rest, ""));
        let title = heading.trim_start_matches('#').trim();
        if !title.is_empty() && !body.trim().is_empty() {
            return ExpandedStory {
                title: title.to_string(),
                content: body.trim().to_string(),
            };
        }
    }

    let title = summary
        .split_whitespace()
        .take(FALLBACK_TITLE_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    ExpandedStory {
        title: title.trim_end_matches(['.', ',', ';', ':']).to_string(),
        content: trimmed.to_string(),
    }
}

/// Expand a short summary into a full story with a title.
pub async fn expand_story(
    model: &dyn TextGenerator,
    summary: &str,
    options: &StoryOptions,
) -> Result<ExpandedStory, PipelineError> {
    let prompt = prompts::expand_story(
        summary,
        options.genre.as_deref(),
        options.tone.as_deref(),
        options.target_words.unwrap_or(DEFAULT_TARGET_WORDS),
    );
    let request = GenerationRequest::text(prompt)
        .with_system(prompts::STORYTELLER_SYSTEM)
        .with_temperature(CREATIVE_TEMPERATURE);

    let text = generate_text(model, STEP_EXPAND, request).await?;
    Ok(split_title(&text, summary))
}

/// Extract the cast of characters from story text.
///
/// Names are trimmed; unnamed entries and repeated names are dropped.
pub async fn extract_characters(
    model: &dyn TextGenerator,
    content: &str,
) -> Result<Vec<Character>, PipelineError> {
    let request = GenerationRequest::json(prompts::extract_characters(content))
        .with_system(prompts::EDITOR_SYSTEM)
        .with_temperature(STRUCTURED_TEMPERATURE);

    let raw: Vec<Character> = generate_json(model, STEP_CHARACTERS, request).await?;

    let mut characters: Vec<Character> = Vec::with_capacity(raw.len());
    for mut c in raw {
        c.name = c.name.trim().to_string();
        if c.name.is_empty() || characters.iter().any(|k| k.name.eq_ignore_ascii_case(&c.name)) {
            continue;
        }
        characters.push(c);
    }
    Ok(characters)
}

/// Split story text into ordered scenes.
///
/// At least one scene is required; anything past [`MAX_SCENES`] is dropped.
pub async fn segment_scenes(
    model: &dyn TextGenerator,
    content: &str,
    characters: &[Character],
) -> Result<Vec<SceneDraft>, PipelineError> {
    let request = GenerationRequest::json(prompts::segment_scenes(content, characters, MAX_SCENES))
        .with_system(prompts::EDITOR_SYSTEM)
        .with_temperature(STRUCTURED_TEMPERATURE);

    let mut scenes: Vec<SceneDraft> = generate_json(model, STEP_SCENES, request).await?;
    scenes.retain(|s| !s.content.trim().is_empty());
    if scenes.is_empty() {
        return Err(PipelineError::invalid(STEP_SCENES, "no scenes returned"));
    }
    if scenes.len() > MAX_SCENES {
        tracing::warn!(
            returned = scenes.len(),
            max = MAX_SCENES,
            "Truncating scene list"
        );
        scenes.truncate(MAX_SCENES);
    }
    Ok(scenes)
}

/// Write one image prompt per scene, in scene order.
///
/// A count mismatch between prompts and scenes is an error, since prompts
/// are matched to scenes by position.
pub async fn generate_image_prompts(
    model: &dyn TextGenerator,
    scenes: &[SceneDraft],
    characters: &[Character],
    style: Option<&str>,
) -> Result<Vec<String>, PipelineError> {
    if scenes.is_empty() {
        return Ok(Vec::new());
    }
    let briefs: Vec<SceneBrief<'_>> = scenes
        .iter()
        .map(|s| SceneBrief {
            title: &s.title,
            description: &s.description,
            characters: &s.characters,
        })
        .collect();
    let request = GenerationRequest::json(prompts::image_prompts(&briefs, characters, style))
        .with_system(prompts::ART_DIRECTOR_SYSTEM);

    let prompts: Vec<String> = generate_json(model, STEP_IMAGE_PROMPTS, request).await?;
    if prompts.len() != scenes.len() {
        return Err(PipelineError::invalid(
            STEP_IMAGE_PROMPTS,
            format!("expected {} prompts, got {}", scenes.len(), prompts.len()),
        ));
    }
    if prompts.iter().any(|p| p.trim().is_empty()) {
        return Err(PipelineError::invalid(STEP_IMAGE_PROMPTS, "blank image prompt"));
    }
    Ok(prompts.into_iter().map(|p| p.trim().to_string()).collect())
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// Chains the four story steps against one model.
pub struct StoryWorkflow<'a> {
    model: &'a dyn TextGenerator,
}

impl<'a> StoryWorkflow<'a> {
    pub fn new(model: &'a dyn TextGenerator) -> Self {
        Self { model }
    }

    /// Run expand -> characters -> scenes -> image prompts sequentially.
    pub async fn run(
        &self,
        summary: &str,
        options: &StoryOptions,
    ) -> Result<GeneratedStory, PipelineError> {
        let expanded = expand_story(self.model, summary, options).await?;
        let characters = extract_characters(self.model, &expanded.content).await?;
        let scenes = segment_scenes(self.model, &expanded.content, &characters).await?;
        let image_prompts = generate_image_prompts(
            self.model,
            &scenes,
            &characters,
            options.image_style.as_deref(),
        )
        .await?;

        tracing::info!(
            title = %expanded.title,
            characters = characters.len(),
            scenes = scenes.len(),
            "Story workflow finished"
        );

        Ok(GeneratedStory {
            title: expanded.title,
            content: expanded.content,
            characters,
            scenes,
            image_prompts,
        })
    }
}
