//! Prompt templates for every workflow step.
//!
//! Builders take typed input and return the full prompt text. JSON-producing
//! prompts spell out the exact shape expected by the matching step.

use std::fmt::Write;

use storyloom_core::content::{Character, EpisodeOutline, PlotThread};

/// System instruction shared by the creative steps.
pub const STORYTELLER_SYSTEM: &str = "You are a skilled fiction writer. You write vivid, \
coherent prose with consistent characters and a clear beginning, middle and end.";

/// System instruction shared by the structuring steps.
pub const EDITOR_SYSTEM: &str = "You are a meticulous story editor. You answer with valid \
JSON only, with no commentary before or after it.";

/// System instruction for image prompt generation.
pub const ART_DIRECTOR_SYSTEM: &str = "You are an art director writing prompts for a text-to-image \
model. Prompts are concrete, visual, and self-contained.";

fn optional_line(out: &mut String, label: &str, value: Option<&str>) {
    if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
        let _ = writeln!(out, "{label}: {v}");
    }
}

fn roster(characters: &[Character]) -> String {
    if characters.is_empty() {
        return "(none identified)\n".to_string();
    }
    let mut out = String::new();
    for c in characters {
        let _ = write!(out, "- {}", c.name);
        if !c.role.is_empty() {
            let _ = write!(out, " ({})", c.role);
        }
        if !c.description.is_empty() {
            let _ = write!(out, ": {}", c.description);
        }
        if !c.appearance.is_empty() {
            let _ = write!(out, " Appearance: {}", c.appearance);
        }
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// Story
// ---------------------------------------------------------------------------

/// Expand a short summary into a full story.
pub fn expand_story(
    summary: &str,
    genre: Option<&str>,
    tone: Option<&str>,
    target_words: u32,
) -> String {
    let mut out = String::new();
    out.push_str("Write a complete short story based on the summary below.\n\n");
    let _ = writeln!(out, "Summary: {}", summary.trim());
    optional_line(&mut out, "Genre", genre);
    optional_line(&mut out, "Tone", tone);
    let _ = writeln!(out, "Length: about {target_words} words.");
    out.push_str(
        "\nStart with the story title on the first line as a markdown heading \
         (\"# Title\"), then a blank line, then the story text. Do not add notes.",
    );
    out
}

/// Extract the cast of characters from story text.
pub fn extract_characters(content: &str) -> String {
    format!(
        "List every named character in the story below.\n\n\
         Return a JSON array where each item is:\n\
         {{\"name\": string, \"description\": string, \"role\": string, \"appearance\": string}}\n\
         \"role\" is the narrative role (protagonist, antagonist, mentor, ...). \
         \"appearance\" describes how the character looks.\n\n\
         STORY:\n{content}"
    )
}

/// Split story text into scenes.
pub fn segment_scenes(content: &str, characters: &[Character], max_scenes: usize) -> String {
    format!(
        "Split the story below into between 1 and {max_scenes} consecutive scenes that \
         together cover the whole story in order.\n\n\
         Return a JSON array where each item is:\n\
         {{\"title\": string, \"description\": string, \"content\": string, \"characters\": [string]}}\n\
         \"description\" is one or two sentences summarising the scene. \"content\" is the \
         scene's text taken from the story. \"characters\" lists the names of characters \
         present, using the names from the cast.\n\n\
         CAST:\n{}\n\
         STORY:\n{content}",
        roster(characters)
    )
}

/// One scene as shown to the image prompt step.
pub struct SceneBrief<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub characters: &'a [String],
}

/// Write one text-to-image prompt per scene.
pub fn image_prompts(scenes: &[SceneBrief<'_>], characters: &[Character], style: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Write one text-to-image prompt for each of the {} scenes below.",
        scenes.len()
    );
    match style.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => {
            let _ = writeln!(out, "Every prompt must use this visual style: {s}.");
        }
        None => out.push_str("Use a consistent cinematic illustration style.\n"),
    }
    out.push_str(
        "Describe characters by appearance so they look the same in every image.\n\n\
         Return a JSON array of strings, one prompt per scene, in scene order.\n\n",
    );
    out.push_str("CHARACTERS:\n");
    out.push_str(&roster(characters));
    out.push_str("\nSCENES:\n");
    for (i, scene) in scenes.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} -- {} [present: {}]",
            i + 1,
            scene.title,
            scene.description,
            scene.characters.join(", ")
        );
    }
    out
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

/// Generate the metadata of an episodic series.
pub fn series_metadata(premise: &str, genre: Option<&str>, episode_count: i32) -> String {
    let mut out = String::new();
    out.push_str("Design an episodic fiction series from the premise below.\n\n");
    let _ = writeln!(out, "Premise: {}", premise.trim());
    optional_line(&mut out, "Genre", genre);
    let _ = writeln!(out, "Number of episodes: {episode_count}");
    out.push_str(
        "\nReturn a JSON object:\n\
         {\"title\": string, \"summary\": string,\n \
         \"characters\": [{\"name\": string, \"description\": string, \"role\": string, \"appearance\": string}],\n \
         \"episodes\": [{\"episode_number\": number, \"title\": string, \"synopsis\": string}],\n \
         \"plot_threads\": [{\"name\": string, \"description\": string}]}\n",
    );
    let _ = write!(
        out,
        "\"episodes\" must contain exactly {episode_count} items numbered from 1. \
         \"plot_threads\" are storylines that span several episodes."
    );
    out
}

// ---------------------------------------------------------------------------
// Episode
// ---------------------------------------------------------------------------

/// Inputs for writing one episode of a series.
pub struct EpisodePromptInput<'a> {
    pub series_title: &'a str,
    pub series_summary: &'a str,
    pub genre: Option<&'a str>,
    pub characters: &'a [Character],
    pub plot_threads: &'a [PlotThread],
    pub outline: &'a EpisodeOutline,
    pub total_episodes: usize,
    /// Episodes already written, in order, for continuity.
    pub previous: &'a [EpisodeOutline],
    pub target_words: u32,
}

/// Write the full text of one episode.
pub fn write_episode(input: &EpisodePromptInput<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Write episode {} of {} of the series \"{}\".\n",
        input.outline.episode_number, input.total_episodes, input.series_title
    );
    let _ = writeln!(out, "Series summary: {}", input.series_summary);
    optional_line(&mut out, "Genre", input.genre);

    out.push_str("\nCHARACTERS:\n");
    out.push_str(&roster(input.characters));

    if !input.plot_threads.is_empty() {
        out.push_str("\nPLOT THREADS:\n");
        for t in input.plot_threads {
            let _ = writeln!(out, "- {}: {}", t.name, t.description);
        }
    }

    if !input.previous.is_empty() {
        out.push_str("\nPREVIOUSLY:\n");
        for p in input.previous {
            let _ = writeln!(out, "Episode {} \"{}\": {}", p.episode_number, p.title, p.synopsis);
        }
    }

    let _ = writeln!(
        out,
        "\nTHIS EPISODE: \"{}\" -- {}",
        input.outline.title, input.outline.synopsis
    );
    let _ = write!(
        out,
        "\nWrite about {} words. Stay consistent with earlier episodes and advance at \
         least one plot thread.\n\
         Return a JSON object: {{\"title\": string, \"synopsis\": string, \"content\": string}}",
        input.target_words
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cast() -> Vec<Character> {
        vec![Character {
            name: "Oskar".to_string(),
            description: "a retired diver".to_string(),
            role: "protagonist".to_string(),
            appearance: "white beard".to_string(),
        }]
    }

    #[test]
    fn expand_story_includes_inputs_and_skips_blank_options() {
        let p = expand_story("A diver finds a bell.", Some("mystery"), Some("  "), 1200);
        assert!(p.contains("Summary: A diver finds a bell."));
        assert!(p.contains("Genre: mystery"));
        assert!(!p.contains("Tone:"));
        assert!(p.contains("about 1200 words"));
    }

    #[test]
    fn segment_prompt_lists_cast() {
        let p = segment_scenes("story text", &cast(), 8);
        assert!(p.contains("- Oskar (protagonist): a retired diver Appearance: white beard"));
        assert!(p.contains("between 1 and 8"));
        assert!(p.ends_with("story text"));
    }

    #[test]
    fn empty_cast_is_marked() {
        let p = extract_characters("x");
        assert!(p.contains("STORY:\nx"));
        assert!(segment_scenes("x", &[], 3).contains("(none identified)"));
    }

    #[test]
    fn image_prompts_number_scenes_and_apply_style() {
        let present = vec!["Oskar".to_string()];
        let scenes = [
            SceneBrief { title: "Dock", description: "Oskar arrives", characters: &present },
            SceneBrief { title: "Dive", description: "He descends", characters: &present },
        ];
        let p = image_prompts(&scenes, &cast(), Some("ink wash"));
        assert!(p.contains("each of the 2 scenes"));
        assert!(p.contains("visual style: ink wash"));
        assert!(p.contains("1. Dock -- Oskar arrives [present: Oskar]"));
        assert!(p.contains("2. Dive -- He descends"));

        let default_style = image_prompts(&scenes, &cast(), None);
        assert!(default_style.contains("cinematic illustration"));
    }

    #[test]
    fn series_prompt_states_episode_count() {
        let p = series_metadata("Lighthouses talk to each other.", None, 5);
        assert!(p.contains("Number of episodes: 5"));
        assert!(p.contains("exactly 5 items"));
        assert!(!p.contains("Genre:"));
    }

    #[test]
    fn episode_prompt_carries_continuity() {
        let outline = EpisodeOutline {
            episode_number: 2,
            title: "Undertow".to_string(),
            synopsis: "The bell rings again.".to_string(),
        };
        let previous = vec![EpisodeOutline {
            episode_number: 1,
            title: "The Bell".to_string(),
            synopsis: "Oskar hears a bell.".to_string(),
        }];
        let threads = vec![PlotThread {
            name: "The bell".to_string(),
            description: "Who rings it".to_string(),
        }];
        let characters = cast();
        let p = write_episode(&EpisodePromptInput {
            series_title: "Tidewater",
            series_summary: "A drowned town.",
            genre: Some("gothic"),
            characters: &characters,
            plot_threads: &threads,
            outline: &outline,
            total_episodes: 6,
            previous: &previous,
            target_words: 1500,
        });
        assert!(p.starts_with("Write episode 2 of 6 of the series \"Tidewater\"."));
        assert!(p.contains("Episode 1 \"The Bell\": Oskar hears a bell."));
        assert!(p.contains("- The bell: Who rings it"));
        assert!(p.contains("THIS EPISODE: \"Undertow\" -- The bell rings again."));
    }
}
