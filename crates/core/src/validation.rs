//! Input validation rules for generation requests.
//!
//! These are used by the API layer before any model call is made so that a
//! bad request never opens a workflow run.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Minimum length of a story summary, in characters (after trimming).
pub const MIN_SUMMARY_CHARS: usize = 10;

/// Maximum length of a story summary or series premise, in characters.
pub const MAX_SUMMARY_CHARS: usize = 4_000;

/// Minimum length of a series premise, in characters (after trimming).
pub const MIN_PREMISE_CHARS: usize = 10;

/// Maximum length of short labels such as genre, tone and image style.
pub const MAX_LABEL_CHARS: usize = 80;

/// Maximum number of episodes a series outline may contain.
pub const MAX_EPISODES_PER_SERIES: i32 = 24;

/// Default number of episodes when the request does not specify one.
pub const DEFAULT_EPISODE_COUNT: i32 = 6;

/// Accepted range for a requested story or episode length, in words.
pub const MIN_TARGET_WORDS: u32 = 200;
pub const MAX_TARGET_WORDS: u32 = 5_000;

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

fn validate_text(field: &str, value: &str, min: usize, max: usize) -> Result<(), CoreError> {
    let len = value.trim().chars().count();
    if len < min {
        return Err(CoreError::Validation(format!(
            "{field} must be at least {min} characters, got {len}"
        )));
    }
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters, got {len}"
        )));
    }
    Ok(())
}

/// Validate the free-text summary a story is expanded from.
pub fn validate_summary(summary: &str) -> Result<(), CoreError> {
    validate_text("summary", summary, MIN_SUMMARY_CHARS, MAX_SUMMARY_CHARS)
}

/// Validate the premise a series is generated from.
pub fn validate_premise(premise: &str) -> Result<(), CoreError> {
    validate_text("premise", premise, MIN_PREMISE_CHARS, MAX_SUMMARY_CHARS)
}

/// Validate an optional short label (genre, tone, image style).
///
/// `None` is valid. A present value must be non-blank and at most
/// [`MAX_LABEL_CHARS`] long.
pub fn validate_optional_label(field: &str, value: Option<&str>) -> Result<(), CoreError> {
    match value {
        None => Ok(()),
        Some(v) => validate_text(field, v, 1, MAX_LABEL_CHARS),
    }
}

/// Validate the requested number of episodes in a series outline.
pub fn validate_episode_count(count: i32) -> Result<(), CoreError> {
    if !(1..=MAX_EPISODES_PER_SERIES).contains(&count) {
        return Err(CoreError::Validation(format!(
            "episode_count must be between 1 and {MAX_EPISODES_PER_SERIES}, got {count}"
        )));
    }
    Ok(())
}

/// Validate that an episode number exists within a series of `outline_len` episodes.
///
/// Episode numbers are 1-based.
pub fn validate_episode_number(episode_number: i32, outline_len: usize) -> Result<(), CoreError> {
    if episode_number < 1 || episode_number as usize > outline_len {
        return Err(CoreError::Validation(format!(
            "episode_number must be between 1 and {outline_len}, got {episode_number}"
        )));
    }
    Ok(())
}

/// Validate an optional target length in words.
pub fn validate_target_words(target_words: Option<u32>) -> Result<(), CoreError> {
    match target_words {
        Some(w) if !(MIN_TARGET_WORDS..=MAX_TARGET_WORDS).contains(&w) => {
            Err(CoreError::Validation(format!(
                "target_words must be between {MIN_TARGET_WORDS} and {MAX_TARGET_WORDS}, got {w}"
            )))
        }
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
