//! Utilities for turning raw model text into structured data.
//!
//! Models often wrap their answer in a markdown code fence or surround JSON
//! with a sentence of explanation. A fence only counts when it wraps the
//! whole answer; fences inside prose or inside JSON strings are content.
//!
//! JSON candidates are tried in order until one deserializes:
//! 1. The trimmed text as-is
//! 2. The body of a wrapping fence (```json ... ``` or a bare ``` ... ```)
//! 3. Each balanced `{ ... }` or `[ ... ]`, in the order they open

use serde::de::{DeserializeOwned, IgnoredAny};

use crate::generator::LlmError;

/// Remove a fence wrapping the whole answer, if any, and trim.
///
/// A missing closing fence (truncated output) keeps everything after the
/// opening fence line.
pub fn strip_code_fences(text: &str) -> String {
    match fenced_block(text) {
        Some(inner) => inner.to_string(),
        None => text.trim().to_string(),
    }
}

/// Locate the JSON payload inside model output.
///
/// Returns the first candidate that is well-formed JSON, or the trimmed
/// text when none is.
pub fn extract_json(text: &str) -> &str {
    candidates(text)
        .find(|c| serde_json::from_str::<IgnoredAny>(c).is_ok())
        .unwrap_or_else(|| text.trim())
}

/// Extract and deserialize JSON from model output.
///
/// The first candidate that deserializes into `T` wins. On failure the
/// reported error comes from the first well-formed candidate, so a shape
/// mismatch is not hidden behind a syntax error.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, LlmError> {
    let mut first_err: Option<serde_json::Error> = None;
    for candidate in candidates(text) {
        match serde_json::from_str::<T>(candidate) {
            Ok(value) => return Ok(value),
            Err(e) if first_err.is_none() && !e.is_syntax() && !e.is_eof() => first_err = Some(e),
            Err(_) => {}
        }
    }

    let err = match first_err {
        Some(e) => e,
        None => match serde_json::from_str::<T>(text.trim()) {
            Err(e) => e,
            Ok(value) => return Ok(value),
        },
    };
    tracing::warn!(
        error = %err,
        response_len = text.len(),
        "Model output is not the expected JSON"
    );
    Err(LlmError::Parse(err.to_string()))
}

fn candidates(text: &str) -> impl Iterator<Item = &str> {
    std::iter::once(text.trim())
        .chain(fenced_block(text))
        .chain(text.char_indices().filter_map(move |(i, ch)| match ch {
            '{' => balanced_at(text, i, '{', '}'),
            '[' => balanced_at(text, i, '[', ']'),
            _ => None,
        }))
}

fn fenced_block(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    let after_ticks = trimmed.strip_prefix("```")?;
    // Skip the language tag (e.g. `json`) up to the end of the line.
    let body = match after_ticks.find('\n') {
        Some(n) => &after_ticks[n + 1..],
        None => "",
    };
    let inner = body.strip_suffix("```").unwrap_or(body);
    Some(inner.trim())
}

fn balanced_at(text: &str, start: usize, open: char, close: char) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
