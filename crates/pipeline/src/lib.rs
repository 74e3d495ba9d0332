//! LLM content-generation workflows.
//!
//! Every workflow is a linear chain of steps. A step builds a prompt from
//! typed input, calls the model, strips code fences, parses the answer and
//! hands a typed value to the next step. The shared step lives in
//! [`step`]; prompt text lives in [`prompts`].
//!
//! - [`story`] -- summary -> story -> characters -> scenes -> image prompts
//! - [`series`] -- premise -> title, roster, episode outlines, plot threads
//! - [`episode`] -- series outline -> episode -> scenes -> image prompts

pub mod episode;
pub mod error;
pub mod prompts;
pub mod series;
pub mod step;
pub mod story;

pub use error::PipelineError;

/// Most sequential model calls any single workflow makes (the story chain).
pub const MAX_MODEL_CALLS_PER_RUN: u64 = 4;
