//! Generative model access for Storyloom.
//!
//! - [`generator`] -- the [`TextGenerator`] trait every workflow step calls.
//! - [`gemini`] -- REST client for the hosted Gemini `generateContent` API.
//! - [`extraction`] -- fence stripping and JSON extraction for model output.
//! - [`scripted`] -- an in-memory generator returning canned responses.
//! - [`config`] -- environment-driven model configuration.

pub mod config;
pub mod extraction;
pub mod gemini;
pub mod generator;
pub mod scripted;

pub use config::LlmConfig;
pub use gemini::GeminiClient;
pub use generator::{GenerationRequest, LlmError, TextGenerator};
pub use scripted::ScriptedGenerator;
