//! The text generation seam between workflows and model providers.

use async_trait::async_trait;

/// A single prompt sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Optional system instruction framing the model's role.
    pub system: Option<String>,
    /// The user prompt.
    pub prompt: String,
    /// Sampling temperature override. `None` uses the client default.
    pub temperature: Option<f32>,
    /// Ask the provider to constrain output to JSON when it supports it.
    pub json_output: bool,
}

impl GenerationRequest {
    /// A prose request with no system instruction.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature: None,
            json_output: false,
        }
    }

    /// A request whose answer is expected to be JSON.
    pub fn json(prompt: impl Into<String>) -> Self {
        Self {
            json_output: true,
            ..Self::text(prompt)
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Errors from a model call.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Model API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The provider answered but produced no text (e.g. safety block).
    #[error("Model returned no text{}", .reason.as_ref().map(|r| format!(" ({r})")).unwrap_or_default())]
    EmptyResponse { reason: Option<String> },

    /// The model text could not be turned into the expected structure.
    #[error("Could not parse model output: {0}")]
    Parse(String),
}

/// Anything that can turn a prompt into text.
///
/// Implemented by [`crate::GeminiClient`] for production and
/// [`crate::ScriptedGenerator`] for tests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one prompt and return the model's raw text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError>;

    /// Identifier of the underlying model, for logging and audit rows.
    fn model_name(&self) -> &str;
}
