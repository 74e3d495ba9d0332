use storyloom_llm::LlmError;

/// A workflow failure, always attributed to the step that produced it.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The model call or its parsing failed.
    #[error("Step '{step}' failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: LlmError,
    },

    /// The model answered with well-formed JSON that breaks a workflow rule.
    #[error("Step '{step}' produced invalid output: {reason}")]
    InvalidOutput { step: &'static str, reason: String },
}

impl PipelineError {
    /// Name of the step that failed.
    pub fn step(&self) -> &'static str {
        match self {
            PipelineError::Step { step, .. } | PipelineError::InvalidOutput { step, .. } => step,
        }
    }

    pub(crate) fn invalid(step: &'static str, reason: impl Into<String>) -> Self {
        PipelineError::InvalidOutput {
            step,
            reason: reason.into(),
        }
    }
}
