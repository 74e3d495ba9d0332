//! The single "prompt -> model -> fences -> parse" step every workflow uses.

use serde::de::DeserializeOwned;
use storyloom_llm::extraction::{parse_json, strip_code_fences};
use storyloom_llm::{GenerationRequest, TextGenerator};

use crate::error::PipelineError;

/// Run one step whose answer is JSON and deserialize it into `T`.
pub async fn generate_json<T: DeserializeOwned>(
    model: &dyn TextGenerator,
    step: &'static str,
    request: GenerationRequest,
) -> Result<T, PipelineError> {
    let raw = call(model, step, &request).await?;
    parse_json(&raw).map_err(|source| {
        tracing::error!(step, error = %source, "Step output did not parse");
        PipelineError::Step { step, source }
    })
}

/// Run one step whose answer is prose, with any code fence removed.
pub async fn generate_text(
    model: &dyn TextGenerator,
    step: &'static str,
    request: GenerationRequest,
) -> Result<String, PipelineError> {
    let raw = call(model, step, &request).await?;
    let text = strip_code_fences(&raw);
    if text.is_empty() {
        return Err(PipelineError::invalid(step, "model returned blank text"));
    }
    Ok(text)
}

async fn call(
    model: &dyn TextGenerator,
    step: &'static str,
    request: &GenerationRequest,
) -> Result<String, PipelineError> {
    tracing::debug!(
        step,
        model = model.model_name(),
        prompt_len = request.prompt.len(),
        "Running workflow step"
    );
    model.generate(request).await.map_err(|source| {
        tracing::error!(step, error = %source, "Model call failed");
        PipelineError::Step { step, source }
    })
}
