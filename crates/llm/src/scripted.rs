//! A [`TextGenerator`] that replays canned responses.
//!
//! Used by workflow and API tests in place of a live model. Responses are
//! returned in FIFO order; every request is recorded for later inspection.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::generator::{GenerationRequest, LlmError, TextGenerator};

enum Scripted {
    Text(String),
    Failure { status: u16, body: String },
}

/// In-memory generator returning queued responses.
#[derive(Default)]
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue responses in the order they should be returned.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let generator = Self::new();
        for r in responses {
            generator.push_text(r);
        }
        generator
    }

    /// Queue a successful response.
    pub fn push_text(&self, text: impl Into<String>) {
        self.lock_responses().push_back(Scripted::Text(text.into()));
    }

    /// Queue a provider error response.
    pub fn push_failure(&self, status: u16, body: impl Into<String>) {
        self.lock_responses().push_back(Scripted::Failure {
            status,
            body: body.into(),
        });
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lock_responses().len()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Scripted>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, LlmError> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        match self.lock_responses().pop_front() {
            Some(Scripted::Text(text)) => Ok(text),
            Some(Scripted::Failure { status, body }) => Err(LlmError::Api { status, body }),
            None => Err(LlmError::EmptyResponse {
                reason: Some("script exhausted".to_string()),
            }),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
