/// Default Gemini model.
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
/// Default API base URL.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default per-call timeout in seconds. Long story expansions are slow.
const DEFAULT_TIMEOUT_SECS: u64 = 120;
/// Default sampling temperature.
const DEFAULT_TEMPERATURE: f32 = 0.8;

/// Generative model configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub temperature: f32,
}

impl LlmConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var            | Required | Default                                        |
    /// |--------------------|----------|------------------------------------------------|
    /// | `GEMINI_API_KEY`   | **yes**  | --                                             |
    /// | `LLM_MODEL`        | no       | `gemini-2.0-flash`                             |
    /// | `LLM_BASE_URL`     | no       | `https://generativelanguage.googleapis.com`    |
    /// | `LLM_TIMEOUT_SECS` | no       | `120`                                          |
    /// | `LLM_TEMPERATURE`  | no       | `0.8`                                          |
    ///
    /// # Panics
    ///
    /// Panics if `GEMINI_API_KEY` is missing or empty, or a numeric
    /// variable does not parse.
    pub fn from_env() -> Self {
        let api_key =
            std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set in the environment");
        assert!(!api_key.is_empty(), "GEMINI_API_KEY must not be empty");

        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let base_url = std::env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs: u64 = std::env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("LLM_TIMEOUT_SECS must be a valid u64");

        let temperature: f32 = std::env::var("LLM_TEMPERATURE")
            .unwrap_or_else(|_| DEFAULT_TEMPERATURE.to_string())
            .parse()
            .expect("LLM_TEMPERATURE must be a valid f32");

        Self {
            api_key,
            model,
            base_url,
            timeout_secs,
            temperature,
        }
    }
}
