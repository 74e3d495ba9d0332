use crate::auth::jwt::JwtConfig;

/// Allowance on top of the model calls for database work in one workflow.
const WORKFLOW_DB_MARGIN_SECS: u64 = 30;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `600`). Workflows chain
    /// several model calls, so this is much longer than a CRUD timeout.
    /// See [`ServerConfig::cover_workflow`].
    pub request_timeout_secs: u64,
    /// Bearer token validation settings.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `600`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "600".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
        }
    }

    /// Raise the request timeout so a workflow of `model_calls` sequential
    /// calls, each allowed `call_timeout_secs`, completes within one request.
    ///
    /// Returns `true` if the timeout was raised.
    pub fn cover_workflow(&mut self, call_timeout_secs: u64, model_calls: u64) -> bool {
        let needed = call_timeout_secs
            .saturating_mul(model_calls)
            .saturating_add(WORKFLOW_DB_MARGIN_SECS);
        if self.request_timeout_secs >= needed {
            return false;
        }
        self.request_timeout_secs = needed;
        true
    }
}
