//! Shared query parameter types for API handlers.

use serde::Deserialize;
use storyloom_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamped `(limit, offset)` ready to bind into a query.
    pub fn resolve(&self) -> (i64, i64) {
        (
            clamp_limit(self.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
            clamp_offset(self.offset),
        )
    }
}

/// Query parameters for `GET /workflow-runs`.
#[derive(Debug, Deserialize)]
pub struct WorkflowRunListParams {
    /// Workflow name filter, e.g. `story_generation`.
    pub workflow: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        assert_eq!(PaginationParams::default().resolve(), (DEFAULT_PAGE_LIMIT, 0));
    }

    #[test]
    fn oversized_limit_and_negative_offset_are_clamped() {
        let params = PaginationParams {
            limit: Some(10_000),
            offset: Some(-5),
        };
        assert_eq!(params.resolve(), (MAX_PAGE_LIMIT, 0));
    }
}
