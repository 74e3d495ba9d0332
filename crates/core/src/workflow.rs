//! Workflow names and run lifecycle statuses.
//!
//! A workflow run is an audit row: it is created `Pending`, moves to
//! `Running` when the first model call is made, and ends in exactly one of
//! `Completed` or `Failed`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Status ID type matching the SMALLINT `workflow_run_statuses` lookup table.
pub type StatusId = i16;

// ---------------------------------------------------------------------------
// Workflow names
// ---------------------------------------------------------------------------

/// The named LLM workflows the server can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowName {
    /// Summary -> story text -> characters -> scenes -> image prompts.
    StoryGeneration,
    /// Premise -> series title, roster, episode outlines, plot threads.
    SeriesGeneration,
    /// Series outline -> episode text -> scenes -> image prompts.
    EpisodeGeneration,
    /// Re-run image prompt generation over already persisted scenes.
    SceneImagePrompts,
}

impl WorkflowName {
    pub const ALL: [WorkflowName; 4] = [
        WorkflowName::StoryGeneration,
        WorkflowName::SeriesGeneration,
        WorkflowName::EpisodeGeneration,
        WorkflowName::SceneImagePrompts,
    ];

    /// The identifier stored in `workflow_runs.workflow`.
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowName::StoryGeneration => "story_generation",
            WorkflowName::SeriesGeneration => "series_generation",
            WorkflowName::EpisodeGeneration => "episode_generation",
            WorkflowName::SceneImagePrompts => "scene_image_prompts",
        }
    }
}

impl fmt::Display for WorkflowName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown workflow '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Run status
// ---------------------------------------------------------------------------

/// Workflow run status. Discriminants match the seed order of
/// `workflow_run_statuses`.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Pending = 1,
    Running = 2,
    Completed = 3,
    Failed = 4,
}

impl RunStatus {
    pub const ALL: [RunStatus; 4] = [
        RunStatus::Pending,
        RunStatus::Running,
        RunStatus::Completed,
        RunStatus::Failed,
    ];

    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Look up a status by its database ID.
    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(RunStatus::Pending),
            2 => Some(RunStatus::Running),
            3 => Some(RunStatus::Completed),
            4 => Some(RunStatus::Failed),
            _ => None,
        }
    }

    /// Lower-case label used in API responses.
    pub fn label(self) -> &'static str {
        match self {
            RunStatus::Pending => "pending",
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        }
    }

    /// Terminal statuses never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }

    /// Whether a run may move from `self` to `next`.
    ///
    /// A run that fails before its first model call goes straight from
    /// `Pending` to `Failed`.
    pub fn can_transition_to(self, next: RunStatus) -> bool {
        matches!(
            (self, next),
            (RunStatus::Pending, RunStatus::Running)
                | (RunStatus::Pending, RunStatus::Failed)
                | (RunStatus::Running, RunStatus::Completed)
                | (RunStatus::Running, RunStatus::Failed)
        )
    }

    /// IDs of every status a run may be in before moving to `next`.
    ///
    /// Used as the guard of status updates in SQL.
    pub fn source_ids(next: RunStatus) -> Vec<StatusId> {
        RunStatus::ALL
            .into_iter()
            .filter(|s| s.can_transition_to(next))
            .map(RunStatus::id)
            .collect()
    }
}

impl From<RunStatus> for StatusId {
    fn from(value: RunStatus) -> Self {
        value as StatusId
    }
}
