//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument. Lookups of user-owned rows
//! always filter by owner, so another user's row reads as missing.

pub mod episode_repo;
pub mod scene_repo;
pub mod series_repo;
pub mod story_repo;
pub mod workflow_run_repo;

pub use episode_repo::EpisodeRepo;
pub use scene_repo::SceneRepo;
pub use series_repo::SeriesRepo;
pub use story_repo::StoryRepo;
pub use workflow_run_repo::WorkflowRunRepo;
