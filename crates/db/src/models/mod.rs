//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts

pub mod episode;
pub mod scene;
pub mod series;
pub mod story;
pub mod workflow_run;
