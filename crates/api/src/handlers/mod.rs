pub mod episode;
pub mod series;
pub mod story;
pub mod workflow_run;
