//! Shared domain primitives for Storyloom.
//!
//! This crate has no I/O and no internal dependencies so the database,
//! pipeline and API layers can all depend on it.

pub mod content;
pub mod error;
pub mod pagination;
pub mod types;
pub mod validation;
pub mod workflow;
