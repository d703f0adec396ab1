//! Application layer for tasklist.
//!
//! This crate wraps the core task store in a logging service and provides
//! configuration loading and the parsers front-ends use to turn user input into
//! task values.

pub mod config;
pub mod filter_util;
pub mod service;
pub mod task_patch;

// Re-exports for convenience
pub use config::{DefaultsConfig, DisplayConfig, ProjectConfig, default_config_path, generate_default_config_toml};
pub use filter_util::{
    DUE_FORMAT, FilterBuildError, FilterBuildResult, TaskFilterBuilder, format_due, parse_due, parse_optional,
    parse_priority, parse_recurrence, parse_sort_key, parse_tags,
};
pub use service::TaskService;
pub use task_patch::{SetDiff, TaskEditData, TaskPatch, diff_tags};
