//! Task entity, in-memory store, recurrence and query engine for tasklist.
//!
//! The crate performs no I/O. Front-ends hand it already-parsed values and
//! render the tasks it returns.

/// Error types.
pub mod error;
/// Identifier types.
pub mod id;
pub mod query;
pub mod recurrence;
/// Status, priority and recurrence enumerations.
pub mod state;
pub mod store;
/// The task entity and its validation rules.
pub mod task;
/// Keyword matching over task fields.
pub mod text_matcher;

pub use error::{ParseTaskIdError, ParseTokenError, TaskError, TaskResult, ValidationError};
pub use id::TaskId;
pub use query::{
    SortKey, TaskFilter, TaskFilterBuilder, filter_tasks, overdue_tasks, search_tasks, sort_tasks,
    sort_tasks_by_token,
};
pub use recurrence::next_due;
pub use state::{Priority, Recurrence, TaskStatus};
pub use store::{Clock, Completion, DuePatch, MetadataUpdate, NewTask, SystemClock, TaskStore};
pub use task::{MAX_CONTENT_CHARS, Task, Timestamp, normalize_tags, validate_content};
pub use text_matcher::TextMatcher;
