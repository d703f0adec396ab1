//! Error types for task validation and store lookups.

use std::num::ParseIntError;

use thiserror::Error;

use crate::id::TaskId;

/// Rejected input for a task field. The failing operation performs no mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Content is empty after trimming surrounding whitespace.
    #[error("task content cannot be empty")]
    EmptyContent,

    /// Content exceeds the maximum length after trimming.
    #[error("task content cannot exceed {max} characters (got {length})")]
    ContentTooLong {
        /// Length of the trimmed content in characters.
        length: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// Task identifiers start at 1.
    #[error("task id must be a positive integer")]
    InvalidId,
}

/// Errors raised by [`TaskStore`](crate::store::TaskStore) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// A field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced task does not exist.
    #[error("task {0} not found")]
    NotFound(TaskId),

    /// Every task identifier has been handed out; [`clear`](crate::store::TaskStore::clear) restarts them.
    #[error("no task ids left to assign")]
    IdsExhausted,
}

impl TaskError {
    /// Identifier carried by a [`TaskError::NotFound`] error.
    #[must_use]
    pub const fn missing_id(&self) -> Option<TaskId> {
        match self {
            Self::NotFound(id) => Some(*id),
            Self::Validation(_) | Self::IdsExhausted => None,
        }
    }
}

/// Result alias for store operations.
pub type TaskResult<T> = Result<T, TaskError>;

/// Failure to parse a task identifier from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTaskIdError {
    /// Input is not a decimal integer.
    #[error("invalid task id {input:?}: {source}")]
    NotANumber {
        /// Raw input.
        input: String,
        /// Underlying integer parse failure.
        #[source]
        source: ParseIntError,
    },

    /// Input parsed to zero.
    #[error("task id must be a positive integer")]
    Zero,
}

/// Failure to parse an enumeration token such as `high` or `weekly`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} {token:?} (expected one of: {expected})")]
pub struct ParseTokenError {
    /// Name of the field being parsed.
    pub kind: &'static str,
    /// Raw token supplied by the caller.
    pub token: String,
    /// Comma-separated accepted tokens.
    pub expected: &'static str,
}
