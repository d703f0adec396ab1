use time::PrimitiveDateTime;

use crate::error::ValidationError;
use crate::id::TaskId;
use crate::state::{Priority, Recurrence, TaskStatus};

/// Naive local date and time. No timezone handling is performed.
pub type Timestamp = PrimitiveDateTime;

/// Maximum content length in characters, measured after trimming.
pub const MAX_CONTENT_CHARS: usize = 500;

/// A single to-do item.
///
/// Fields are read through accessors; mutation goes through
/// [`TaskStore`](crate::store::TaskStore) so that validation and `updated_at`
/// bookkeeping cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    content: String,
    status: TaskStatus,
    due: Option<Timestamp>,
    priority: Priority,
    tags: Vec<String>,
    recurrence: Recurrence,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Task {
    /// Build a task with default metadata.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] when the trimmed content is empty or too long.
    pub fn new(id: TaskId, content: &str, now: Timestamp) -> Result<Self, ValidationError> {
        let content = validate_content(content)?;
        Ok(Self {
            id,
            content,
            status: TaskStatus::Incomplete,
            due: None,
            priority: Priority::default(),
            tags: Vec::new(),
            recurrence: Recurrence::default(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Set the due timestamp.
    #[must_use]
    pub const fn with_due(mut self, due: Option<Timestamp>) -> Self {
        self.due = due;
        self
    }

    /// Set the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Replace the tags, normalizing them first.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tags(tags);
        self
    }

    /// Set the recurrence rule.
    #[must_use]
    pub const fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    /// Identifier assigned by the store.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Trimmed task text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Completion status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns true when the task is complete.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.status, TaskStatus::Complete)
    }

    /// Due timestamp, if scheduled.
    #[must_use]
    pub const fn due(&self) -> Option<Timestamp> {
        self.due
    }

    /// Priority level.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Normalized tags in first-seen order.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Recurrence rule.
    #[must_use]
    pub const fn recurrence(&self) -> Recurrence {
        self.recurrence
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Timestamp of the latest mutation.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Incomplete and due strictly before `now`.
    #[must_use]
    pub fn is_overdue(&self, now: Timestamp) -> bool {
        !self.is_complete() && self.due.is_some_and(|due| due < now)
    }

    pub(crate) fn set_content(&mut self, content: String) {
        self.content = content;
    }

    pub(crate) const fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    pub(crate) const fn set_due(&mut self, due: Option<Timestamp>) {
        self.due = due;
    }

    pub(crate) const fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    pub(crate) fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = tags;
    }

    pub(crate) const fn set_recurrence(&mut self, recurrence: Recurrence) {
        self.recurrence = recurrence;
    }

    /// Refresh `updated_at`, never letting it fall behind `created_at`.
    pub(crate) fn touch(&mut self, now: Timestamp) {
        self.updated_at = now.max(self.created_at);
    }
}

/// Trim content and check it against the length rules.
///
/// # Errors
/// Returns [`ValidationError::EmptyContent`] or [`ValidationError::ContentTooLong`].
pub fn validate_content(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    let length = trimmed.chars().count();
    if length > MAX_CONTENT_CHARS {
        return Err(ValidationError::ContentTooLong {
            length,
            max: MAX_CONTENT_CHARS,
        });
    }
    Ok(trimmed.to_owned())
}

/// Lower-case and trim tags, dropping blanks and duplicates while keeping first-seen order.
#[must_use]
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim().to_lowercase();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}
