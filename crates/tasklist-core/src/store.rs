//! Owned, in-memory task collection.

use std::collections::BTreeMap;

use time::{OffsetDateTime, PrimitiveDateTime};

use crate::error::{TaskError, TaskResult};
use crate::id::TaskId;
use crate::recurrence::next_due;
use crate::state::{Priority, Recurrence, TaskStatus};
use crate::task::{Task, Timestamp, normalize_tags, validate_content};

/// Source of "now" for creation and update timestamps.
pub trait Clock {
    /// Current naive local time.
    fn now(&self) -> Timestamp;
}

/// Wall clock in the local offset, falling back to UTC when the offset is unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        PrimitiveDateTime::new(now.date(), now.time())
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Fields accepted when creating a task. Unset fields take their defaults.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    /// Task text; trimmed and validated by the store.
    pub content: String,
    /// Optional due timestamp.
    pub due: Option<Timestamp>,
    /// Priority (defaults to medium).
    pub priority: Option<Priority>,
    /// Tags; normalized by the store.
    pub tags: Vec<String>,
    /// Recurrence rule (defaults to none).
    pub recurrence: Option<Recurrence>,
}

impl NewTask {
    /// Create a request with content only.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Set the due timestamp.
    #[must_use]
    pub const fn due(mut self, due: Timestamp) -> Self {
        self.due = Some(due);
        self
    }

    /// Set the priority.
    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the tags.
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the recurrence rule.
    #[must_use]
    pub const fn recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }
}

/// Patch for the due timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuePatch {
    /// Schedule the task at the given timestamp.
    Set(Timestamp),
    /// Remove the due timestamp.
    Clear,
}

/// Metadata changes for [`TaskStore::update_metadata`]. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataUpdate {
    /// Due timestamp change.
    pub due: Option<DuePatch>,
    /// New priority.
    pub priority: Option<Priority>,
    /// Replacement tag list; normalized by the store.
    pub tags: Option<Vec<String>>,
    /// New recurrence rule.
    pub recurrence: Option<Recurrence>,
}

impl MetadataUpdate {
    /// Returns true when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.due.is_none() && self.priority.is_none() && self.tags.is_none() && self.recurrence.is_none()
    }
}

/// Outcome of [`TaskStore::mark_complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// The task that was marked complete.
    pub task: Task,
    /// Next instance spawned for a repeating task with a due date.
    pub next: Option<Task>,
}

/// Ordered task collection keyed by monotonically increasing identifiers.
#[derive(Debug)]
pub struct TaskStore<C = SystemClock> {
    tasks: BTreeMap<TaskId, Task>,
    next_id: Option<TaskId>,
    clock: C,
}

impl Default for TaskStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore<SystemClock> {
    /// Empty store using the system clock.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> TaskStore<C> {
    /// Empty store using a custom clock.
    pub const fn with_clock(clock: C) -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_id: Some(TaskId::FIRST),
            clock,
        }
    }

    /// Borrow the clock driving this store.
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Validate and store a new task, returning it with its assigned id.
    ///
    /// # Errors
    /// Returns [`TaskError::Validation`] when the content is empty or too long, and
    /// [`TaskError::IdsExhausted`] once the last id has been used; nothing is stored.
    pub fn add(&mut self, request: NewTask) -> TaskResult<Task> {
        let NewTask {
            content,
            due,
            priority,
            tags,
            recurrence,
        } = request;

        let id = self.next_id.ok_or(TaskError::IdsExhausted)?;
        let task = Task::new(id, &content, self.clock.now())?
            .with_due(due)
            .with_priority(priority.unwrap_or_default())
            .with_tags(tags)
            .with_recurrence(recurrence.unwrap_or_default());

        self.next_id = id.next();
        self.tasks.insert(id, task.clone());
        Ok(task)
    }

    /// Look up a task. A miss is not an error.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// Replace a task's content.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] for unknown ids and [`TaskError::Validation`] for bad content.
    pub fn update_content(&mut self, id: TaskId, content: &str) -> TaskResult<Task> {
        let now = self.clock.now();
        let task = self.tasks.get_mut(&id).ok_or(TaskError::NotFound(id))?;
        let content = validate_content(content)?;
        task.set_content(content);
        task.touch(now);
        Ok(task.clone())
    }

    /// Apply metadata changes. `updated_at` is refreshed even when the update is empty.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] for unknown ids.
    pub fn update_metadata(&mut self, id: TaskId, update: MetadataUpdate) -> TaskResult<Task> {
        let now = self.clock.now();
        let task = self.tasks.get_mut(&id).ok_or(TaskError::NotFound(id))?;
        let MetadataUpdate {
            due,
            priority,
            tags,
            recurrence,
        } = update;

        match due {
            Some(DuePatch::Set(value)) => task.set_due(Some(value)),
            Some(DuePatch::Clear) => task.set_due(None),
            None => {}
        }
        if let Some(priority) = priority {
            task.set_priority(priority);
        }
        if let Some(tags) = tags {
            task.set_tags(normalize_tags(tags));
        }
        if let Some(recurrence) = recurrence {
            task.set_recurrence(recurrence);
        }
        task.touch(now);
        Ok(task.clone())
    }

    /// Remove a task permanently. Its id is never handed out again.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] for unknown ids.
    pub fn delete(&mut self, id: TaskId) -> TaskResult<Task> {
        self.tasks.remove(&id).ok_or(TaskError::NotFound(id))
    }

    /// Mark a task complete.
    ///
    /// Every call on a repeating task with a due date spawns a new instance due at
    /// the next occurrence after the original's due date, even when the task was
    /// already complete. The original stays in the store.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] for unknown ids.
    pub fn mark_complete(&mut self, id: TaskId) -> TaskResult<Completion> {
        let task = self.set_status(id, TaskStatus::Complete)?;

        let next = match task.due() {
            Some(due) if task.recurrence().repeats() => match next_due(due, task.recurrence()) {
                Some(next_due) => Some(self.add(NewTask {
                    content: task.content().to_owned(),
                    due: Some(next_due),
                    priority: Some(task.priority()),
                    tags: task.tags().to_vec(),
                    recurrence: Some(task.recurrence()),
                })?),
                None => None,
            },
            _ => None,
        };

        Ok(Completion { task, next })
    }

    /// Mark a task incomplete. No recurrence side effect.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] for unknown ids.
    pub fn mark_incomplete(&mut self, id: TaskId) -> TaskResult<Task> {
        self.set_status(id, TaskStatus::Incomplete)
    }

    /// Number of stored tasks.
    #[must_use]
    pub fn count(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true when the store holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Snapshot of every task ordered by id.
    #[must_use]
    pub fn list_all(&self) -> Vec<Task> {
        self.tasks.values().cloned().collect()
    }

    /// Iterate over stored tasks ordered by id without cloning.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Remove every task and restart ids at 1.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.next_id = Some(TaskId::FIRST);
    }

    fn set_status(&mut self, id: TaskId, status: TaskStatus) -> TaskResult<Task> {
        let now = self.clock.now();
        let task = self.tasks.get_mut(&id).ok_or(TaskError::NotFound(id))?;
        task.set_status(status);
        task.touch(now);
        Ok(task.clone())
    }
}
