use tasklist_core::{
    Clock, Completion, MetadataUpdate, NewTask, SortKey, SystemClock, Task, TaskError, TaskFilter, TaskId,
    TaskResult, TaskStore, Timestamp, filter_tasks, overdue_tasks, search_tasks, sort_tasks, validate_content,
};
use tracing::{debug, info, warn};

use crate::config::ProjectConfig;
use crate::task_patch::TaskPatch;

/// Service façade that owns the task store and exposes every task operation.
#[derive(Debug)]
pub struct TaskService<C = SystemClock> {
    store: TaskStore<C>,
    config: ProjectConfig,
}

impl TaskService<SystemClock> {
    /// Empty service backed by the system clock.
    #[must_use]
    pub const fn new(config: ProjectConfig) -> Self {
        Self::with_store(TaskStore::new(), config)
    }
}

impl<C> TaskService<C> {
    /// Wrap an existing store.
    pub const fn with_store(store: TaskStore<C>, config: ProjectConfig) -> Self {
        Self { store, config }
    }

    /// Active configuration.
    pub const fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Read-only access to the store.
    pub const fn store(&self) -> &TaskStore<C> {
        &self.store
    }
}

impl<C: Clock> TaskService<C> {
    /// Create a task, filling unset priority/recurrence from configuration.
    ///
    /// # Errors
    /// Returns [`TaskError::Validation`] for invalid content.
    pub fn add(&mut self, mut request: NewTask) -> TaskResult<Task> {
        request.priority = request.priority.or(Some(self.config.defaults.priority));
        request.recurrence = request.recurrence.or(Some(self.config.defaults.recurrence));
        let task = self.store.add(request)?;
        info!(task_id = %task.id(), priority = %task.priority(), "task created");
        Ok(task)
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.store.get(id)
    }

    /// Look up a task, failing when it does not exist.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] for unknown ids.
    pub fn require(&self, id: TaskId) -> TaskResult<&Task> {
        self.store.get(id).ok_or(TaskError::NotFound(id))
    }

    /// Replace a task's content.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] or [`TaskError::Validation`].
    pub fn update_content(&mut self, id: TaskId, content: &str) -> TaskResult<Task> {
        let task = self.store.update_content(id, content)?;
        info!(task_id = %id, "task content updated");
        Ok(task)
    }

    /// Apply metadata changes.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] for unknown ids.
    pub fn update_metadata(&mut self, id: TaskId, update: MetadataUpdate) -> TaskResult<Task> {
        let task = self.store.update_metadata(id, update)?;
        info!(task_id = %id, "task metadata updated");
        Ok(task)
    }

    /// Apply an edit patch. Content is validated before anything is written.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] or [`TaskError::Validation`].
    pub fn apply_patch(&mut self, id: TaskId, patch: TaskPatch) -> TaskResult<Task> {
        self.require(id)?;
        if patch.is_empty() {
            debug!(task_id = %id, "empty patch skipped");
            return self.require(id).cloned();
        }

        let TaskPatch { content, metadata, .. } = patch;
        if let Some(content) = &content {
            validate_content(content)?;
        }

        let mut task = None;
        if let Some(content) = content {
            task = Some(self.update_content(id, &content)?);
        }
        if !metadata.is_empty() {
            task = Some(self.update_metadata(id, metadata)?);
        }
        task.map_or_else(|| self.require(id).cloned(), Ok)
    }

    /// Delete a task permanently.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] for unknown ids.
    pub fn delete(&mut self, id: TaskId) -> TaskResult<Task> {
        let task = self.store.delete(id)?;
        info!(task_id = %id, "task deleted");
        Ok(task)
    }

    /// Mark a task complete, spawning the next instance of a repeating task.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] for unknown ids.
    pub fn mark_complete(&mut self, id: TaskId) -> TaskResult<Completion> {
        let completion = self.store.mark_complete(id)?;
        info!(task_id = %id, "task completed");

        let task = &completion.task;
        match &completion.next {
            Some(next) => {
                info!(task_id = %id, next_id = %next.id(), recurrence = %task.recurrence(), "next occurrence scheduled");
            }
            None if task.recurrence().repeats() && task.due().is_some() => {
                warn!(task_id = %id, "next occurrence falls outside the supported calendar range");
            }
            None => {}
        }
        Ok(completion)
    }

    /// Mark a task incomplete.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] for unknown ids.
    pub fn mark_incomplete(&mut self, id: TaskId) -> TaskResult<Task> {
        let task = self.store.mark_incomplete(id)?;
        info!(task_id = %id, "task reopened");
        Ok(task)
    }

    /// Remove every task and restart ids at 1.
    pub fn reset(&mut self) {
        let removed = self.store.count();
        self.store.clear();
        info!(removed, "store reset");
    }

    /// Number of stored tasks.
    #[must_use]
    pub fn count(&self) -> usize {
        self.store.count()
    }

    /// Snapshot of every task ordered by id.
    #[must_use]
    pub fn list(&self) -> Vec<Task> {
        self.store.list_all()
    }

    /// Search the current snapshot.
    #[must_use]
    pub fn search(&self, keyword: &str) -> Vec<Task> {
        let found = search_tasks(&self.store.list_all(), keyword);
        debug!(keyword, matches = found.len(), "search");
        found
    }

    /// Filter the current snapshot.
    #[must_use]
    pub fn filter(&self, filter: &TaskFilter) -> Vec<Task> {
        let found = filter_tasks(&self.store.list_all(), filter);
        debug!(?filter, matches = found.len(), "filter");
        found
    }

    /// Sort the current snapshot.
    #[must_use]
    pub fn sort(&self, key: SortKey) -> Vec<Task> {
        debug!(%key, "sort");
        sort_tasks(&self.store.list_all(), key)
    }

    /// Overdue tasks relative to the store's clock.
    #[must_use]
    pub fn overdue(&self) -> Vec<Task> {
        self.overdue_at(self.store.clock().now())
    }

    /// Overdue tasks relative to `now`.
    #[must_use]
    pub fn overdue_at(&self, now: Timestamp) -> Vec<Task> {
        overdue_tasks(&self.store.list_all(), now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DefaultsConfig;
    use crate::task_patch::TaskEditData;
    use std::fmt::Display;
    use tasklist_core::{Priority, Recurrence, TaskStatus, ValidationError};
    use time::macros::datetime;

    struct FixedClock(Timestamp);

    impl Clock for FixedClock {
        fn now(&self) -> Timestamp {
            self.0
        }
    }

    fn ok<T, E: Display>(result: Result<T, E>, context: &str) -> T {
        result.unwrap_or_else(|err| panic!("{context}: {err}"))
    }

    fn service_at(now: Timestamp) -> TaskService<FixedClock> {
        TaskService::with_store(TaskStore::with_clock(FixedClock(now)), ProjectConfig::default())
    }

    fn id(raw: u64) -> TaskId {
        ok(TaskId::new(raw), "valid id")
    }

    #[test]
    fn add_applies_configured_defaults() {
        let config = ProjectConfig {
            defaults: DefaultsConfig {
                priority: Priority::Low,
                recurrence: Recurrence::Weekly,
                ..DefaultsConfig::default()
            },
            ..ProjectConfig::default()
        };
        let mut service = TaskService::with_store(TaskStore::with_clock(FixedClock(datetime!(2025-01-01 00:00))), config);

        let defaulted = ok(service.add(NewTask::new("defaults")), "add defaulted");
        assert_eq!(defaulted.priority(), Priority::Low);
        assert_eq!(defaulted.recurrence(), Recurrence::Weekly);

        let explicit = ok(service.add(NewTask::new("explicit").priority(Priority::High)), "add explicit");
        assert_eq!(explicit.priority(), Priority::High);
    }

    #[test]
    fn apply_patch_is_atomic_on_invalid_content() {
        let mut service = service_at(datetime!(2025-01-01 00:00));
        let task = ok(service.add(NewTask::new("original")), "add");

        let mut data = TaskEditData::from_task(&task);
        data.content = "x".repeat(tasklist_core::MAX_CONTENT_CHARS + 1);
        data.priority = Priority::High;
        let patch = TaskPatch::from_task(&task, data);

        let err = service.apply_patch(task.id(), patch).err();
        assert!(matches!(
            err,
            Some(TaskError::Validation(ValidationError::ContentTooLong { .. }))
        ));
        assert_eq!(service.get(task.id()), Some(&task));
    }

    #[test]
    fn apply_patch_updates_content_and_metadata() {
        let mut service = service_at(datetime!(2025-01-01 00:00));
        let task = ok(service.add(NewTask::new("draft")), "add");

        let mut data = TaskEditData::from_task(&task);
        data.content = "final".into();
        data.due = Some(datetime!(2025-02-01 10:00));
        data.tags = vec!["Work".into()];
        let patched = ok(service.apply_patch(task.id(), TaskPatch::from_task(&task, data)), "patch");

        assert_eq!(patched.content(), "final");
        assert_eq!(patched.due(), Some(datetime!(2025-02-01 10:00)));
        assert_eq!(patched.tags(), ["work"]);
    }

    #[test]
    fn apply_patch_on_missing_task_is_not_found() {
        let mut service = service_at(datetime!(2025-01-01 00:00));
        assert_eq!(
            service.apply_patch(id(3), TaskPatch::default()).err(),
            Some(TaskError::NotFound(id(3)))
        );
    }

    #[test]
    fn mark_complete_reports_spawned_instance() {
        let mut service = service_at(datetime!(2025-01-01 00:00));
        let task = ok(
            service.add(
                NewTask::new("gym")
                    .due(datetime!(2025-01-06 18:00))
                    .recurrence(Recurrence::Weekly),
            ),
            "add",
        );
        let completion = ok(service.mark_complete(task.id()), "complete");
        assert_eq!(completion.task.status(), TaskStatus::Complete);
        assert_eq!(
            completion.next.as_ref().and_then(Task::due),
            Some(datetime!(2025-01-13 18:00))
        );
        assert_eq!(service.count(), 2);
    }

    #[test]
    fn overdue_uses_store_clock() {
        let mut service = service_at(datetime!(2025-03-01 12:00));
        ok(service.add(NewTask::new("late").due(datetime!(2025-02-28 09:00))), "add late");
        ok(service.add(NewTask::new("future").due(datetime!(2025-03-02 09:00))), "add future");
        ok(service.add(NewTask::new("unscheduled")), "add unscheduled");

        let overdue = service.overdue();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].content(), "late");
    }

    #[test]
    fn queries_leave_store_untouched() {
        let mut service = service_at(datetime!(2025-01-01 00:00));
        ok(service.add(NewTask::new("b task").tags(["x"])), "add b");
        ok(service.add(NewTask::new("a task")), "add a");
        let before = service.list();

        let sorted = service.sort(SortKey::Title);
        assert_eq!(sorted[0].content(), "a task");
        assert_eq!(service.search("X").len(), 1);
        assert_eq!(service.filter(&TaskFilter::default()).len(), 2);
        assert_eq!(service.list(), before);
    }

    #[test]
    fn reset_restarts_ids() {
        let mut service = service_at(datetime!(2025-01-01 00:00));
        ok(service.add(NewTask::new("one")), "add");
        ok(service.add(NewTask::new("two")), "add");
        service.reset();
        assert_eq!(service.count(), 0);
        assert_eq!(ok(service.add(NewTask::new("again")), "add").id(), id(1));
    }
}
