use tasklist_core::{DuePatch, MetadataUpdate, Priority, Recurrence, Task, Timestamp, normalize_tags};

/// Difference between two tag lists.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SetDiff<T> {
    /// Entries present in the desired list but missing from the current list.
    pub added: Vec<T>,
    /// Entries present in the current list but removed from the desired list.
    pub removed: Vec<T>,
}

impl<T> SetDiff<T> {
    /// Returns true when both added/removed are empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compute differences between two ordered lists, preserving their order.
#[must_use]
pub fn diff_tags<T: PartialEq + Clone>(current: &[T], desired: &[T]) -> SetDiff<T> {
    SetDiff {
        added: desired.iter().filter(|tag| !current.contains(tag)).cloned().collect(),
        removed: current.iter().filter(|tag| !desired.contains(tag)).cloned().collect(),
    }
}

/// Desired task fields collected by an edit form.
#[derive(Debug, Clone)]
pub struct TaskEditData {
    /// Desired content (trimmed before comparison).
    pub content: String,
    /// Desired due timestamp (`None` clears).
    pub due: Option<Timestamp>,
    /// Desired priority.
    pub priority: Priority,
    /// Desired tags (normalized before comparison).
    pub tags: Vec<String>,
    /// Desired recurrence rule.
    pub recurrence: Recurrence,
}

impl TaskEditData {
    /// Prefill an edit form with the task's current values.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            content: task.content().to_owned(),
            due: task.due(),
            priority: task.priority(),
            tags: task.tags().to_vec(),
            recurrence: task.recurrence(),
        }
    }
}

/// Diff between a task and target fields.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskPatch {
    /// Content change (if any).
    pub content: Option<String>,
    /// Metadata changes.
    pub metadata: MetadataUpdate,
    /// Tag additions/removals, for reporting.
    pub tags: SetDiff<String>,
}

impl TaskPatch {
    /// Compute a patch by comparing the task with the provided edits.
    #[must_use]
    pub fn from_task(task: &Task, data: TaskEditData) -> Self {
        let TaskEditData {
            content,
            due,
            priority,
            tags,
            recurrence,
        } = data;

        let mut patch = Self::default();

        let content = content.trim();
        if content != task.content() {
            patch.content = Some(content.to_owned());
        }

        patch.metadata.due = match (task.due(), due) {
            (Some(old), Some(new)) if old != new => Some(DuePatch::Set(new)),
            (None, Some(new)) => Some(DuePatch::Set(new)),
            (Some(_), None) => Some(DuePatch::Clear),
            _ => None,
        };

        if priority != task.priority() {
            patch.metadata.priority = Some(priority);
        }

        let desired_tags = normalize_tags(tags);
        if desired_tags != task.tags() {
            patch.tags = diff_tags(task.tags(), &desired_tags);
            patch.metadata.tags = Some(desired_tags);
        }

        if recurrence != task.recurrence() {
            patch.metadata.recurrence = Some(recurrence);
        }

        patch
    }

    /// Returns true when the patch would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.content.is_none() && self.metadata.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklist_core::{NewTask, TaskStore};
    use time::macros::datetime;

    fn sample() -> Task {
        let mut store = TaskStore::new();
        store
            .add(
                NewTask::new("Pay rent")
                    .due(datetime!(2025-02-01 09:00))
                    .priority(Priority::High)
                    .tags(["bills", "home"]),
            )
            .unwrap_or_else(|err| panic!("must add task: {err}"))
    }

    #[test]
    fn unchanged_form_yields_empty_patch() {
        let task = sample();
        let patch = TaskPatch::from_task(&task, TaskEditData::from_task(&task));
        assert!(patch.is_empty());
        assert!(patch.tags.is_empty());
    }

    #[test]
    fn patch_detects_content_and_priority_changes() {
        let task = sample();
        let mut data = TaskEditData::from_task(&task);
        data.content = "  Pay rent early ".into();
        data.priority = Priority::Low;

        let patch = TaskPatch::from_task(&task, data);
        assert_eq!(patch.content.as_deref(), Some("Pay rent early"));
        assert_eq!(patch.metadata.priority, Some(Priority::Low));
        assert!(patch.metadata.due.is_none());
    }

    #[test]
    fn whitespace_only_content_change_is_ignored() {
        let task = sample();
        let mut data = TaskEditData::from_task(&task);
        data.content = " Pay rent ".into();
        assert!(TaskPatch::from_task(&task, data).is_empty());
    }

    #[test]
    fn patch_clears_and_sets_due() {
        let task = sample();
        let mut data = TaskEditData::from_task(&task);
        data.due = None;
        assert_eq!(TaskPatch::from_task(&task, data.clone()).metadata.due, Some(DuePatch::Clear));

        data.due = Some(datetime!(2025-03-01 09:00));
        assert_eq!(
            TaskPatch::from_task(&task, data).metadata.due,
            Some(DuePatch::Set(datetime!(2025-03-01 09:00)))
        );
    }

    #[test]
    fn patch_emits_tag_diff() {
        let task = sample();
        let mut data = TaskEditData::from_task(&task);
        data.tags = vec!["Home".into(), "money".into()];

        let patch = TaskPatch::from_task(&task, data);
        assert_eq!(patch.metadata.tags, Some(vec!["home".to_owned(), "money".to_owned()]));
        assert_eq!(patch.tags.added, vec!["money"]);
        assert_eq!(patch.tags.removed, vec!["bills"]);
    }

    #[test]
    fn diff_tags_detects_added_and_removed_items() {
        let current = ["a".to_string(), "b".to_string()];
        let desired = ["b".to_string(), "c".to_string()];

        let diff = diff_tags(&current, &desired);
        assert_eq!(diff.added, vec!["c"]);
        assert_eq!(diff.removed, vec!["a"]);
    }
}
