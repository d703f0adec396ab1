//! Search, filter and sort over task snapshots.
//!
//! Every function borrows its input and returns a fresh `Vec`, so callers can
//! chain them freely without touching the store.

use std::cmp::Ordering;
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseTokenError;
use crate::state::{Priority, TaskStatus};
use crate::task::{Task, Timestamp};
use crate::text_matcher::TextMatcher;

/// Conjunctive filter over task fields. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Required status.
    pub status: Option<TaskStatus>,
    /// Required priority.
    pub priority: Option<Priority>,
    /// Tag that must be present (case-insensitive exact match).
    pub tag: Option<String>,
    /// Exact due timestamp.
    pub due: Option<Timestamp>,
}

impl TaskFilter {
    /// Returns true when no criterion is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none() && self.tag.is_none() && self.due.is_none()
    }

    /// Evaluate every configured criterion against a task.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status
            && task.status() != status
        {
            return false;
        }
        if let Some(priority) = self.priority
            && task.priority() != priority
        {
            return false;
        }
        if let Some(tag) = &self.tag {
            let wanted = tag.to_lowercase();
            if !task.tags().iter().any(|candidate| candidate.to_lowercase() == wanted) {
                return false;
            }
        }
        if let Some(due) = self.due
            && task.due() != Some(due)
        {
            return false;
        }
        true
    }
}

/// Builder for [`TaskFilter`] values.
#[derive(Debug, Clone, Default)]
pub struct TaskFilterBuilder {
    filter: TaskFilter,
}

impl TaskFilterBuilder {
    /// Start from an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a status.
    #[must_use]
    pub const fn status(mut self, status: TaskStatus) -> Self {
        self.filter.status = Some(status);
        self
    }

    /// Require a priority.
    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.filter.priority = Some(priority);
        self
    }

    /// Require a tag. Blank tags are ignored.
    #[must_use]
    pub fn tag(mut self, tag: impl AsRef<str>) -> Self {
        let trimmed = tag.as_ref().trim();
        self.filter.tag = (!trimmed.is_empty()).then(|| trimmed.to_lowercase());
        self
    }

    /// Require an exact due timestamp.
    #[must_use]
    pub const fn due(mut self, due: Timestamp) -> Self {
        self.filter.due = Some(due);
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> TaskFilter {
        self.filter
    }
}

/// Ordering applied by [`sort_tasks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Earliest due first; unscheduled tasks last.
    DueDate,
    /// High, then medium, then low.
    Priority,
    /// Case-insensitive content order.
    Title,
    /// Oldest first.
    CreationTime,
}

impl SortKey {
    /// All keys in menu order.
    pub const ALL: [Self; 4] = [Self::DueDate, Self::Priority, Self::Title, Self::CreationTime];

    /// Canonical token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DueDate => "due_date",
            Self::Priority => "priority",
            Self::Title => "title",
            Self::CreationTime => "creation_time",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "due_date" | "due" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            "title" | "content" => Ok(Self::Title),
            "creation_time" | "created" | "created_at" => Ok(Self::CreationTime),
            _ => Err(ParseTokenError {
                kind: "sort key",
                token: s.to_owned(),
                expected: "due_date, priority, title, creation_time",
            }),
        }
    }
}

/// Tasks whose content or tags contain `keyword`, case-insensitively.
///
/// An empty keyword matches every task; front-ends reject blank searches before
/// calling this (see [`TextMatcher::parse`]).
#[must_use]
pub fn search_tasks(tasks: &[Task], keyword: &str) -> Vec<Task> {
    let matcher = TextMatcher::new(keyword);
    tasks.iter().filter(|task| matcher.matches(task)).cloned().collect()
}

/// Tasks satisfying every criterion of `filter`, in input order.
#[must_use]
pub fn filter_tasks(tasks: &[Task], filter: &TaskFilter) -> Vec<Task> {
    if filter.is_empty() {
        return tasks.to_vec();
    }
    tasks.iter().filter(|task| filter.matches(task)).cloned().collect()
}

/// Stable sort by `key`, breaking ties on creation time.
#[must_use]
pub fn sort_tasks(tasks: &[Task], key: SortKey) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    match key {
        SortKey::DueDate => sorted.sort_by(compare_due),
        SortKey::Priority => sorted.sort_by(|a, b| {
            a.priority()
                .rank()
                .cmp(&b.priority().rank())
                .then_with(|| a.created_at().cmp(&b.created_at()))
        }),
        SortKey::Title => {
            sorted.sort_by_cached_key(|task| (task.content().to_lowercase(), task.created_at()));
        }
        SortKey::CreationTime => sorted.sort_by_key(Task::created_at),
    }
    sorted
}

/// Sort by a textual key. Unrecognized keys return the input order unchanged.
#[must_use]
pub fn sort_tasks_by_token(tasks: &[Task], key: &str) -> Vec<Task> {
    key.parse::<SortKey>()
        .map_or_else(|_| tasks.to_vec(), |key| sort_tasks(tasks, key))
}

/// Incomplete tasks due strictly before `now`.
#[must_use]
pub fn overdue_tasks(tasks: &[Task], now: Timestamp) -> Vec<Task> {
    tasks.iter().filter(|task| task.is_overdue(now)).cloned().collect()
}

fn compare_due(a: &Task, b: &Task) -> Ordering {
    let by_due = match (a.due(), b.due()) {
        (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_due.then_with(|| a.created_at().cmp(&b.created_at()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::TaskId;
    use crate::state::Recurrence;
    use time::macros::datetime;

    fn task(id: u64, content: &str, created: Timestamp) -> Task {
        let id = TaskId::new(id).unwrap_or_else(|err| panic!("valid id: {err}"));
        Task::new(id, content, created).unwrap_or_else(|err| panic!("valid task: {err}"))
    }

    fn ids(tasks: &[Task]) -> Vec<u64> {
        tasks.iter().map(|task| task.id().get()).collect()
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, "write report", datetime!(2025-01-01 09:00))
                .with_priority(Priority::Low)
                .with_tags(["work"]),
            task(2, "Buy milk", datetime!(2025-01-01 10:00))
                .with_priority(Priority::High)
                .with_due(Some(datetime!(2025-06-01 00:00)))
                .with_tags(["home", "errands"]),
            task(3, "call mom", datetime!(2025-01-01 11:00))
                .with_due(Some(datetime!(2025-01-01 00:00)))
                .with_recurrence(Recurrence::Weekly),
            task(4, "alpha review", datetime!(2025-01-01 12:00))
                .with_priority(Priority::High)
                .with_tags(["Work"]),
        ]
    }

    #[test]
    fn search_matches_content_or_tag() {
        let tasks = sample();
        assert_eq!(ids(&search_tasks(&tasks, "MILK")), vec![2]);
        assert_eq!(ids(&search_tasks(&tasks, "work")), vec![1, 4]);
        assert_eq!(ids(&search_tasks(&tasks, "rand")), vec![2]);
        assert!(search_tasks(&tasks, "nothing here").is_empty());
    }

    #[test]
    fn search_with_empty_keyword_returns_everything() {
        let tasks = sample();
        assert_eq!(ids(&search_tasks(&tasks, "")), vec![1, 2, 3, 4]);
    }

    #[test]
    fn filter_combines_criteria_with_and() {
        let tasks = sample();
        let high = TaskFilterBuilder::new().priority(Priority::High).build();
        assert_eq!(ids(&filter_tasks(&tasks, &high)), vec![2, 4]);

        let high_work = TaskFilterBuilder::new()
            .priority(Priority::High)
            .tag("WORK")
            .build();
        assert_eq!(ids(&filter_tasks(&tasks, &high_work)), vec![4]);
    }

    #[test]
    fn tag_filter_is_exact_not_substring() {
        let tasks = sample();
        let filter = TaskFilterBuilder::new().tag("err").build();
        assert!(filter_tasks(&tasks, &filter).is_empty());
    }

    #[test]
    fn due_filter_uses_exact_timestamp() {
        let tasks = sample();
        let exact = TaskFilterBuilder::new().due(datetime!(2025-06-01 00:00)).build();
        assert_eq!(ids(&filter_tasks(&tasks, &exact)), vec![2]);

        let same_day_other_time = TaskFilterBuilder::new().due(datetime!(2025-06-01 09:00)).build();
        assert!(filter_tasks(&tasks, &same_day_other_time).is_empty());
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let tasks = sample();
        let filter = TaskFilterBuilder::new().tag("   ").build();
        assert!(filter.is_empty());
        assert_eq!(filter_tasks(&tasks, &filter), tasks);
    }

    #[test]
    fn sort_by_due_puts_unscheduled_last() {
        let tasks = sample();
        assert_eq!(ids(&sort_tasks(&tasks, SortKey::DueDate)), vec![3, 2, 1, 4]);
    }

    #[test]
    fn sort_by_priority_breaks_ties_on_creation() {
        let tasks = sample();
        assert_eq!(ids(&sort_tasks(&tasks, SortKey::Priority)), vec![2, 4, 3, 1]);
    }

    #[test]
    fn sort_by_title_ignores_case() {
        let tasks = sample();
        assert_eq!(ids(&sort_tasks(&tasks, SortKey::Title)), vec![4, 2, 3, 1]);
    }

    #[test]
    fn sort_by_creation_is_stable_for_equal_timestamps() {
        let same = datetime!(2025-01-01 09:00);
        let tasks = vec![
            task(5, "e", datetime!(2025-01-02 00:00)),
            task(6, "f", same),
            task(7, "g", same),
        ];
        assert_eq!(ids(&sort_tasks(&tasks, SortKey::CreationTime)), vec![6, 7, 5]);
    }

    #[test]
    fn unknown_sort_token_is_passthrough() {
        let tasks = sample();
        assert_eq!(ids(&sort_tasks_by_token(&tasks, "colour")), vec![1, 2, 3, 4]);
        assert_eq!(ids(&sort_tasks_by_token(&tasks, "due-date")), vec![3, 2, 1, 4]);
    }

    #[test]
    fn sorting_does_not_touch_input() {
        let tasks = sample();
        let before = tasks.clone();
        let _sorted = sort_tasks(&tasks, SortKey::Title);
        assert_eq!(tasks, before);
    }

    #[test]
    fn overdue_selects_incomplete_past_due() {
        let tasks = sample();
        assert_eq!(ids(&overdue_tasks(&tasks, datetime!(2025-03-01 00:00))), vec![3]);
        assert_eq!(ids(&overdue_tasks(&tasks, datetime!(2025-06-01 00:01))), vec![2, 3]);
    }

    #[test]
    fn sort_key_tokens_round_trip_through_display() {
        for key in SortKey::ALL {
            assert_eq!(key.to_string().parse::<SortKey>(), Ok(key));
        }
    }
}
