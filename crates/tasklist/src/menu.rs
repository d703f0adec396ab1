//! Interactive numbered menu.
//!
//! Every handler reports user and engine errors on the output and returns to
//! the menu; only closed input or a broken terminal ends the session.

use std::io::{BufRead, Write};

use anyhow::Result;
use tasklist_app::filter_util::{TaskFilterBuilder, format_due, parse_due, parse_priority, parse_recurrence, parse_tags};
use tasklist_app::service::TaskService;
use tasklist_app::task_patch::{TaskEditData, TaskPatch};
use tasklist_core::{Clock, NewTask, SortKey, Task, TextMatcher};
use tracing::debug;

use crate::inputs::{PromptError, PromptResult, Prompter};
use crate::view::{export_json, render_overdue_banner, render_task_table};

const EMPTY_LIST: &str = "No tasks found. Add a task to get started!";

/// Menu entries in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Add,
    List,
    UpdateContent,
    EditMetadata,
    Delete,
    MarkComplete,
    MarkIncomplete,
    Search,
    Filter,
    Sort,
    Overdue,
    Export,
    Reset,
    Exit,
}

impl MenuAction {
    pub const ALL: [Self; 14] = [
        Self::Add,
        Self::List,
        Self::UpdateContent,
        Self::EditMetadata,
        Self::Delete,
        Self::MarkComplete,
        Self::MarkIncomplete,
        Self::Search,
        Self::Filter,
        Self::Sort,
        Self::Overdue,
        Self::Export,
        Self::Reset,
        Self::Exit,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Add => "Add task",
            Self::List => "List tasks",
            Self::UpdateContent => "Update task text",
            Self::EditMetadata => "Edit due date / priority / tags / recurrence",
            Self::Delete => "Delete task",
            Self::MarkComplete => "Mark task complete",
            Self::MarkIncomplete => "Mark task incomplete",
            Self::Search => "Search tasks",
            Self::Filter => "Filter tasks",
            Self::Sort => "Sort tasks",
            Self::Overdue => "Show overdue tasks",
            Self::Export => "Export tasks as JSON",
            Self::Reset => "Remove all tasks",
            Self::Exit => "Exit",
        }
    }

    /// Action for a 1-based menu number.
    pub fn from_choice(choice: usize) -> Option<Self> {
        choice.checked_sub(1).and_then(|idx| Self::ALL.get(idx)).copied()
    }
}

pub struct Menu<R, W, C> {
    service: TaskService<C>,
    io: Prompter<R, W>,
}

impl<R: BufRead, W: Write, C: Clock> Menu<R, W, C> {
    pub const fn new(service: TaskService<C>, io: Prompter<R, W>) -> Self {
        Self { service, io }
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (TaskService<C>, Prompter<R, W>) {
        (self.service, self.io)
    }

    /// Run until the user exits or input closes.
    ///
    /// # Errors
    /// Returns an error only when the terminal cannot be read or written.
    pub fn run(&mut self) -> Result<()> {
        self.welcome()?;
        loop {
            match self.step() {
                Ok(true) => {}
                Ok(false) | Err(PromptError::Closed) => break,
                Err(err) => return Err(err.into()),
            }
        }
        self.goodbye()?;
        Ok(())
    }

    fn step(&mut self) -> PromptResult<bool> {
        if self.service.config().display.overdue_banner {
            let overdue = self.service.overdue();
            let width = self.content_width();
            render_overdue_banner(self.io.out(), &overdue, width)?;
        }
        self.show_menu()?;

        let prompt = format!("Enter your choice (1-{}): ", MenuAction::ALL.len());
        let choice = self.io.choice(&prompt, 1..=MenuAction::ALL.len())?;
        let Some(action) = MenuAction::from_choice(choice) else {
            return Ok(true);
        };
        debug!(?action, "menu action");

        match action {
            MenuAction::Add => self.add()?,
            MenuAction::List => self.list()?,
            MenuAction::UpdateContent => self.update_content()?,
            MenuAction::EditMetadata => self.edit_metadata()?,
            MenuAction::Delete => self.delete()?,
            MenuAction::MarkComplete => self.mark_complete()?,
            MenuAction::MarkIncomplete => self.mark_incomplete()?,
            MenuAction::Search => self.search()?,
            MenuAction::Filter => self.filter()?,
            MenuAction::Sort => self.sort()?,
            MenuAction::Overdue => self.overdue()?,
            MenuAction::Export => self.export()?,
            MenuAction::Reset => self.reset()?,
            MenuAction::Exit => return Ok(false),
        }
        Ok(true)
    }

    fn content_width(&self) -> usize {
        self.service.config().display.content_width
    }

    fn welcome(&mut self) -> PromptResult<()> {
        self.io.say("=".repeat(50))?;
        self.io.say("       tasklist")?;
        self.io.say("=".repeat(50))?;
        self.io.say("An in-memory task manager. Tasks are lost on exit.")
    }

    fn goodbye(&mut self) -> PromptResult<()> {
        self.io.say("")?;
        self.io.say("Goodbye!")
    }

    fn show_menu(&mut self) -> PromptResult<()> {
        self.io.say("")?;
        self.io.say("=== Menu ===")?;
        for (idx, action) in MenuAction::ALL.iter().enumerate() {
            self.io.say(format!("{:>2}. {}", idx + 1, action.label()))?;
        }
        self.io.say("")
    }

    fn show_tasks(&mut self, tasks: &[Task], empty_message: &str) -> PromptResult<()> {
        let width = self.content_width();
        render_task_table(self.io.out(), tasks, width, empty_message)?;
        Ok(())
    }

    /// Prints an error and returns false when the store is empty.
    fn ensure_tasks(&mut self, verb: &str) -> PromptResult<bool> {
        if self.service.count() == 0 {
            self.io.error(format!("No tasks to {verb}."))?;
            return Ok(false);
        }
        Ok(true)
    }

    fn add(&mut self) -> PromptResult<()> {
        let defaults = self.service.config().defaults.clone();
        let content = self.io.content("Enter task description: ")?;
        let due = self.io.due("Enter due date/time (YYYY-MM-DD HH:MM) or leave blank: ")?;
        let recurrence = self.io.recurrence(
            &format!("Enter recurrence (none/daily/weekly/monthly) [{}]: ", defaults.recurrence),
            defaults.recurrence,
        )?;
        let priority = self
            .io
            .priority(&format!("Enter priority (high/medium/low) [{}]: ", defaults.priority), defaults.priority)?;
        let tags = parse_tags(&self.io.line("Enter tags (comma-separated): ")?);

        let mut request = NewTask::new(content).priority(priority).recurrence(recurrence).tags(tags);
        if let Some(due) = due {
            request = request.due(due);
        }
        match self.service.add(request) {
            Ok(task) => self.io.say(format!("Task added successfully! (ID: {})", task.id())),
            Err(err) => self.io.error(err.to_string()),
        }
    }

    fn list(&mut self) -> PromptResult<()> {
        let tasks = self.service.list();
        self.show_tasks(&tasks, EMPTY_LIST)
    }

    fn update_content(&mut self) -> PromptResult<()> {
        if !self.ensure_tasks("update")? {
            return Ok(());
        }
        let id = self.io.task_id("Enter ID to update: ")?;
        if let Err(err) = self.service.require(id) {
            return self.io.error(err.to_string());
        }
        let content = self.io.content("Enter new description: ")?;
        match self.service.update_content(id, &content) {
            Ok(task) => self.io.say(format!("Task {} updated successfully.", task.id())),
            Err(err) => self.io.error(err.to_string()),
        }
    }

    fn edit_metadata(&mut self) -> PromptResult<()> {
        if !self.ensure_tasks("edit")? {
            return Ok(());
        }
        let id = self.io.task_id("Enter ID to edit: ")?;
        let task = match self.service.require(id) {
            Ok(task) => task.clone(),
            Err(err) => return self.io.error(err.to_string()),
        };
        self.io.say("Leave a field blank to keep its current value.")?;

        let mut data = TaskEditData::from_task(&task);
        let current_due = task.due().map_or_else(|| "none".to_owned(), format_due);
        data.due = self.io.retry(
            &format!("Due date/time (YYYY-MM-DD HH:MM, 'none' to clear) [{current_due}]: "),
            |answer| {
                if answer.is_empty() {
                    return Ok(task.due());
                }
                parse_due(answer).map_err(|err| err.describe_user_facing())
            },
        )?;
        data.priority = self.io.retry(&format!("Priority (high/medium/low) [{}]: ", task.priority()), |answer| {
            parse_priority(answer, task.priority()).map_err(|err| err.describe_user_facing())
        })?;
        let current_tags = if task.tags().is_empty() {
            "none".to_owned()
        } else {
            task.tags().join(", ")
        };
        let tags = self.io.line(&format!("Tags (comma-separated, 'none' to clear) [{current_tags}]: "))?;
        if tags.eq_ignore_ascii_case("none") {
            data.tags.clear();
        } else if !tags.is_empty() {
            data.tags = parse_tags(&tags);
        }
        data.recurrence = self.io.retry(
            &format!("Recurrence (none/daily/weekly/monthly) [{}]: ", task.recurrence()),
            |answer| parse_recurrence(answer, task.recurrence()).map_err(|err| err.describe_user_facing()),
        )?;

        let patch = TaskPatch::from_task(&task, data);
        if patch.is_empty() {
            return self.io.say("No changes.");
        }
        let tag_diff = patch.tags.clone();
        match self.service.apply_patch(id, patch) {
            Ok(updated) => {
                self.io.say(format!("Task {} updated successfully.", updated.id()))?;
                if !tag_diff.added.is_empty() {
                    self.io.say(format!("  tags added: {}", tag_diff.added.join(", ")))?;
                }
                if !tag_diff.removed.is_empty() {
                    self.io.say(format!("  tags removed: {}", tag_diff.removed.join(", ")))?;
                }
                Ok(())
            }
            Err(err) => self.io.error(err.to_string()),
        }
    }

    fn delete(&mut self) -> PromptResult<()> {
        if !self.ensure_tasks("delete")? {
            return Ok(());
        }
        let id = self.io.task_id("Enter ID to delete: ")?;
        if let Err(err) = self.service.require(id) {
            return self.io.error(err.to_string());
        }
        if !self.io.confirm(&format!("Delete task {id}? (y/n): "))? {
            return self.io.say("Delete cancelled.");
        }
        match self.service.delete(id) {
            Ok(_) => self.io.say(format!("Task {id} deleted successfully.")),
            Err(err) => self.io.error(err.to_string()),
        }
    }

    fn mark_complete(&mut self) -> PromptResult<()> {
        let id = self.io.task_id("Enter ID to mark complete: ")?;
        match self.service.mark_complete(id) {
            Ok(completion) => {
                self.io.say(format!("Task {id} marked complete."))?;
                if let Some(next) = completion.next {
                    let due = next.due().map_or_else(|| "-".to_owned(), format_due);
                    self.io.say(format!("Next occurrence created as task {} (due {due}).", next.id()))?;
                }
                Ok(())
            }
            Err(err) => self.io.error(err.to_string()),
        }
    }

    fn mark_incomplete(&mut self) -> PromptResult<()> {
        let id = self.io.task_id("Enter ID to mark incomplete: ")?;
        match self.service.mark_incomplete(id) {
            Ok(_) => self.io.say(format!("Task {id} marked incomplete.")),
            Err(err) => self.io.error(err.to_string()),
        }
    }

    fn search(&mut self) -> PromptResult<()> {
        let keyword = self.io.line("Enter search keyword: ")?;
        if TextMatcher::parse(&keyword).is_none() {
            return self.io.error("Keyword cannot be empty.");
        }
        let results = self.service.search(&keyword);
        self.show_tasks(&results, &format!("No tasks matched '{keyword}'."))
    }

    fn filter(&mut self) -> PromptResult<()> {
        self.io.say("Leave a criterion blank to match any value.")?;
        let builder = TaskFilterBuilder::new();
        let builder = self.io.retry("Status (complete/incomplete): ", |answer| {
            builder.clone().with_status(answer).map_err(|err| err.describe_user_facing())
        })?;
        let builder = self.io.retry("Priority (high/medium/low): ", |answer| {
            builder.clone().with_priority(answer).map_err(|err| err.describe_user_facing())
        })?;
        let builder = builder.with_tag(&self.io.line("Tag: ")?);
        let builder = self.io.retry("Due date/time (YYYY-MM-DD HH:MM or YYYY-MM-DD): ", |answer| {
            builder.clone().with_due(answer).map_err(|err| err.describe_user_facing())
        })?;
        debug!(filter = %builder, "filter built");

        let results = self.service.filter(&builder.build());
        self.show_tasks(&results, "No tasks matched the filter.")
    }

    fn sort(&mut self) -> PromptResult<()> {
        let default = self.service.config().defaults.sort;
        for (idx, key) in SortKey::ALL.iter().enumerate() {
            self.io.say(format!("{}. Sort by {key}", idx + 1))?;
        }
        let key = self.io.sort_key(&format!("Choice [{default}]: "), default)?;
        let results = self.service.sort(key);
        self.show_tasks(&results, EMPTY_LIST)
    }

    fn overdue(&mut self) -> PromptResult<()> {
        let overdue = self.service.overdue();
        if overdue.is_empty() {
            return self.io.say("No overdue tasks. You're all caught up!");
        }
        self.show_tasks(&overdue, EMPTY_LIST)
    }

    fn export(&mut self) -> PromptResult<()> {
        match export_json(&self.service.list()) {
            Ok(json) => self.io.say(json),
            Err(err) => self.io.error(format!("failed to export tasks: {err}")),
        }
    }

    fn reset(&mut self) -> PromptResult<()> {
        let count = self.service.count();
        if count == 0 {
            return self.io.say("There are no tasks to remove.");
        }
        if self.io.confirm(&format!("Remove all {count} tasks? (y/n): "))? {
            self.service.reset();
            self.io.say("All tasks removed.")
        } else {
            self.io.say("Reset cancelled.")
        }
    }
}
