use std::borrow::Cow;
use std::io::{self, Write};

use serde::Serialize;
use tasklist_app::filter_util::format_due;
use tasklist_core::{Priority, Recurrence, Task, TaskStatus, Timestamp};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use unicode_segmentation::UnicodeSegmentation;

const EXPORT_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

const WIDTH_ID: usize = 3;
const WIDTH_STATUS: usize = 14;
const WIDTH_PRIORITY: usize = 8;
const WIDTH_DUE: usize = 16;

pub fn truncate_with_ellipsis(input: &str, max_graphemes: usize) -> Cow<'_, str> {
    const ELLIPSIS: &str = "...";
    const ELLIPSIS_GRAPHEMES: usize = 3;

    if max_graphemes == 0 {
        return Cow::Owned(String::new());
    }

    let grapheme_count = input.graphemes(true).count();
    if grapheme_count <= max_graphemes {
        return Cow::Borrowed(input);
    }

    if max_graphemes <= ELLIPSIS_GRAPHEMES {
        return Cow::Owned(input.graphemes(true).take(max_graphemes).collect());
    }

    let keep = max_graphemes - ELLIPSIS_GRAPHEMES;
    let mut truncated: String = input.graphemes(true).take(keep).collect();
    truncated.push_str(ELLIPSIS);
    Cow::Owned(truncated)
}

fn pad(input: &str, width: usize) -> String {
    let used = input.graphemes(true).count();
    let mut padded = input.to_owned();
    padded.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    padded
}

const fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Complete => "[x] Complete",
        TaskStatus::Incomplete => "[ ] Incomplete",
    }
}

fn due_label(due: Option<Timestamp>) -> String {
    due.map_or_else(|| "-".to_owned(), format_due)
}

fn tags_label(tags: &[String]) -> String {
    if tags.is_empty() {
        "-".to_owned()
    } else {
        tags.join(", ")
    }
}

/// Render `tasks` as a table, or `empty_message` when there is nothing to show.
pub fn render_task_table<W: Write>(
    out: &mut W,
    tasks: &[Task],
    content_width: usize,
    empty_message: &str,
) -> io::Result<()> {
    if tasks.is_empty() {
        return writeln!(out, "{empty_message}");
    }

    let widest = tasks
        .iter()
        .map(|task| task.content().graphemes(true).count())
        .max()
        .unwrap_or(0);
    let width = widest.clamp("Task".len(), content_width.max("Task".len()));

    writeln!(
        out,
        "{:>WIDTH_ID$} | {:<WIDTH_STATUS$} | {:<WIDTH_PRIORITY$} | {:<WIDTH_DUE$} | {} | Tags",
        "ID",
        "Status",
        "Priority",
        "Due",
        pad("Task", width)
    )?;
    writeln!(
        out,
        "{}",
        "-".repeat(WIDTH_ID + WIDTH_STATUS + WIDTH_PRIORITY + WIDTH_DUE + width + 4 * 3 + "Tags".len())
    )?;

    for task in tasks {
        let content = truncate_with_ellipsis(task.content(), width);
        writeln!(
            out,
            "{:>WIDTH_ID$} | {:<WIDTH_STATUS$} | {:<WIDTH_PRIORITY$} | {:<WIDTH_DUE$} | {} | {}",
            task.id(),
            status_label(task.status()),
            task.priority(),
            due_label(task.due()),
            pad(&content, width),
            tags_label(task.tags()),
        )?;
    }
    Ok(())
}

/// Reminder block listing overdue tasks; prints nothing when the list is empty.
pub fn render_overdue_banner<W: Write>(out: &mut W, overdue: &[Task], content_width: usize) -> io::Result<()> {
    if overdue.is_empty() {
        return Ok(());
    }
    let noun = if overdue.len() == 1 { "task" } else { "tasks" };
    writeln!(out)?;
    writeln!(out, "!!! {} overdue {noun}:", overdue.len())?;
    for task in overdue {
        writeln!(
            out,
            "  #{} {} (due {})",
            task.id(),
            truncate_with_ellipsis(task.content(), content_width),
            due_label(task.due())
        )?;
    }
    Ok(())
}

/// Serialized shape of a task in the JSON export.
#[derive(Debug, Serialize)]
pub struct ExportRecord<'a> {
    id: u64,
    content: &'a str,
    status: TaskStatus,
    due: Option<String>,
    priority: Priority,
    tags: &'a [String],
    recurrence: Recurrence,
    created_at: String,
    updated_at: String,
}

impl<'a> From<&'a Task> for ExportRecord<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            id: task.id().get(),
            content: task.content(),
            status: task.status(),
            due: task.due().map(export_timestamp),
            priority: task.priority(),
            tags: task.tags(),
            recurrence: task.recurrence(),
            created_at: export_timestamp(task.created_at()),
            updated_at: export_timestamp(task.updated_at()),
        }
    }
}

fn export_timestamp(ts: Timestamp) -> String {
    ts.format(EXPORT_FORMAT).unwrap_or_else(|_| ts.to_string())
}

/// Pretty-printed JSON array of every task.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn export_json(tasks: &[Task]) -> serde_json::Result<String> {
    let records: Vec<ExportRecord<'_>> = tasks.iter().map(ExportRecord::from).collect();
    serde_json::to_string_pretty(&records)
}
