use std::fmt::{self, Display};

use tasklist_core::{
    ParseTokenError, Priority, Recurrence, SortKey, TaskFilter, TaskFilterBuilder as CoreTaskFilterBuilder,
    TaskStatus, Timestamp, normalize_tags,
};
use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime};

/// Accepted due timestamp layout, also used when rendering.
pub const DUE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day] [hour]:[minute]");

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Error type returned while turning user-facing strings into task values.
#[derive(Debug, Error)]
pub enum FilterBuildError {
    /// A status, priority, recurrence or sort token was not recognized.
    #[error(transparent)]
    InvalidToken(#[from] ParseTokenError),
    /// The due timestamp did not match either accepted layout.
    #[error("invalid due timestamp {input:?}: expected YYYY-MM-DD HH:MM or YYYY-MM-DD")]
    InvalidDue {
        /// Trimmed user input.
        input: String,
    },
}

/// Result alias for parsing helpers.
pub type FilterBuildResult<T> = Result<T, FilterBuildError>;

impl FilterBuildError {
    /// Convert the error into a message that is friendly for end-users.
    #[must_use]
    pub fn describe_user_facing(&self) -> String {
        match self {
            Self::InvalidToken(err) => format!("Invalid {}. Choose one of: {}.", err.kind, err.expected),
            Self::InvalidDue { .. } => "Invalid date. Please use YYYY-MM-DD HH:MM or YYYY-MM-DD.".to_owned(),
        }
    }
}

/// Parse a due timestamp. Blank input and `none` mean "no due date".
///
/// A date without a time is read as midnight, which is what the exact-match due
/// filter needs for day-level lookups.
///
/// # Errors
/// Returns [`FilterBuildError::InvalidDue`] for any other layout.
pub fn parse_due(input: &str) -> FilterBuildResult<Option<Timestamp>> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(trimmed, DUE_FORMAT) {
        return Ok(Some(parsed));
    }
    Date::parse(trimmed, DATE_FORMAT)
        .map(|date| Some(date.midnight()))
        .map_err(|_| FilterBuildError::InvalidDue {
            input: trimmed.to_owned(),
        })
}

/// Render a due timestamp in [`DUE_FORMAT`].
#[must_use]
pub fn format_due(due: Timestamp) -> String {
    due.format(DUE_FORMAT).unwrap_or_else(|_| due.to_string())
}

/// Split comma-separated tags and normalize them.
#[must_use]
pub fn parse_tags(input: &str) -> Vec<String> {
    normalize_tags(input.split(','))
}

/// Parse a priority token; blank input yields `default`.
///
/// # Errors
/// Returns [`FilterBuildError::InvalidToken`] for unknown tokens.
pub fn parse_priority(input: &str, default: Priority) -> FilterBuildResult<Priority> {
    parse_or_default(input, default)
}

/// Parse a recurrence token; blank input yields `default`.
///
/// # Errors
/// Returns [`FilterBuildError::InvalidToken`] for unknown tokens.
pub fn parse_recurrence(input: &str, default: Recurrence) -> FilterBuildResult<Recurrence> {
    parse_or_default(input, default)
}

/// Parse a sort key token; blank input yields `default`.
///
/// # Errors
/// Returns [`FilterBuildError::InvalidToken`] for unknown tokens.
pub fn parse_sort_key(input: &str, default: SortKey) -> FilterBuildResult<SortKey> {
    parse_or_default(input, default)
}

/// Parse an optional token; blank input yields `None`.
///
/// # Errors
/// Returns [`FilterBuildError::InvalidToken`] for unknown tokens.
pub fn parse_optional<T>(input: &str) -> FilterBuildResult<Option<T>>
where
    T: std::str::FromStr<Err = ParseTokenError>,
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(trimmed.parse()?))
}

fn parse_or_default<T>(input: &str, default: T) -> FilterBuildResult<T>
where
    T: std::str::FromStr<Err = ParseTokenError>,
{
    Ok(parse_optional(input)?.unwrap_or(default))
}

/// Builder that accepts user-facing strings and normalizes them into [`TaskFilter`] values.
#[derive(Debug, Clone, Default)]
pub struct TaskFilterBuilder {
    status: Option<TaskStatus>,
    priority: Option<Priority>,
    tag: Option<String>,
    due: Option<Timestamp>,
}

impl TaskFilterBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the status criterion (blank input leaves it unset).
    ///
    /// # Errors
    /// Returns an error if the token is not a status.
    pub fn with_status(mut self, input: &str) -> FilterBuildResult<Self> {
        self.status = parse_optional(input)?;
        Ok(self)
    }

    /// Configure the priority criterion (blank input leaves it unset).
    ///
    /// # Errors
    /// Returns an error if the token is not a priority.
    pub fn with_priority(mut self, input: &str) -> FilterBuildResult<Self> {
        self.priority = parse_optional(input)?;
        Ok(self)
    }

    /// Configure the tag criterion (whitespace-only inputs become `None`).
    #[must_use]
    pub fn with_tag(mut self, input: &str) -> Self {
        let trimmed = input.trim();
        self.tag = (!trimmed.is_empty()).then(|| trimmed.to_lowercase());
        self
    }

    /// Configure the exact due criterion (blank input leaves it unset).
    ///
    /// # Errors
    /// Returns an error if the timestamp cannot be parsed.
    pub fn with_due(mut self, input: &str) -> FilterBuildResult<Self> {
        self.due = parse_due(input)?;
        Ok(self)
    }

    /// Build the final [`TaskFilter`].
    #[must_use]
    pub fn build(self) -> TaskFilter {
        let mut builder = CoreTaskFilterBuilder::new();
        if let Some(status) = self.status {
            builder = builder.status(status);
        }
        if let Some(priority) = self.priority {
            builder = builder.priority(priority);
        }
        if let Some(tag) = self.tag {
            builder = builder.tag(tag);
        }
        if let Some(due) = self.due {
            builder = builder.due(due);
        }
        builder.build()
    }
}

impl Display for TaskFilterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskFilterBuilder")
            .field("status", &self.status)
            .field("priority", &self.priority)
            .field("tag", &self.tag)
            .field("due", &self.due)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn ok<T, E: Display>(result: Result<T, E>, context: &str) -> T {
        result.unwrap_or_else(|err| panic!("{context}: {err}"))
    }

    #[test]
    fn parse_due_accepts_datetime_and_date() {
        assert_eq!(
            ok(parse_due("2025-01-31 09:00"), "datetime"),
            Some(datetime!(2025-01-31 09:00))
        );
        assert_eq!(ok(parse_due(" 2025-02-01 "), "date"), Some(datetime!(2025-02-01 00:00)));
        assert_eq!(ok(parse_due(""), "blank"), None);
        assert_eq!(ok(parse_due("None"), "none"), None);
    }

    #[test]
    fn parse_due_rejects_other_layouts() {
        for bad in ["31/01/2025", "2025-02-30", "2025-01-31T09:00", "tomorrow"] {
            assert!(
                matches!(parse_due(bad), Err(FilterBuildError::InvalidDue { .. })),
                "{bad} must be rejected"
            );
        }
    }

    #[test]
    fn format_due_matches_input_layout() {
        assert_eq!(format_due(datetime!(2025-03-04 05:06)), "2025-03-04 05:06");
    }

    #[test]
    fn parse_tags_normalizes_csv() {
        assert_eq!(parse_tags("Work, home,,WORK , errands"), vec!["work", "home", "errands"]);
        assert!(parse_tags("   ").is_empty());
    }

    #[test]
    fn blank_tokens_fall_back_to_defaults() {
        assert_eq!(ok(parse_priority("", Priority::Low), "priority"), Priority::Low);
        assert_eq!(ok(parse_priority("HIGH", Priority::Low), "priority"), Priority::High);
        assert_eq!(
            ok(parse_recurrence(" ", Recurrence::Weekly), "recurrence"),
            Recurrence::Weekly
        );
        assert_eq!(ok(parse_sort_key("", SortKey::Title), "sort"), SortKey::Title);
        assert_eq!(ok(parse_sort_key("created", SortKey::Title), "sort"), SortKey::CreationTime);
    }

    #[test]
    fn invalid_tokens_describe_choices() {
        let Err(err) = parse_priority("urgent", Priority::Medium) else {
            panic!("urgent is not a priority");
        };
        assert_eq!(err.describe_user_facing(), "Invalid priority. Choose one of: high, medium, low.");
    }

    #[test]
    fn filter_builder_full_workflow() {
        let filter = ok(
            ok(
                ok(TaskFilterBuilder::new().with_status("complete"), "status").with_priority("high"),
                "priority",
            )
            .with_tag("  Work ")
            .with_due("2025-01-01"),
            "due",
        )
        .build();

        assert_eq!(filter.status, Some(TaskStatus::Complete));
        assert_eq!(filter.priority, Some(Priority::High));
        assert_eq!(filter.tag.as_deref(), Some("work"));
        assert_eq!(filter.due, Some(datetime!(2025-01-01 00:00)));
    }

    #[test]
    fn filter_builder_blank_inputs_build_empty_filter() {
        let filter = ok(
            ok(TaskFilterBuilder::new().with_status(""), "status").with_due(" "),
            "due",
        )
        .with_tag("")
        .build();
        assert!(filter.is_empty());
    }
}
