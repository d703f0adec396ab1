use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::ParseTokenError;

/// Completion status of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task still needs doing.
    #[default]
    Incomplete,
    /// Task is done.
    Complete,
}

impl TaskStatus {
    /// Token used in prompts and exports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Complete => "complete",
        }
    }
}

/// Task priority. Sorting places `High` first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Most urgent.
    High,
    /// Default priority.
    #[default]
    Medium,
    /// Least urgent.
    Low,
}

impl Priority {
    /// Token used in prompts and exports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Sort rank (lower sorts first).
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

/// How a task repeats once completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    /// One-off task.
    #[default]
    None,
    /// Repeats every day.
    Daily,
    /// Repeats every seven days.
    Weekly,
    /// Repeats on the same day of the following month.
    Monthly,
}

impl Recurrence {
    /// Token used in prompts and exports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Returns true for every variant other than [`Recurrence::None`].
    #[must_use]
    pub const fn repeats(self) -> bool {
        !matches!(self, Self::None)
    }
}

macro_rules! token_enum {
    ($ty:ty, $kind:literal, $expected:literal, [$($variant:path),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseTokenError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_lowercase();
                [$($variant),+]
                    .into_iter()
                    .find(|candidate| candidate.as_str() == normalized)
                    .ok_or_else(|| ParseTokenError {
                        kind: $kind,
                        token: s.to_owned(),
                        expected: $expected,
                    })
            }
        }
    };
}

token_enum!(
    TaskStatus,
    "status",
    "incomplete, complete",
    [TaskStatus::Incomplete, TaskStatus::Complete]
);
token_enum!(
    Priority,
    "priority",
    "high, medium, low",
    [Priority::High, Priority::Medium, Priority::Low]
);
token_enum!(
    Recurrence,
    "recurrence",
    "none, daily, weekly, monthly",
    [
        Recurrence::None,
        Recurrence::Daily,
        Recurrence::Weekly,
        Recurrence::Monthly
    ]
);
