use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

use crate::error::{ParseTaskIdError, ValidationError};

/// Identifier of a task. Always positive; assigned by the store in increasing order.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct TaskId(u64);

impl TaskId {
    /// First identifier handed out by an empty store.
    pub const FIRST: Self = Self(1);

    /// Wrap a raw identifier.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidId`] when `raw` is zero.
    pub const fn new(raw: u64) -> Result<Self, ValidationError> {
        if raw == 0 {
            return Err(ValidationError::InvalidId);
        }
        Ok(Self(raw))
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Identifier following this one, or `None` on counter overflow.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = ParseTaskIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let raw = trimmed
            .parse::<u64>()
            .map_err(|source| ParseTaskIdError::NotANumber {
                input: trimmed.to_owned(),
                source,
            })?;
        Self::new(raw).map_err(|_| ParseTaskIdError::Zero)
    }
}

impl Serialize for TaskId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(d)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert_eq!(TaskId::new(0), Err(ValidationError::InvalidId));
        assert_eq!("0".parse::<TaskId>(), Err(ParseTaskIdError::Zero));
    }

    #[test]
    fn parses_trimmed_decimal() {
        let id: TaskId = " 42 ".parse().unwrap_or_else(|err| panic!("must parse task id: {err}"));
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert!(matches!(
            "abc".parse::<TaskId>(),
            Err(ParseTaskIdError::NotANumber { input, .. }) if input == "abc"
        ));
        assert!("-3".parse::<TaskId>().is_err());
    }

    #[test]
    fn next_increments() {
        assert_eq!(TaskId::FIRST.next().map(TaskId::get), Some(2));
    }

    #[test]
    fn serde_uses_plain_integer() {
        let id = TaskId::new(7).unwrap_or_else(|err| panic!("valid id: {err}"));
        let json = serde_json::to_string(&id).unwrap_or_else(|err| panic!("serialize: {err}"));
        assert_eq!(json, "7");
        assert!(serde_json::from_str::<TaskId>("0").is_err());
    }
}
