use crate::task::Task;

/// Case-insensitive substring matcher for task content and tags.
#[derive(Debug, Clone)]
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Build a matcher from a keyword as given. An empty keyword matches every task.
    #[must_use]
    pub fn new(keyword: &str) -> Self {
        Self {
            needle: keyword.to_lowercase(),
        }
    }

    /// Normalize a user query into a matcher. Returns `None` for blank inputs.
    #[must_use]
    pub fn parse(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self::new(trimmed))
    }

    /// Lower-cased keyword.
    #[must_use]
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Determine whether the content or any tag contains the keyword.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_field(task.content()) || task.tags().iter().any(|tag| self.matches_field(tag))
    }

    fn matches_field(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::TaskId;
    use time::macros::datetime;

    fn task(content: &str, tags: &[&str]) -> Task {
        let id = TaskId::new(1).unwrap_or_else(|err| panic!("valid id: {err}"));
        Task::new(id, content, datetime!(2025-01-01 00:00))
            .unwrap_or_else(|err| panic!("valid task: {err}"))
            .with_tags(tags.iter().copied())
    }

    #[test]
    fn parse_skips_blank_queries() {
        assert!(TextMatcher::parse("").is_none());
        assert!(TextMatcher::parse("   ").is_none());
        assert!(TextMatcher::parse("\n").is_none());
    }

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let matcher = TextMatcher::parse("  Milk ").unwrap_or_else(|| panic!("matcher must exist"));
        assert_eq!(matcher.needle(), "milk");
    }

    #[test]
    fn matcher_finds_text_in_content_and_tags() {
        let snapshot = task("Call the Plumber", &["home", "urgent-fix"]);

        assert!(TextMatcher::new("plumb").matches(&snapshot));
        assert!(TextMatcher::new("CALL").matches(&snapshot));
        assert!(TextMatcher::new("fix").matches(&snapshot));
        assert!(!TextMatcher::new("office").matches(&snapshot));
    }

    #[test]
    fn empty_keyword_matches_everything() {
        assert!(TextMatcher::new("").matches(&task("anything", &[])));
    }
}
