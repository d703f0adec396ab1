use std::{
    fs,
    ops::RangeInclusive,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tasklist_core::{Priority, Recurrence, SortKey};

const CONFIG_DIR: &str = "tasklist";
const CONFIG_FILE: &str = "config.toml";

/// Accepted range for [`DisplayConfig::content_width`].
pub const CONTENT_WIDTH_RANGE: RangeInclusive<usize> = 10..=200;

/// Top-level configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Values used when the user leaves a prompt blank.
    pub defaults: DefaultsConfig,
    /// Task list rendering.
    pub display: DisplayConfig,
}

impl ProjectConfig {
    /// Load configuration from an explicit path, or from the default location.
    ///
    /// An explicit path must exist. A missing file at the default location yields defaults.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, parsed or validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!("config file {} does not exist", path.display());
                }
                Self::from_path(path)
            }
            None => default_config_path().map_or_else(|| Ok(Self::default()), |path| Self::from_path(&path)),
        }
    }

    /// Load configuration from `path`, falling back to defaults when it is missing.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, parsed or validated.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let config = Self::from_toml(&contents).with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    ///
    /// # Errors
    /// Returns an error for malformed TOML, unknown tokens or out-of-range values.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.display.ensure_width_in_range()
    }
}

/// Default values applied to new tasks and menus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Priority used when the prompt is left blank.
    pub priority: Priority,
    /// Recurrence used when the prompt is left blank.
    pub recurrence: Recurrence,
    /// Sort key suggested by the sort prompt.
    pub sort: SortKey,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            priority: Priority::Medium,
            recurrence: Recurrence::None,
            sort: SortKey::DueDate,
        }
    }
}

/// Rendering options for the task table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Maximum graphemes of content shown per row.
    pub content_width: usize,
    /// Show the overdue reminder banner above the menu.
    pub overdue_banner: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            content_width: 50,
            overdue_banner: true,
        }
    }
}

impl DisplayConfig {
    fn ensure_width_in_range(&self) -> Result<()> {
        if !CONTENT_WIDTH_RANGE.contains(&self.content_width) {
            bail!(
                "display.content_width must be between {} and {} (got {})",
                CONTENT_WIDTH_RANGE.start(),
                CONTENT_WIDTH_RANGE.end(),
                self.content_width
            );
        }
        Ok(())
    }
}

/// Returns the default configuration file path.
///
/// On Linux: `~/.config/tasklist/config.toml`
/// On macOS: `~/Library/Application Support/tasklist/config.toml`
/// On Windows: `%APPDATA%\tasklist\config.toml`
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Render the default configuration as commented TOML.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn generate_default_config_toml() -> Result<String> {
    let body = toml::to_string_pretty(&ProjectConfig::default())
        .context("failed to serialize default configuration")?;

    let header = r"# tasklist configuration
#
# [defaults]
# priority   = high | medium | low
# recurrence = none | daily | weekly | monthly
# sort       = due_date | priority | title | creation_time
#
# [display]
# content_width  = 10..=200 graphemes of task text per row
# overdue_banner = show a reminder for overdue tasks above the menu

";

    Ok(format!("{header}{body}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn missing_config_returns_defaults() -> Result<()> {
        let dir = tempdir()?;
        let cfg = ProjectConfig::from_path(&dir.path().join(CONFIG_FILE))?;
        assert_eq!(cfg, ProjectConfig::default());
        assert_eq!(cfg.defaults.priority, Priority::Medium);
        assert_eq!(cfg.defaults.sort, SortKey::DueDate);
        assert_eq!(cfg.display.content_width, 50);
        assert!(cfg.display.overdue_banner);
        Ok(())
    }

    #[test]
    fn explicit_missing_path_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let Err(err) = ProjectConfig::load(Some(&dir.path().join("nope.toml"))) else {
            panic!("missing explicit config should error");
        };
        assert!(err.to_string().contains("does not exist"));
        Ok(())
    }

    #[test]
    fn partial_config_keeps_other_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        let mut file = fs::File::create(&path)?;
        writeln!(file, "[defaults]\npriority = \"high\"\n\n[display]\noverdue_banner = false")?;

        let cfg = ProjectConfig::load(Some(&path))?;
        assert_eq!(cfg.defaults.priority, Priority::High);
        assert_eq!(cfg.defaults.recurrence, Recurrence::None);
        assert_eq!(cfg.display.content_width, 50);
        assert!(!cfg.display.overdue_banner);
        Ok(())
    }

    #[test]
    fn unknown_priority_token_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[defaults]\npriority = \"urgent\"\n")?;

        let Err(err) = ProjectConfig::from_path(&path) else {
            panic!("unknown priority should error");
        };
        assert!(err.to_string().contains("failed to parse"));
        Ok(())
    }

    #[test]
    fn content_width_out_of_range_is_rejected() {
        let Err(err) = ProjectConfig::from_toml("[display]\ncontent_width = 3\n") else {
            panic!("narrow width should error");
        };
        assert!(err.to_string().contains("display.content_width must be between 10 and 200"));
    }

    #[test]
    fn generated_default_config_parses_back() -> Result<()> {
        let rendered = generate_default_config_toml()?;
        assert!(rendered.starts_with("# tasklist configuration"));
        assert!(rendered.contains("sort = \"due_date\""));
        assert_eq!(ProjectConfig::from_toml(&rendered)?, ProjectConfig::default());
        Ok(())
    }

    #[test]
    fn default_path_ends_with_tasklist_config() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("tasklist/config.toml"));
        }
    }
}
