//! `tasklist init-config`.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tasklist_app::config::{default_config_path, generate_default_config_toml};

use crate::inputs::{PromptError, Prompter};

/// Write the default configuration to `output` or the default location.
pub fn init_config<R: BufRead, W: Write>(
    output: Option<&Path>,
    force: bool,
    io: &mut Prompter<R, W>,
) -> Result<()> {
    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => default_config_path().ok_or_else(|| anyhow!("could not determine the config directory"))?,
    };

    write_default_config(&output_path, force, io)
}

fn write_default_config<R: BufRead, W: Write>(path: &Path, force: bool, io: &mut Prompter<R, W>) -> Result<()> {
    if path.exists() && !force && !confirm_overwrite(path, io)? {
        io.say("Aborted.")?;
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let content = generate_default_config_toml()?;
    std::fs::write(path, content).with_context(|| format!("failed to write config file {}", path.display()))?;

    io.say(format!("Created config file: {}", path.display()))?;
    io.say("Edit it to change default priority, recurrence, sort order and display options.")?;
    Ok(())
}

fn confirm_overwrite<R: BufRead, W: Write>(path: &Path, io: &mut Prompter<R, W>) -> Result<bool> {
    match io.confirm(&format!("{} already exists. Overwrite? (y/n): ", path.display())) {
        Ok(answer) => Ok(answer),
        Err(PromptError::Closed) => Ok(false),
        Err(err) => Err(err.into()),
    }
}
