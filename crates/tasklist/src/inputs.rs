//! Line-oriented prompts with reprompt loops.

use std::io::{self, BufRead, Write};
use std::ops::RangeInclusive;

use tasklist_app::filter_util::{FilterBuildResult, parse_due, parse_priority, parse_recurrence, parse_sort_key};
use tasklist_core::{Priority, Recurrence, SortKey, TaskId, Timestamp, validate_content};
use thiserror::Error;

/// Failure that ends the interactive session.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Input reached end-of-file.
    #[error("input closed")]
    Closed,
    /// Reading or writing the terminal failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type PromptResult<T> = Result<T, PromptError>;

/// Reads answers from `input` and writes prompts and messages to `output`.
#[derive(Debug)]
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    /// Print one line.
    pub fn say(&mut self, message: impl AsRef<str>) -> PromptResult<()> {
        writeln!(self.output, "{}", message.as_ref())?;
        Ok(())
    }

    /// Print an error line.
    pub fn error(&mut self, message: impl AsRef<str>) -> PromptResult<()> {
        self.say(format!("Error: {}", message.as_ref()))
    }

    /// Show `prompt` and read one trimmed line.
    pub fn line(&mut self, prompt: &str) -> PromptResult<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            writeln!(self.output)?;
            return Err(PromptError::Closed);
        }
        Ok(buf.trim().to_owned())
    }

    /// Ask until `parse` accepts the answer, printing its message on each rejection.
    pub fn retry<T, F>(&mut self, prompt: &str, mut parse: F) -> PromptResult<T>
    where
        F: FnMut(&str) -> Result<T, String>,
    {
        loop {
            let answer = self.line(prompt)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(message) => self.error(message)?,
            }
        }
    }

    pub fn content(&mut self, prompt: &str) -> PromptResult<String> {
        self.retry(prompt, |answer| {
            validate_content(answer).map_err(|err| capitalize(&err.to_string()))
        })
    }

    pub fn task_id(&mut self, prompt: &str) -> PromptResult<TaskId> {
        self.retry(prompt, |answer| {
            if answer.is_empty() {
                return Err("Please enter a task ID.".to_owned());
            }
            answer.parse::<TaskId>().map_err(|err| capitalize(&err.to_string()))
        })
    }

    pub fn choice(&mut self, prompt: &str, range: RangeInclusive<usize>) -> PromptResult<usize> {
        let (min, max) = (*range.start(), *range.end());
        self.retry(prompt, |answer| match answer.parse::<usize>() {
            Ok(choice) if range.contains(&choice) => Ok(choice),
            _ => Err(format!("Please enter a number between {min} and {max}.")),
        })
    }

    /// Due timestamp; blank or `none` means no due date.
    pub fn due(&mut self, prompt: &str) -> PromptResult<Option<Timestamp>> {
        self.retry(prompt, |answer| user_facing(parse_due(answer)))
    }

    pub fn priority(&mut self, prompt: &str, default: Priority) -> PromptResult<Priority> {
        self.retry(prompt, |answer| user_facing(parse_priority(answer, default)))
    }

    pub fn recurrence(&mut self, prompt: &str, default: Recurrence) -> PromptResult<Recurrence> {
        self.retry(prompt, |answer| user_facing(parse_recurrence(answer, default)))
    }

    pub fn sort_key(&mut self, prompt: &str, default: SortKey) -> PromptResult<SortKey> {
        self.retry(prompt, |answer| {
            // Menu numbers map onto the key order shown to the user.
            if let Ok(index) = answer.parse::<usize>()
                && let Some(key) = index.checked_sub(1).and_then(|idx| SortKey::ALL.get(idx))
            {
                return Ok(*key);
            }
            user_facing(parse_sort_key(answer, default))
        })
    }

    /// Yes/no question; anything else asks again.
    pub fn confirm(&mut self, prompt: &str) -> PromptResult<bool> {
        loop {
            match self.line(prompt)?.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say("Please enter 'y' or 'n'.")?,
            }
        }
    }
}

fn user_facing<T>(result: FilterBuildResult<T>) -> Result<T, String> {
    result.map_err(|err| err.describe_user_facing())
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        let mut out: String = first.to_uppercase().collect();
        out.push_str(chars.as_str());
        out.push('.');
        out
    })
}
