//! CLI entry point for tasklist.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tasklist_app::config::ProjectConfig;
use tasklist_app::service::TaskService;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use inputs::Prompter;
use menu::Menu;

mod config;
mod inputs;
mod menu;
mod view;

/// In-memory task list driven by a numbered menu.
#[derive(Parser, Debug)]
#[command(
    name = "tasklist",
    version,
    about = "tasklist: an in-memory task list with due dates, priorities, tags and recurrence"
)]
struct Cli {
    /// Configuration file (defaults to <config dir>/tasklist/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Start the interactive menu (default).
    Menu,

    /// Write a default configuration file.
    InitConfig {
        /// Destination path (defaults to the standard config location).
        #[arg(long)]
        output: Option<PathBuf>,
        /// Overwrite an existing file without asking.
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let Cli { config, cmd } = Cli::parse();
    install_tracing();
    execute_command(config, cmd.unwrap_or(Command::Menu))
}

fn execute_command(config_path: Option<PathBuf>, command: Command) -> Result<()> {
    let mut io = Prompter::new(io::stdin().lock(), io::stdout().lock());
    match command {
        Command::Menu => {
            let project = ProjectConfig::load(config_path.as_deref())?;
            tracing::debug!(?project, "configuration loaded");
            Menu::new(TaskService::new(project), io).run()
        }
        Command::InitConfig { output, force } => {
            config::init_config(output.as_deref().or(config_path.as_deref()), force, &mut io)
        }
    }
}

fn install_tracing() {
    // RUST_LOG overrides the default; logs go to stderr so they never mix with menu output.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
