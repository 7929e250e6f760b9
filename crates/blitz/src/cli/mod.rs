//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `init`: Create a workspace and register its root project
//! - `sync`: Reconcile the issues directory with the database
//! - `project add` / `project list`: Manage the project registry
//! - `provision`: Start the project's Postgres and pgAdmin containers
//! - `scaffold`: Lay out a Python CLI package
//!
//! # Global Flags
//!
//! - `-C/--workspace <dir>`: Run as if started in `<dir>`
//! - `-v`: More log output (repeatable)
//! - `--json`: Output in JSON format
//!
//! # Example
//!
//! ```bash
//! blitz init --project blitzkrieg
//! blitz sync
//! blitz project add api --parent blitzkrieg --kind python-cli
//! ```

mod args;
mod execute;
mod types;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use args::{InitArgs, ProjectAction, ProjectAddArgs, ProjectArgs, ProvisionArgs, ScaffoldArgs};
pub use types::ProjectKindArg;

use crate::app::App;
use crate::output::{OutputConfig, OutputMode};

/// Blitz - workspace bootstrapper with Markdown issue sync
///
/// Keeps a directory of Markdown issue files and a local database in
/// step, and sets up per-project database containers.
#[derive(Parser, Debug)]
#[command(name = "blitz")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Workspace directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a new blitz workspace
    ///
    /// Creates `.blitz/` with configuration and database, the issues
    /// directory, and registers the root project.
    Init(InitArgs),

    /// Sync Markdown issue files with the database
    ///
    /// Assigns identifiers to new files, creates or updates issues, and
    /// writes files for issues that only exist in the database.
    Sync,

    /// Manage projects
    Project(ProjectArgs),

    /// Start the project's database containers
    ///
    /// Runs Postgres and pgAdmin on a dedicated Docker network and wires
    /// pgAdmin to the database.
    Provision(ProvisionArgs),

    /// Create a Python CLI package skeleton
    Scaffold(ScaffoldArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Log filter matching the `-v` count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Output mode selected by `--json`.
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        }
    }

    /// Directory commands run in: `--workspace` or the current directory.
    pub fn working_dir(&self) -> Result<PathBuf> {
        let dir = match &self.workspace {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        Ok(std::path::absolute(dir)?)
    }

    /// Execute the CLI command
    pub fn execute(&self) -> Result<()> {
        let output_mode = self.output_mode();
        let output_config = OutputConfig::from_env();
        let working_dir = self.working_dir()?;

        match &self.command {
            Commands::Init(args) => execute::execute_init(&working_dir, args, output_mode),
            Commands::Sync => {
                let mut app = App::from_directory(&working_dir, output_config)?;
                execute::execute_sync(&mut app, output_mode)
            }
            Commands::Project(ProjectArgs {
                action: ProjectAction::Add(args),
            }) => {
                let mut app = App::from_directory(&working_dir, output_config)?;
                execute::execute_project_add(&mut app, args, output_mode)
            }
            Commands::Project(ProjectArgs {
                action: ProjectAction::List,
            }) => {
                let mut app = App::from_directory(&working_dir, output_config)?;
                execute::execute_project_list(&mut app, output_mode)
            }
            Commands::Provision(args) => {
                let app = App::from_directory(&working_dir, output_config)?;
                execute::execute_provision(&app, args, output_mode)
            }
            Commands::Scaffold(args) => {
                execute::execute_scaffold(&working_dir, args, output_mode, &output_config)
            }
        }
    }
}
