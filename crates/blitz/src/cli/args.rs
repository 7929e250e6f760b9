//! CLI argument structs for all commands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::types::ProjectKindArg;
use crate::commands::init::validate_project_name;

/// clap value parser for project names.
fn parse_project_name(s: &str) -> Result<String, String> {
    let name = s.trim();
    validate_project_name(name).map_err(|e| e.to_string())?;
    Ok(name.to_string())
}

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Root project name (defaults to the directory name)
    ///
    /// Letters, digits, '-' and '_' only, at most 64 characters. New issues
    /// are filed under this project.
    #[arg(short, long, value_parser = parse_project_name)]
    pub project: Option<String>,

    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `project` command
#[derive(Parser, Debug, Clone)]
pub struct ProjectArgs {
    /// Project subcommand
    #[command(subcommand)]
    pub action: ProjectAction,
}

/// Project subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ProjectAction {
    /// Register a project
    Add(ProjectAddArgs),

    /// Show the project tree
    List,
}

/// Arguments for `project add`
#[derive(Parser, Debug, Clone)]
pub struct ProjectAddArgs {
    /// Unique project name
    #[arg(value_parser = parse_project_name)]
    pub name: String,

    /// Name of the parent project
    #[arg(long)]
    pub parent: Option<String>,

    /// Path to the project directory
    #[arg(long)]
    pub path: Option<String>,

    /// Codebase kind
    #[arg(short, long, value_enum)]
    pub kind: Option<ProjectKindArg>,

    /// GitHub repository URL
    #[arg(long)]
    pub repo: Option<String>,

    /// Longer description
    #[arg(short = 'D', long)]
    pub description: Option<String>,
}

/// Arguments for the `provision` command
#[derive(Parser, Debug, Clone)]
pub struct ProvisionArgs {
    /// Host port for Postgres (default: first free port from the configured one)
    #[arg(long)]
    pub postgres_port: Option<u16>,

    /// Host port for pgAdmin (default: first free port from the configured one)
    #[arg(long)]
    pub pgadmin_port: Option<u16>,

    /// Also build and start the compose services in the workspace root
    #[arg(long)]
    pub compose: bool,
}

/// Arguments for the `scaffold` command
#[derive(Parser, Debug, Clone)]
pub struct ScaffoldArgs {
    /// Package name
    #[arg(value_parser = parse_project_name)]
    pub name: String,

    /// Project directory to create `src/` in (default: working directory)
    #[arg(long)]
    pub dir: Option<PathBuf>,
}
