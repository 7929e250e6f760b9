//! Implementation of the `init` command.
//!
//! Creates the `.blitz/` directory with its configuration and database,
//! the issues directory, and registers the workspace's root project.

use crate::config::{BLITZ_DIR_NAME, WorkspaceConfig, config_path};
use crate::db::{Database, ProjectRepository};
use crate::domain::NewProject;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the gitignore file within .blitz
pub const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Maximum project name length
pub const MAX_PROJECT_NAME_LENGTH: usize = 64;

/// Maximum directory depth to traverse when searching for the workspace root
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

const GITIGNORE_CONTENT: &str = "\
# Local database files; the issues directory is what gets tracked
*.db
*.db-wal
*.db-shm
";

/// Result of the init command
#[derive(Debug)]
pub struct InitResult {
    /// Path to the created .blitz directory
    pub blitz_dir: PathBuf,
    /// Path to the created config file
    pub config_file: PathBuf,
    /// Path to the created database
    pub database_file: PathBuf,
    /// Path to the issues directory
    pub issues_dir: PathBuf,
    /// Name of the registered root project
    pub project: String,
}

/// Validate a project name.
///
/// Requirements:
/// - 1-64 characters
/// - ASCII letters, digits, `-` and `_` only
///
/// Project names end up in container, network and directory names, so
/// anything else is rejected.
pub fn validate_project_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Config("Project name cannot be empty".to_string()));
    }

    if name.len() > MAX_PROJECT_NAME_LENGTH {
        return Err(Error::Config(format!(
            "Project name cannot exceed {MAX_PROJECT_NAME_LENGTH} characters"
        )));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(Error::Config(format!(
            "Project name '{name}' must contain only letters, digits, '-' or '_'"
        )));
    }

    Ok(())
}

/// Initialize a new blitz workspace in `base_dir`.
///
/// `project` defaults to the name of `base_dir`.
///
/// # Errors
///
/// Returns an error if:
/// - The `.blitz/` directory already exists
/// - The project name is invalid
/// - File system or database operations fail
pub fn init(base_dir: &Path, project: Option<&str>) -> Result<InitResult> {
    let dir_name = base_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let project = project.unwrap_or(&dir_name).trim();
    validate_project_name(project)?;

    let blitz_dir = base_dir.join(BLITZ_DIR_NAME);
    if blitz_dir.exists() {
        return Err(Error::Config(format!(
            "Blitz is already initialized in this directory. Found existing '{BLITZ_DIR_NAME}'"
        )));
    }

    fs::create_dir_all(&blitz_dir)?;

    let config_file = config_path(base_dir);
    let config = WorkspaceConfig::new(project);
    config.save(&config_file)?;

    fs::write(blitz_dir.join(GITIGNORE_FILE_NAME), GITIGNORE_CONTENT)?;

    let issues_dir = config.issues_path(base_dir);
    fs::create_dir_all(&issues_dir)?;

    let database_file = config.database_path(base_dir);
    let mut db = Database::open(&database_file)?;
    let session = db.session()?;
    session.create_project(NewProject {
        directory_path: Some(base_dir.display().to_string()),
        ..NewProject::named(project)
    })?;
    session.commit()?;

    tracing::info!(project, root = %base_dir.display(), "Initialized workspace");

    Ok(InitResult {
        blitz_dir,
        config_file,
        database_file,
        issues_dir,
        project: project.to_string(),
    })
}

/// Check if a directory has been initialized with blitz.
pub fn is_initialized(base_dir: &Path) -> bool {
    base_dir.join(BLITZ_DIR_NAME).exists()
}

/// Find the workspace root by searching up the directory tree.
///
/// Returns the first directory containing `.blitz/`, or `None` if the
/// filesystem root or the traversal limit is reached first.
pub fn find_workspace_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if current.join(BLITZ_DIR_NAME).is_dir() {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
