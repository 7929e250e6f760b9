//! Application context for CLI command execution.
//!
//! [`App`] is built once by the entry point and handed to every command by
//! reference. It owns everything a command needs: the workspace root, the
//! loaded configuration, the open database and the output settings.
//!
//! # Example
//!
//! ```no_run
//! use blitz::app::App;
//! use blitz::output::OutputConfig;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut app = App::from_directory(Path::new("."), OutputConfig::from_env())?;
//!     let report = app.sync()?;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```

use crate::commands::init::find_workspace_root;
use crate::config::{WorkspaceConfig, config_path};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::output::OutputConfig;
use crate::report::SyncReport;
use crate::sync;
use blitz_markdown::IssueDirectory;
use std::path::{Path, PathBuf};

/// Application context for CLI operations.
#[derive(Debug)]
pub struct App {
    root: PathBuf,
    config: WorkspaceConfig,
    db: Database,
    output: OutputConfig,
}

impl App {
    /// Create an App from the given working directory.
    ///
    /// Searches up the directory tree for a `.blitz/` directory, loads the
    /// configuration (with environment overrides) and opens the database.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No workspace is found in the directory tree
    /// - Configuration cannot be loaded
    /// - The database cannot be opened
    pub fn from_directory(working_dir: &Path, output: OutputConfig) -> Result<Self> {
        let root = find_workspace_root(working_dir).ok_or_else(|| {
            Error::Config(format!(
                "no blitz workspace found in {} or its parents (run `blitz init`)",
                working_dir.display()
            ))
        })?;

        let config = WorkspaceConfig::load(&config_path(&root))?.with_env_overrides();
        let db = Database::open(&config.database_path(&root))?;

        tracing::debug!(root = %root.display(), project = %config.project, "Loaded workspace");
        Ok(Self {
            root,
            config,
            db,
            output,
        })
    }

    /// Workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loaded configuration.
    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Output settings.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// The open database.
    pub fn database_mut(&mut self) -> &mut Database {
        &mut self.db
    }

    /// The Markdown issues directory.
    pub fn issue_directory(&self) -> IssueDirectory {
        IssueDirectory::new(self.config.issues_path(&self.root))
    }

    /// Sync the issues directory with the database.
    ///
    /// # Errors
    ///
    /// Returns the error that aborted the run. Use [`App::sync_into`] to
    /// keep the rows recorded before it.
    pub fn sync(&mut self) -> Result<SyncReport> {
        let mut report = SyncReport::new();
        self.sync_into(&mut report)?;
        Ok(report)
    }

    /// Sync into a caller-owned report.
    ///
    /// # Errors
    ///
    /// Returns an error if the issues directory cannot be listed or the
    /// database fails. `report` keeps the rows recorded up to that point.
    pub fn sync_into(&mut self, report: &mut SyncReport) -> Result<()> {
        let files = self.issue_directory();
        sync::process_issues(&mut self.db, &files, &self.config.project, report)
    }
}
