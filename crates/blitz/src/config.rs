//! Workspace configuration.
//!
//! Stored as `.blitz/config.yaml` at the workspace root:
//!
//! ```yaml
//! project: blitzkrieg
//! issues-dir: issues
//! database: .blitz/blitz.db
//! containers:
//!   postgres-image: postgres:latest
//!   pgadmin-image: dpage/pgadmin4
//!   postgres-port: 5432
//!   pgadmin-port: 5050
//!   pgadmin-email: admin@example.com
//!   password: '0101'
//! ```
//!
//! Relative paths are resolved against the workspace root.
//! `BLITZ_ISSUES_DIR` and `BLITZ_DATABASE` override the file values.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the workspace metadata directory
pub const BLITZ_DIR_NAME: &str = ".blitz";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Default issues directory, relative to the workspace root
pub const DEFAULT_ISSUES_DIR: &str = "issues";

/// Default database file name inside `.blitz/`
pub const DATABASE_FILE_NAME: &str = "blitz.db";

/// Environment variable overriding `issues-dir`
pub const ISSUES_DIR_ENV: &str = "BLITZ_ISSUES_DIR";

/// Environment variable overriding `database`
pub const DATABASE_ENV: &str = "BLITZ_DATABASE";

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct WorkspaceConfig {
    /// Root project that new issues belong to
    pub project: String,

    /// Directory holding the Markdown issue files
    #[serde(default = "default_issues_dir")]
    pub issues_dir: String,

    /// Path to the `SQLite` database
    #[serde(default = "default_database")]
    pub database: String,

    /// Container provisioning settings
    #[serde(default)]
    pub containers: ContainerConfig,
}

/// Container provisioning section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct ContainerConfig {
    /// Postgres image
    pub postgres_image: String,
    /// pgAdmin image
    pub pgadmin_image: String,
    /// First host port tried for Postgres
    pub postgres_port: u16,
    /// First host port tried for pgAdmin
    pub pgadmin_port: u16,
    /// pgAdmin login email
    pub pgadmin_email: String,
    /// Password for both the database user and pgAdmin
    pub password: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            postgres_image: "postgres:latest".to_string(),
            pgadmin_image: "dpage/pgadmin4".to_string(),
            postgres_port: 5432,
            pgadmin_port: 5050,
            pgadmin_email: "admin@example.com".to_string(),
            password: "0101".to_string(),
        }
    }
}

fn default_issues_dir() -> String {
    DEFAULT_ISSUES_DIR.to_string()
}

fn default_database() -> String {
    format!("{BLITZ_DIR_NAME}/{DATABASE_FILE_NAME}")
}

impl WorkspaceConfig {
    /// Create a new configuration for the given root project
    pub fn new(project: &str) -> Self {
        Self {
            project: project.to_string(),
            issues_dir: default_issues_dir(),
            database: default_database(),
            containers: ContainerConfig::default(),
        }
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("invalid {}: {e}", path.display())))
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `BLITZ_ISSUES_DIR` / `BLITZ_DATABASE` from the environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides read through `lookup`. Empty values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(ISSUES_DIR_ENV).filter(|v| !v.is_empty()) {
            tracing::debug!(env_var = ISSUES_DIR_ENV, value = %dir, "Overriding issues directory");
            self.issues_dir = dir;
        }
        if let Some(db) = lookup(DATABASE_ENV).filter(|v| !v.is_empty()) {
            tracing::debug!(env_var = DATABASE_ENV, value = %db, "Overriding database path");
            self.database = db;
        }
        self
    }

    /// Absolute issues directory for a workspace rooted at `root`.
    pub fn issues_path(&self, root: &Path) -> PathBuf {
        root.join(&self.issues_dir)
    }

    /// Absolute database path for a workspace rooted at `root`.
    pub fn database_path(&self, root: &Path) -> PathBuf {
        root.join(&self.database)
    }
}

/// Path of the configuration file for a workspace rooted at `root`.
pub fn config_path(root: &Path) -> PathBuf {
    root.join(BLITZ_DIR_NAME).join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn new_uses_defaults() {
        let config = WorkspaceConfig::new("blitzkrieg");

        assert_eq!(config.project, "blitzkrieg");
        assert_eq!(config.issues_dir, "issues");
        assert_eq!(config.database, ".blitz/blitz.db");
        assert_eq!(config.containers.postgres_port, 5432);
        assert_eq!(config.containers.pgadmin_port, 5050);
    }

    #[test]
    fn save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);

        let mut original = WorkspaceConfig::new("demo");
        original.containers.postgres_port = 6000;
        original.save(&path).unwrap();

        assert_eq!(WorkspaceConfig::load(&path).unwrap(), original);
    }

    #[test]
    fn yaml_uses_kebab_case_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);

        WorkspaceConfig::new("demo").save(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();

        assert!(content.contains("issues-dir: issues"));
        assert!(content.contains("postgres-image: postgres:latest"));
        assert!(content.contains("pgadmin-port: 5050"));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "project: demo\n").unwrap();

        let config = WorkspaceConfig::load(&path).unwrap();

        assert_eq!(config, WorkspaceConfig::new("demo"));
    }

    #[test]
    fn malformed_yaml_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "project: [unclosed\n").unwrap();

        let result = WorkspaceConfig::load(&path);

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn overrides_replace_paths() {
        let config = WorkspaceConfig::new("demo").with_overrides(|key| match key {
            ISSUES_DIR_ENV => Some("docs/issues".to_string()),
            DATABASE_ENV => Some(String::new()),
            _ => None,
        });

        assert_eq!(config.issues_dir, "docs/issues");
        assert_eq!(config.database, ".blitz/blitz.db");
    }

    #[test]
    fn paths_resolve_against_root() {
        let config = WorkspaceConfig::new("demo");
        let root = Path::new("/work");

        assert_eq!(config.issues_path(root), PathBuf::from("/work/issues"));
        assert_eq!(
            config.database_path(root),
            PathBuf::from("/work/.blitz/blitz.db")
        );
    }
}
