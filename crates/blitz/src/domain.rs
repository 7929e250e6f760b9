//! Domain types for projects and issues.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for an issue.
///
/// Always a version-4 UUID, displayed in canonical lowercase hyphenated form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(Uuid);

impl IssueId {
    /// Wrap an existing UUID.
    #[must_use]
    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl From<Uuid> for IssueId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for IssueId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Unique identifier for a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Generate a fresh project ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl From<Uuid> for ProjectId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for ProjectId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// An issue persisted in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Stable identifier, assigned at the first sync
    pub id: IssueId,

    /// Issue title
    pub title: String,

    /// Free-text body
    pub description: String,

    /// Global ordinal assigned at creation, never reused
    pub index: i64,

    /// Git branch name derived from the project and the title at creation
    pub branch_name: String,

    /// Owning project
    pub project_id: ProjectId,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last title or description change
    pub updated_at: DateTime<Utc>,
}

/// Data needed to insert an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    /// Identifier taken from the issue file
    pub id: IssueId,
    /// Issue title
    pub title: String,
    /// Issue body
    pub description: String,
    /// Ordinal from `next_index`
    pub index: i64,
    /// Precomputed branch name
    pub branch_name: String,
}

/// Partial update of an issue. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueUpdate {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
}

impl IssueUpdate {
    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// Kind of codebase a project holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectKind {
    /// Python command-line application
    PythonCli,
    /// Rust extension module for Python built with PyO3
    Pyo3RustExtension,
}

impl ProjectKind {
    /// Database representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PythonCli => "python_cli",
            Self::Pyo3RustExtension => "pyo3_rust_extension",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "python_cli" => Ok(Self::PythonCli),
            "pyo3_rust_extension" => Ok(Self::Pyo3RustExtension),
            other => Err(format!("unknown project kind '{other}'")),
        }
    }
}

/// A project registered in the workspace.
///
/// Projects form a tree through `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: ProjectId,
    /// Unique project name
    pub name: String,
    /// GitHub repository URL
    pub github_repo: Option<String>,
    /// Path to the project directory
    pub directory_path: Option<String>,
    /// Whether the project is deployed
    pub is_deployed: bool,
    /// When the project was deployed
    pub deployment_date: Option<DateTime<Utc>>,
    /// Name of the published pip package
    pub pip_package_name: Option<String>,
    /// Parent project, if nested
    pub parent_id: Option<ProjectId>,
    /// One-line summary
    pub short_description: Option<String>,
    /// Longer description
    pub description: Option<String>,
    /// Codebase kind
    pub kind: Option<ProjectKind>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: Option<DateTime<Utc>>,
}

/// Data needed to register a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProject {
    /// Unique project name
    pub name: String,
    /// GitHub repository URL
    pub github_repo: Option<String>,
    /// Path to the project directory
    pub directory_path: Option<String>,
    /// Name of the published pip package
    pub pip_package_name: Option<String>,
    /// Parent project
    pub parent_id: Option<ProjectId>,
    /// One-line summary
    pub short_description: Option<String>,
    /// Longer description
    pub description: Option<String>,
    /// Codebase kind
    pub kind: Option<ProjectKind>,
}

impl NewProject {
    /// A project with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_id_displays_lowercase_hyphenated() {
        let id: IssueId = "0B5C4B4E-8F0E-4F7E-9D5C-2C1F7B0E9A11".parse().unwrap();
        assert_eq!(id.to_string(), "0b5c4b4e-8f0e-4f7e-9d5c-2c1f7b0e9a11");
    }

    #[test]
    fn project_kind_round_trips_through_db_form() {
        for kind in [ProjectKind::PythonCli, ProjectKind::Pyo3RustExtension] {
            assert_eq!(kind.as_str().parse::<ProjectKind>().unwrap(), kind);
        }
        assert!("java".parse::<ProjectKind>().is_err());
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(IssueUpdate::default().is_empty());
        assert!(
            !IssueUpdate {
                description: Some("x".to_string()),
                ..IssueUpdate::default()
            }
            .is_empty()
        );
    }
}
