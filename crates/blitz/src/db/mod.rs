//! `SQLite` storage layer for blitz.
//!
//! The database holds two tables: `projects` (the workspace's project tree)
//! and `issues` (the mirror of the Markdown issues directory).
//!
//! All reads and writes go through a [`Session`], a scoped wrapper over one
//! `SQLite` transaction. A session commits only when [`Session::commit`] is
//! called; dropping it on any other path rolls everything back.
//!
//! ## Module Structure
//!
//! - `schema` - Database schema (DDL)
//! - `helpers` - Row conversion and parsing utilities
//! - `issues` - [`IssueRepository`] implementation
//! - `projects` - [`ProjectRepository`] implementation

mod helpers;
mod issues;
mod projects;
mod schema;

pub(crate) use helpers::{ISSUES_COLUMNS, PROJECTS_COLUMNS, row_to_issue, row_to_project};
pub(crate) use schema::SCHEMA;

use std::path::{Path, PathBuf};

use rusqlite::{Connection, Transaction};

use crate::domain::{Issue, IssueId, IssueUpdate, NewIssue, NewProject, Project, ProjectId};
use crate::error::Result;

/// Savepoint name used by [`Session::atomically`].
const UNIT_SAVEPOINT: &str = "blitz_unit";

/// Persisted issue table operations.
pub trait IssueRepository {
    /// Get an issue by ID. Returns `None` if it doesn't exist.
    fn get_by_id(&self, id: &IssueId) -> Result<Option<Issue>>;

    /// Get every issue, ordered by index.
    fn get_all(&self) -> Result<Vec<Issue>>;

    /// Get the issues of one project, ordered by index.
    fn list_by_project(&self, project_id: &ProjectId) -> Result<Vec<Issue>>;

    /// The next unused ordinal.
    ///
    /// Derived from the stored rows, so it stays monotonic across restarts.
    fn next_index(&self) -> Result<i64>;

    /// Insert an issue owned by `project_id`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Constraint` if the project doesn't exist or the ID or
    /// index is already taken.
    fn create(&self, issue: NewIssue, project_id: &ProjectId) -> Result<Issue>;

    /// Apply a partial update and refresh `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `Error::IssueNotFound` if the issue doesn't exist.
    fn update(&self, id: &IssueId, update: IssueUpdate) -> Result<Issue>;
}

/// Project registry operations.
pub trait ProjectRepository {
    /// Register a project.
    ///
    /// # Errors
    ///
    /// Returns `Error::Constraint` if the name is taken or the parent doesn't
    /// exist.
    fn create_project(&self, project: NewProject) -> Result<Project>;

    /// Get a project by ID.
    fn get_project(&self, id: &ProjectId) -> Result<Option<Project>>;

    /// Get a project by its unique name.
    fn get_project_by_name(&self, name: &str) -> Result<Option<Project>>;

    /// Get every project, ordered by name.
    fn list_projects(&self) -> Result<Vec<Project>>;

    /// Get the direct children of a project, ordered by name.
    fn list_children(&self, id: &ProjectId) -> Result<Vec<Project>>;
}

/// A store the sync engine can run against: both repositories plus the
/// ability to apply a unit of work all-or-nothing.
pub trait SyncStore: IssueRepository + ProjectRepository {
    /// Run `op`; if it fails, undo every write it made.
    fn atomically<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Self) -> Result<T>;
}

/// `SQLite` database wrapper.
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}

impl Database {
    /// Open or create the database file.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        tracing::debug!(path = %path.display(), "Opened database");
        Self::initialize(conn, Some(path.to_path_buf()))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::initialize(Connection::open_in_memory()?, None)
    }

    fn initialize(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, path })
    }

    /// Path of the database file, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Begin a scoped session.
    ///
    /// Writes made through the session become visible to other connections
    /// only after [`Session::commit`].
    pub fn session(&mut self) -> Result<Session<'_>> {
        Ok(Session {
            tx: self.conn.transaction()?,
        })
    }
}

/// One database transaction.
///
/// Dropping a session without calling [`Session::commit`] rolls it back.
pub struct Session<'db> {
    tx: Transaction<'db>,
}

impl Session<'_> {
    /// Commit every write made in this session.
    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        tracing::debug!("Session committed");
        Ok(())
    }

    /// Discard every write made in this session.
    pub fn rollback(self) -> Result<()> {
        self.tx.rollback()?;
        tracing::debug!("Session rolled back");
        Ok(())
    }
}

impl SyncStore for Session<'_> {
    fn atomically<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Self) -> Result<T>,
    {
        self.tx.execute_batch(&format!("SAVEPOINT {UNIT_SAVEPOINT}"))?;

        match op(self) {
            Ok(value) => {
                self.tx
                    .execute_batch(&format!("RELEASE {UNIT_SAVEPOINT}"))?;
                Ok(value)
            }
            Err(e) => {
                self.tx.execute_batch(&format!(
                    "ROLLBACK TO {UNIT_SAVEPOINT}; RELEASE {UNIT_SAVEPOINT}"
                ))?;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::identity;
    use tempfile::TempDir;

    fn new_issue(title: &str, index: i64) -> NewIssue {
        NewIssue {
            id: identity::generate(),
            title: title.to_string(),
            description: "Body".to_string(),
            index,
            branch_name: "slug".to_string(),
        }
    }

    #[test]
    fn open_creates_database_and_schema() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("blitz.db");

        let db = Database::open(&path).unwrap();

        assert!(path.exists());
        assert_eq!(db.path(), Some(path.as_path()));
        let tables: Vec<String> = db
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(tables, vec!["issues".to_string(), "projects".to_string()]);
    }

    #[test]
    fn dropped_session_rolls_back() {
        let mut db = Database::open_in_memory().unwrap();
        {
            let session = db.session().unwrap();
            session.create_project(NewProject::named("demo")).unwrap();
        }

        let session = db.session().unwrap();
        assert!(session.get_project_by_name("demo").unwrap().is_none());
    }

    #[test]
    fn committed_session_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blitz.db");
        {
            let mut db = Database::open(&path).unwrap();
            let session = db.session().unwrap();
            session.create_project(NewProject::named("demo")).unwrap();
            session.commit().unwrap();
        }

        let mut db = Database::open(&path).unwrap();
        let session = db.session().unwrap();
        assert!(session.get_project_by_name("demo").unwrap().is_some());
    }

    #[test]
    fn atomically_undoes_failed_unit_only() {
        let mut db = Database::open_in_memory().unwrap();
        let session = db.session().unwrap();
        let project = session.create_project(NewProject::named("demo")).unwrap();

        let kept = new_issue("kept", 1);
        session
            .atomically(|s| s.create(kept.clone(), &project.id))
            .unwrap();

        let undone = new_issue("undone", 2);
        let result: Result<()> = session.atomically(|s| {
            s.create(undone.clone(), &project.id)?;
            Err(Error::Constraint("simulated".to_string()))
        });

        assert!(result.is_err());
        assert!(session.get_by_id(&kept.id).unwrap().is_some());
        assert!(session.get_by_id(&undone.id).unwrap().is_none());
    }
}
