//! Two-way reconciliation between the issues directory and the database.
//!
//! A run walks every `.md` file in the issues directory, gives it an
//! identifier if it lacks one, and then either creates the matching issue
//! row, pushes edited content into an existing row, or leaves it alone.
//! A final materialization pass writes a file for every stored issue that
//! has none on disk.
//!
//! Each file is handled as one unit of work inside
//! [`SyncStore::atomically`]: a per-file failure undoes only that file's
//! database writes and becomes an [`SyncAction::Error`] row. Database and
//! internal errors abort the run.

pub mod naming;

use std::collections::HashSet;
use std::path::Path;

use blitz_markdown::{IssueDocument, IssueFileStore};
use tracing::{debug, info, warn};

use crate::db::{Database, SyncStore};
use crate::domain::{Issue, IssueId, IssueUpdate, NewIssue};
use crate::error::{Error, Result};
use crate::identity;
use crate::report::{SyncAction, SyncReport};

/// Run one full sync inside a single database session.
///
/// The session commits only if the run completes. Rows recorded before a
/// fatal error stay in `report` so the caller can still render them.
///
/// # Errors
///
/// Returns an error if the issues directory cannot be listed or the
/// database fails.
pub fn process_issues<F: IssueFileStore>(
    db: &mut Database,
    files: &F,
    project_name: &str,
    report: &mut SyncReport,
) -> Result<()> {
    let session = db.session()?;
    Reconciler::new(&session, files, project_name).run(report)?;
    session.commit()
}

/// Reconciles one issues directory against one store.
pub struct Reconciler<'a, S, F> {
    store: &'a S,
    files: &'a F,
    project_name: &'a str,
}

impl<'a, S: SyncStore, F: IssueFileStore> Reconciler<'a, S, F> {
    /// New issues are attached to the project named `project_name`.
    pub fn new(store: &'a S, files: &'a F, project_name: &'a str) -> Self {
        Self {
            store,
            files,
            project_name,
        }
    }

    /// Process every issue file, then materialize database-only issues.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error. Per-file failures are recorded in
    /// `report` instead.
    pub fn run(&self, report: &mut SyncReport) -> Result<()> {
        let paths = self.files.list_markdown_files()?;
        info!(count = paths.len(), project = self.project_name, "Syncing issue files");

        for path in &paths {
            let name = display_name(path);
            match self.process_file(path, &name, report) {
                Ok(()) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(file = %name, error = %e, "Failed to sync issue file");
                    report.record_error(name, e);
                }
            }
        }

        self.materialize(report)?;

        info!(summary = %report.summary(), "Sync finished");
        Ok(())
    }

    fn process_file(&self, path: &Path, name: &str, report: &mut SyncReport) -> Result<()> {
        let mut document = self.files.read_document(path)?;

        let id = if let Some(id) = identity::parse(&document.id_line) {
            id
        } else {
            let id = identity::generate();
            self.files.prepend_identifier(path, &id.to_string())?;
            debug!(file = %name, %id, "Assigned identifier");
            report.record(name, SyncAction::IdAssigned);
            document = self.files.read_document(path)?;
            id
        };

        let action = self
            .store
            .atomically(|store| self.reconcile(store, path, id, &document))?;
        debug!(file = %name, %id, action = %action, "Reconciled issue file");
        report.record(name, action);
        Ok(())
    }

    fn reconcile(
        &self,
        store: &S,
        path: &Path,
        id: IssueId,
        document: &IssueDocument,
    ) -> Result<SyncAction> {
        match store.get_by_id(&id)? {
            None => {
                self.create_issue(store, id, document)?;
                Ok(SyncAction::Created)
            }
            Some(existing) => self.update_if_modified(store, path, &existing, document),
        }
    }

    fn create_issue(&self, store: &S, id: IssueId, document: &IssueDocument) -> Result<Issue> {
        let project = store
            .get_project_by_name(self.project_name)?
            .ok_or_else(|| Error::ProjectNotFound(self.project_name.to_string()))?;

        let new_issue = NewIssue {
            id,
            title: naming::plain_title(&document.title),
            description: document.description.clone(),
            index: store.next_index()?,
            branch_name: naming::branch_name(self.project_name, &document.title),
        };
        store.create(new_issue, &project.id)
    }

    fn update_if_modified(
        &self,
        store: &S,
        path: &Path,
        existing: &Issue,
        document: &IssueDocument,
    ) -> Result<SyncAction> {
        let title = naming::plain_title(&document.title);

        let mut update = IssueUpdate::default();
        if existing.title != title {
            update.title = Some(title);
        }
        if existing.description != document.description {
            update.description = Some(document.description.clone());
        }

        if update.is_empty() {
            return Ok(SyncAction::Unchanged);
        }

        store.update(&existing.id, update)?;
        self.files.write(path, &document.render())?;
        Ok(SyncAction::Updated)
    }

    /// Write a file for every stored issue whose id no file carries.
    fn materialize(&self, report: &mut SyncReport) -> Result<()> {
        let issues = self.store.get_all()?;
        let paths = self.files.list_markdown_files()?;

        let on_disk: HashSet<String> = paths
            .iter()
            .filter_map(|path| self.files.read_document(path).ok())
            .map(|document| document.id_line)
            .collect();
        let taken: HashSet<&Path> = paths.iter().map(|p| p.as_path()).collect();

        for issue in issues
            .iter()
            .filter(|issue| !on_disk.contains(&issue.id.to_string()))
        {
            let file_name = naming::file_name_for(&issue.title, &issue.id);
            let path = self.files.path_for(&file_name);

            if taken.contains(path.as_path()) {
                warn!(file = %file_name, id = %issue.id, "Overwriting issue file with the same name");
            }

            let document =
                IssueDocument::new(issue.id.to_string(), &issue.title, &issue.description);
            match self.files.write(&path, &document.render()) {
                Ok(()) => {
                    debug!(file = %file_name, id = %issue.id, "Materialized issue file");
                    report.record(file_name, SyncAction::Synced);
                }
                Err(e) => {
                    warn!(file = %file_name, error = %e, "Failed to materialize issue file");
                    report.record_error(file_name, e);
                }
            }
        }

        Ok(())
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
