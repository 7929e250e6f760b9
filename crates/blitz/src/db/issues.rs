//! Issue CRUD operations.

use chrono::Utc;
use rusqlite::OptionalExtension;
use rusqlite::params;

use super::{ISSUES_COLUMNS, IssueRepository, Session, row_to_issue};
use crate::domain::{Issue, IssueId, IssueUpdate, NewIssue, ProjectId};
use crate::error::{Error, Result};

impl IssueRepository for Session<'_> {
    fn get_by_id(&self, id: &IssueId) -> Result<Option<Issue>> {
        self.tx
            .query_row(
                &format!("SELECT {ISSUES_COLUMNS} FROM issues WHERE id = ?1"),
                [id.to_string()],
                row_to_issue,
            )
            .optional()
            .map_err(Into::into)
    }

    fn get_all(&self) -> Result<Vec<Issue>> {
        let mut stmt = self.tx.prepare(&format!(
            "SELECT {ISSUES_COLUMNS} FROM issues ORDER BY issue_index"
        ))?;

        let issues = stmt
            .query_map([], row_to_issue)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(issues)
    }

    fn list_by_project(&self, project_id: &ProjectId) -> Result<Vec<Issue>> {
        let mut stmt = self.tx.prepare(&format!(
            "SELECT {ISSUES_COLUMNS} FROM issues WHERE project_id = ?1 ORDER BY issue_index"
        ))?;

        let issues = stmt
            .query_map([project_id.to_string()], row_to_issue)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(issues)
    }

    fn next_index(&self) -> Result<i64> {
        let next: i64 = self.tx.query_row(
            "SELECT COALESCE(MAX(issue_index), 0) + 1 FROM issues",
            [],
            |row| row.get(0),
        )?;
        Ok(next)
    }

    fn create(&self, issue: NewIssue, project_id: &ProjectId) -> Result<Issue> {
        let now = Utc::now();

        self.tx.execute(
            "INSERT INTO issues (id, title, description, issue_index, branch_name, project_id,
             created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                issue.id.to_string(),
                issue.title,
                issue.description,
                issue.index,
                issue.branch_name,
                project_id.to_string(),
                now,
                now
            ],
        )?;

        tracing::debug!(id = %issue.id, index = issue.index, "Inserted issue");

        Ok(Issue {
            id: issue.id,
            title: issue.title,
            description: issue.description,
            index: issue.index,
            branch_name: issue.branch_name,
            project_id: *project_id,
            created_at: now,
            updated_at: now,
        })
    }

    fn update(&self, id: &IssueId, update: IssueUpdate) -> Result<Issue> {
        let changed = self.tx.execute(
            "UPDATE issues SET title = COALESCE(?2, title),
             description = COALESCE(?3, description), updated_at = ?4 WHERE id = ?1",
            params![id.to_string(), update.title, update.description, Utc::now()],
        )?;

        if changed == 0 {
            return Err(Error::IssueNotFound(*id));
        }

        self.get_by_id(id)?
            .ok_or_else(|| Error::Internal(format!("issue {id} vanished during update")))
    }
}
