//! Helper functions for database row conversion and parsing.
//!
//! Also provides SQL column list constants shared by the query modules.

use std::str::FromStr;

use crate::domain::{Issue, IssueId, Project, ProjectId, ProjectKind};

/// SQL column list for the issues table.
///
/// Use with `row_to_issue` for consistent column ordering.
pub(crate) const ISSUES_COLUMNS: &str =
    "id, title, description, issue_index, branch_name, project_id, created_at, updated_at";

/// SQL column list for the projects table.
///
/// Use with `row_to_project` for consistent column ordering.
pub(crate) const PROJECTS_COLUMNS: &str =
    "id, name, github_repo, directory_path, is_deployed, deployment_date, pip_package_name, \
     parent_id, short_description, description, project_type, created_at, updated_at";

/// Parse a text column into any `FromStr` type, reporting the column on failure.
fn parse_column<T>(idx: usize, value: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("Invalid value '{value}' in database: {e}").into(),
        )
    })
}

/// Convert a database row to an [`Issue`].
pub(crate) fn row_to_issue(row: &rusqlite::Row) -> rusqlite::Result<Issue> {
    Ok(Issue {
        id: parse_column::<IssueId>(0, &row.get::<_, String>(0)?)?,
        title: row.get(1)?,
        description: row.get(2)?,
        index: row.get(3)?,
        branch_name: row.get(4)?,
        project_id: parse_column::<ProjectId>(5, &row.get::<_, String>(5)?)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Convert a database row to a [`Project`].
pub(crate) fn row_to_project(row: &rusqlite::Row) -> rusqlite::Result<Project> {
    let parent_id = row
        .get::<_, Option<String>>(7)?
        .map(|s| parse_column::<ProjectId>(7, &s))
        .transpose()?;
    let kind = row
        .get::<_, Option<String>>(10)?
        .map(|s| parse_column::<ProjectKind>(10, &s))
        .transpose()?;

    Ok(Project {
        id: parse_column::<ProjectId>(0, &row.get::<_, String>(0)?)?,
        name: row.get(1)?,
        github_repo: row.get(2)?,
        directory_path: row.get(3)?,
        is_deployed: row.get(4)?,
        deployment_date: row.get(5)?,
        pip_package_name: row.get(6)?,
        parent_id,
        short_description: row.get(8)?,
        description: row.get(9)?,
        kind,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}
