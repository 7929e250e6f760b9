//! Project CRUD operations.

use chrono::Utc;
use rusqlite::OptionalExtension;
use rusqlite::params;

use super::{PROJECTS_COLUMNS, ProjectRepository, Session, row_to_project};
use crate::domain::{NewProject, Project, ProjectId};
use crate::error::Result;

impl ProjectRepository for Session<'_> {
    fn create_project(&self, project: NewProject) -> Result<Project> {
        let id = ProjectId::generate();
        let now = Utc::now();

        self.tx.execute(
            "INSERT INTO projects (id, name, github_repo, directory_path, pip_package_name,
             parent_id, short_description, description, project_type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                id.to_string(),
                project.name,
                project.github_repo,
                project.directory_path,
                project.pip_package_name,
                project.parent_id.map(|p| p.to_string()),
                project.short_description,
                project.description,
                project.kind.map(|k| k.as_str()),
                now
            ],
        )?;

        tracing::debug!(%id, name = %project.name, "Registered project");

        Ok(Project {
            id,
            name: project.name,
            github_repo: project.github_repo,
            directory_path: project.directory_path,
            is_deployed: false,
            deployment_date: None,
            pip_package_name: project.pip_package_name,
            parent_id: project.parent_id,
            short_description: project.short_description,
            description: project.description,
            kind: project.kind,
            created_at: now,
            updated_at: None,
        })
    }

    fn get_project(&self, id: &ProjectId) -> Result<Option<Project>> {
        self.tx
            .query_row(
                &format!("SELECT {PROJECTS_COLUMNS} FROM projects WHERE id = ?1"),
                [id.to_string()],
                row_to_project,
            )
            .optional()
            .map_err(Into::into)
    }

    fn get_project_by_name(&self, name: &str) -> Result<Option<Project>> {
        self.tx
            .query_row(
                &format!("SELECT {PROJECTS_COLUMNS} FROM projects WHERE name = ?1"),
                [name],
                row_to_project,
            )
            .optional()
            .map_err(Into::into)
    }

    fn list_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self
            .tx
            .prepare(&format!("SELECT {PROJECTS_COLUMNS} FROM projects ORDER BY name"))?;

        let projects = stmt
            .query_map([], row_to_project)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(projects)
    }

    fn list_children(&self, id: &ProjectId) -> Result<Vec<Project>> {
        let mut stmt = self.tx.prepare(&format!(
            "SELECT {PROJECTS_COLUMNS} FROM projects WHERE parent_id = ?1 ORDER BY name"
        ))?;

        let projects = stmt
            .query_map([id.to_string()], row_to_project)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(projects)
    }
}
