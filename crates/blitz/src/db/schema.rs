//! Database schema definition for blitz.

/// Database schema definition.
pub(crate) const SCHEMA: &str = r"
-- Projects registered in the workspace; parent_id forms a tree
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    github_repo TEXT,
    directory_path TEXT,
    is_deployed INTEGER NOT NULL DEFAULT 0,
    deployment_date TEXT,
    pip_package_name TEXT,
    parent_id TEXT REFERENCES projects(id),
    short_description TEXT,
    description TEXT,
    project_type TEXT CHECK (project_type IN ('python_cli', 'pyo3_rust_extension')),
    created_at TEXT NOT NULL,
    updated_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_projects_parent ON projects(parent_id);

-- Issues mirrored from the Markdown issues directory
-- issue_index is a single counter across all projects
CREATE TABLE IF NOT EXISTS issues (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    issue_index INTEGER NOT NULL UNIQUE,
    branch_name TEXT NOT NULL,
    project_id TEXT NOT NULL REFERENCES projects(id),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_issues_project ON issues(project_id);
";
