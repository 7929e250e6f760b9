//! Project tree rendering for `blitz project list`.

use std::collections::HashSet;
use std::io::{self, Write};

use super::OutputConfig;
use super::color::{dimmed, info};
use crate::domain::{Project, ProjectId};

/// Render projects as a parent/child tree:
///
/// ```text
/// * blitzkrieg
/// |-- api (python_cli)
/// |   `-- api-core (pyo3_rust_extension)
/// `-- web
/// ```
///
/// Projects whose parent is not in `projects` are shown as roots.
pub fn write_project_tree<W: Write>(
    w: &mut W,
    projects: &[Project],
    config: &OutputConfig,
) -> io::Result<()> {
    if projects.is_empty() {
        return writeln!(w, "No projects registered.");
    }

    let known: HashSet<ProjectId> = projects.iter().map(|p| p.id).collect();
    let root_icon = if config.use_ascii { "*" } else { "◆" };

    for root in projects
        .iter()
        .filter(|p| p.parent_id.is_none_or(|parent| !known.contains(&parent)))
    {
        writeln!(
            w,
            "{} {}{}",
            info(root_icon, config),
            info(&root.name, config),
            kind_suffix(root, config)
        )?;
        write_children(w, projects, root.id, &[], config)?;
    }

    Ok(())
}

/// `prefix_segments` records, per ancestor level, whether that ancestor has
/// siblings still to be drawn below it.
fn write_children<W: Write>(
    w: &mut W,
    projects: &[Project],
    parent: ProjectId,
    prefix_segments: &[bool],
    config: &OutputConfig,
) -> io::Result<()> {
    let (branch, corner, pipe, space) = if config.use_ascii {
        ("|-- ", "`-- ", "|   ", "    ")
    } else {
        ("├── ", "└── ", "│   ", "    ")
    };

    let children: Vec<&Project> = projects
        .iter()
        .filter(|p| p.parent_id == Some(parent))
        .collect();

    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;

        let prefix: String = prefix_segments
            .iter()
            .map(|&has_more| dimmed(if has_more { pipe } else { space }, config))
            .collect();
        let connector = dimmed(if is_last { corner } else { branch }, config);

        writeln!(
            w,
            "{prefix}{connector}{}{}",
            child.name,
            kind_suffix(child, config)
        )?;

        let mut next_segments = prefix_segments.to_vec();
        next_segments.push(!is_last);
        write_children(w, projects, child.id, &next_segments, config)?;
    }

    Ok(())
}

fn kind_suffix(project: &Project, config: &OutputConfig) -> String {
    project
        .kind
        .map(|kind| format!(" {}", dimmed(&format!("({kind})"), config)))
        .unwrap_or_default()
}
