//! Python CLI project skeletons.

use std::fs;
use std::path::{Path, PathBuf};

use crate::commands::init::validate_project_name;
use crate::error::{Error, Result};

const INIT_PY: &str = "__init__.py";

/// Created files, in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldResult {
    /// Package directory (`src/{name}`)
    pub package_dir: PathBuf,
    /// Every file written
    pub files: Vec<PathBuf>,
}

/// Entry point module with a click hello-world command.
const ENTRY_POINT_SOURCE: &str = "\
import click


@click.command()
def main():
    print('Hello, world!')


if __name__ == '__main__':
    main()
";

/// Lay out a Python CLI package under `project_dir/src`:
///
/// ```text
/// src/__init__.py
/// src/{name}/__init__.py
/// src/{name}/core/__init__.py
/// src/{name}/{name}.py
/// ```
///
/// # Errors
///
/// Returns [`Error::Config`] if `name` is not a valid project name or
/// `src/{name}` already exists, and [`Error::Io`] if writing fails.
pub fn scaffold_python_cli(project_dir: &Path, name: &str) -> Result<ScaffoldResult> {
    validate_project_name(name)?;

    let src_dir = project_dir.join("src");
    let package_dir = src_dir.join(name);
    if package_dir.exists() {
        return Err(Error::Config(format!(
            "{} already exists; refusing to overwrite it",
            package_dir.display()
        )));
    }

    let core_dir = package_dir.join("core");
    fs::create_dir_all(&core_dir)?;

    let mut files = Vec::new();
    let src_init = src_dir.join(INIT_PY);
    if !src_init.exists() {
        fs::write(&src_init, "")?;
        files.push(src_init);
    }
    for dir in [&package_dir, &core_dir] {
        let init = dir.join(INIT_PY);
        fs::write(&init, "")?;
        files.push(init);
    }
    let entry_point = package_dir.join(format!("{name}.py"));
    fs::write(&entry_point, ENTRY_POINT_SOURCE)?;
    files.push(entry_point);

    tracing::info!(package = %package_dir.display(), files = files.len(), "Scaffolded Python CLI");
    Ok(ScaffoldResult { package_dir, files })
}
