//! CLI value enums and domain type conversions.

use clap::ValueEnum;

use crate::domain::ProjectKind;

/// Project kind for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKindArg {
    /// Python command-line application
    #[value(name = "python-cli", alias = "python_cli")]
    PythonCli,
    /// Rust extension module for Python built with PyO3
    #[value(name = "pyo3-rust-extension", alias = "pyo3_rust_extension")]
    Pyo3RustExtension,
}

impl From<ProjectKindArg> for ProjectKind {
    fn from(arg: ProjectKindArg) -> Self {
        match arg {
            ProjectKindArg::PythonCli => Self::PythonCli,
            ProjectKindArg::Pyo3RustExtension => Self::Pyo3RustExtension,
        }
    }
}
