//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands.

use std::path::Path;

use anyhow::{Result, bail};

use super::args::{InitArgs, ProjectAddArgs, ProvisionArgs, ScaffoldArgs};
use crate::app::App;
use crate::config::BLITZ_DIR_NAME;
use crate::db::ProjectRepository;
use crate::domain::NewProject;
use crate::error::Error;
use crate::output::{self, OutputConfig, OutputMode};
use crate::provision::{ContainerPlan, HostPorts, Provisioner, SystemRunner, find_available_port};
use crate::report::SyncReport;

/// Execute the init command
pub fn execute_init(working_dir: &Path, args: &InitArgs, output_mode: OutputMode) -> Result<()> {
    use crate::commands::init;

    let quiet = args.quiet || output_mode == OutputMode::Json;
    if !quiet {
        println!(
            "Initializing blitz workspace{}...",
            args.project
                .as_ref()
                .map(|p| format!(" for project '{p}'"))
                .unwrap_or_default()
        );
    }

    let result = init::init(working_dir, args.project.as_deref())?;

    match output_mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "project": result.project,
            "config": result.config_file.display().to_string(),
            "database": result.database_file.display().to_string(),
            "issues_dir": result.issues_dir.display().to_string(),
        }))?,
        OutputMode::Text if !quiet => {
            println!("Initialized blitz in {}", result.blitz_dir.display());
            println!("  Config:   {}", result.config_file.display());
            println!("  Database: {}", result.database_file.display());
            println!("  Issues:   {}", result.issues_dir.display());
            println!("  Project:  {}", result.project);
        }
        OutputMode::Text => {}
    }

    Ok(())
}

/// Execute the sync command
///
/// The report is printed even when the run aborts, so the user sees which
/// files were handled before the failure.
pub fn execute_sync(app: &mut App, output_mode: OutputMode) -> Result<()> {
    let mut report = SyncReport::new();
    let outcome = app.sync_into(&mut report);

    output::print_sync_report(&report, outcome.as_ref().err(), output_mode, app.output())?;
    outcome?;

    let failed = report.count(crate::report::SyncAction::Error);
    if failed > 0 {
        bail!("{failed} sync step(s) failed");
    }
    Ok(())
}

/// Execute `project add`
pub fn execute_project_add(
    app: &mut App,
    args: &ProjectAddArgs,
    output_mode: OutputMode,
) -> Result<()> {
    let session = app.database_mut().session()?;

    let parent_id = match &args.parent {
        Some(name) => Some(
            session
                .get_project_by_name(name)?
                .ok_or_else(|| Error::ProjectNotFound(name.clone()))?
                .id,
        ),
        None => None,
    };

    let project = session.create_project(NewProject {
        directory_path: args.path.clone(),
        github_repo: args.repo.clone(),
        description: args.description.clone(),
        kind: args.kind.map(Into::into),
        parent_id,
        ..NewProject::named(args.name.clone())
    })?;
    session.commit()?;

    match output_mode {
        OutputMode::Json => output::print_json(&project)?,
        OutputMode::Text => {
            let config = app.output();
            println!(
                "{} project {}",
                output::success("Added", config),
                output::info(&project.name, config)
            );
        }
    }
    Ok(())
}

/// Execute `project list`
pub fn execute_project_list(app: &mut App, output_mode: OutputMode) -> Result<()> {
    let projects = app.database_mut().session()?.list_projects()?;
    output::print_projects(&projects, output_mode, app.output())?;
    Ok(())
}

/// Execute the provision command
pub fn execute_provision(app: &App, args: &ProvisionArgs, output_mode: OutputMode) -> Result<()> {
    let containers = &app.config().containers;
    let ports = HostPorts {
        postgres: match args.postgres_port {
            Some(port) => port,
            None => find_available_port(containers.postgres_port)?,
        },
        pgadmin: match args.pgadmin_port {
            Some(port) => port,
            None => find_available_port(containers.pgadmin_port)?,
        },
    };
    let plan = ContainerPlan::for_project(&app.config().project, containers, ports);

    if output_mode == OutputMode::Text {
        println!(
            "Provisioning {} (postgres on {}, pgAdmin on {})...",
            output::info(&app.config().project, app.output()),
            ports.postgres,
            ports.pgadmin
        );
    }

    let provisioner = Provisioner::new(&SystemRunner);
    let details = provisioner.provision(&plan, &app.root().join(BLITZ_DIR_NAME))?;

    if args.compose {
        provisioner.compose_build(app.root())?;
        provisioner.compose_up(app.root())?;
    }

    match output_mode {
        OutputMode::Json => output::print_json(&details)?,
        OutputMode::Text => {
            let config = app.output();
            println!("{}", output::success("Database environment ready", config));
            println!("  Host:     {}:{}", details.host, details.port);
            println!("  Database: {}", details.database);
            println!("  User:     {}", details.user);
            println!("  Password: {}", details.password);
            println!("  pgAdmin:  {}", details.pgadmin_url);
        }
    }
    Ok(())
}

/// Execute the scaffold command
pub fn execute_scaffold(
    working_dir: &Path,
    args: &ScaffoldArgs,
    output_mode: OutputMode,
    config: &OutputConfig,
) -> Result<()> {
    let project_dir = args.dir.as_deref().unwrap_or(working_dir);
    let result = crate::scaffold::scaffold_python_cli(project_dir, &args.name)?;

    match output_mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "package_dir": result.package_dir.display().to_string(),
            "files": result
                .files
                .iter()
                .map(|f| f.display().to_string())
                .collect::<Vec<_>>(),
        }))?,
        OutputMode::Text => {
            println!(
                "{} {}",
                output::success("Scaffolded", config),
                result.package_dir.display()
            );
            for file in &result.files {
                println!("  {}", file.display());
            }
        }
    }
    Ok(())
}
