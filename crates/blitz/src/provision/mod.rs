//! Docker-based database environment for a project.
//!
//! [`Provisioner`] starts a Postgres container and a pgAdmin container on a
//! shared network, points pgAdmin at the database, and reports how to
//! connect. All Docker access goes through a [`CommandRunner`].
//!
//! ## Module Structure
//!
//! - `runner` - [`CommandRunner`] and the process-backed [`SystemRunner`]
//! - `ports` - free port search and readiness polling
//! - `containers` - names and `docker` arguments for one project

mod containers;
mod ports;
mod runner;

pub use containers::{ConnectionDetails, ContainerPlan, HostPorts};
pub use ports::{PORT_SEARCH_RANGE, WaitPolicy, find_available_port, wait_for_http};
pub use runner::{CommandRunner, SystemRunner};

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Container engine executable.
pub const DOCKER: &str = "docker";

/// File name of the pgAdmin server list written before provisioning.
pub const SERVERS_FILE_NAME: &str = "servers.json";

const RUNNING: &str = "running";

/// Drives Docker through a [`CommandRunner`].
#[derive(Debug)]
pub struct Provisioner<'a, R> {
    runner: &'a R,
    wait: WaitPolicy,
}

impl<'a, R: CommandRunner> Provisioner<'a, R> {
    /// Provisioner with the default wait policy.
    pub fn new(runner: &'a R) -> Self {
        Self {
            runner,
            wait: WaitPolicy::default(),
        }
    }

    /// Replace the polling schedule used while waiting for containers.
    #[must_use]
    pub fn with_wait(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    /// Start the database environment described by `plan`.
    ///
    /// `state_dir` receives the pgAdmin `servers.json` that gets mounted
    /// into the pgAdmin container, so it must be an absolute path.
    ///
    /// # Errors
    ///
    /// Returns the first failing Docker command, or [`Error::Timeout`] if a
    /// container never reaches the running state or pgAdmin never answers
    /// `200 OK` on its port.
    pub fn provision(&self, plan: &ContainerPlan, state_dir: &Path) -> Result<ConnectionDetails> {
        let servers_file = state_dir.join(SERVERS_FILE_NAME);
        let servers = serde_json::to_string_pretty(&plan.servers_json())
            .map_err(|e| Error::Internal(format!("cannot encode {SERVERS_FILE_NAME}: {e}")))?;
        fs::create_dir_all(state_dir)?;
        fs::write(&servers_file, servers)?;

        tracing::info!(network = %plan.network, "Creating network");
        self.docker(&plan.network_args())?;

        tracing::info!(container = %plan.postgres_container, "Starting Postgres");
        self.docker(&plan.postgres_args())?;

        tracing::info!(container = %plan.pgadmin_container, "Starting pgAdmin");
        self.docker(&plan.pgadmin_args(&servers_file))?;

        self.wait_until_running(&plan.postgres_container)?;
        self.wait_until_running(&plan.pgadmin_container)?;

        tracing::info!(port = plan.ports.pgadmin, "Waiting for pgAdmin");
        wait_for_http(plan.ports.pgadmin, &self.wait)?;

        self.docker(&plan.pgpass_args())?;

        Ok(plan.connection_details())
    }

    /// Poll `docker inspect` until `container` reports `running`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] when the wait policy is exhausted.
    pub fn wait_until_running(&self, container: &str) -> Result<()> {
        self.wait.poll(&format!("container {container}"), || {
            // inspect fails while the container is still being created
            let state = match self.docker(&ContainerPlan::inspect_args(container)) {
                Ok(state) => state,
                Err(Error::Command { stderr, .. }) => {
                    tracing::debug!(container, %stderr, "Container not inspectable yet");
                    return Ok(false);
                }
                Err(e) => return Err(e),
            };
            Ok(state.trim_matches(|c| c == '"' || c == '\'') == RUNNING)
        })
    }

    /// `docker compose build` for the compose file in `dir`.
    ///
    /// # Errors
    ///
    /// Returns the Docker failure.
    pub fn compose_build(&self, dir: &Path) -> Result<()> {
        tracing::info!(dir = %dir.display(), "Building compose services");
        self.compose(dir, &["build"])
    }

    /// `docker compose up -d` for the compose file in `dir`.
    ///
    /// # Errors
    ///
    /// Returns the Docker failure.
    pub fn compose_up(&self, dir: &Path) -> Result<()> {
        tracing::info!(dir = %dir.display(), "Starting compose services");
        self.compose(dir, &["up", "-d"])
    }

    fn compose(&self, dir: &Path, command: &[&str]) -> Result<()> {
        let mut args = vec![
            "compose".to_string(),
            "--project-directory".to_string(),
            dir.display().to_string(),
        ];
        args.extend(command.iter().map(ToString::to_string));
        self.docker(&args).map(|_| ())
    }

    fn docker(&self, args: &[String]) -> Result<String> {
        self.runner.run(DOCKER, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContainerConfig;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Records every invocation and answers `inspect` from a script.
    #[derive(Default)]
    struct RecordingRunner {
        calls: RefCell<Vec<Vec<String>>>,
        inspect_answers: RefCell<VecDeque<Result<String>>>,
        fail_on: Option<&'static str>,
    }

    impl RecordingRunner {
        fn answering(answers: Vec<Result<String>>) -> Self {
            Self {
                inspect_answers: RefCell::new(answers.into()),
                ..Self::default()
            }
        }

        fn subcommands(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|c| c[0].clone()).collect()
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, program: &str, args: &[String]) -> Result<String> {
            assert_eq!(program, DOCKER);
            self.calls.borrow_mut().push(args.to_vec());

            if self.fail_on == Some(args[0].as_str()) {
                return Err(Error::Command {
                    program: program.to_string(),
                    status: "exit status: 1".to_string(),
                    stderr: "simulated".to_string(),
                });
            }
            if args[0] == "inspect" {
                return self
                    .inspect_answers
                    .borrow_mut()
                    .pop_front()
                    .unwrap_or_else(|| Ok(RUNNING.to_string()));
            }
            Ok(String::new())
        }
    }

    fn quick() -> WaitPolicy {
        WaitPolicy {
            attempts: 5,
            interval: Duration::ZERO,
        }
    }

    fn plan_with_pgadmin_port(port: u16) -> ContainerPlan {
        ContainerPlan::for_project(
            "demo",
            &ContainerConfig::default(),
            HostPorts {
                postgres: 5432,
                pgadmin: port,
            },
        )
    }

    #[test]
    fn provision_runs_steps_in_order() {
        let (pgadmin_port, _) = super::ports::testing::serve_statuses(&[200]);
        let plan = plan_with_pgadmin_port(pgadmin_port);
        let state = TempDir::new().unwrap();
        let runner = RecordingRunner::default();

        let details = Provisioner::new(&runner)
            .with_wait(quick())
            .provision(&plan, state.path())
            .unwrap();

        assert_eq!(
            runner.subcommands(),
            vec!["network", "run", "run", "inspect", "inspect", "exec"]
        );
        assert_eq!(details.user, "demo-db-user");

        let servers: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(state.path().join(SERVERS_FILE_NAME)).unwrap(),
        )
        .unwrap();
        assert_eq!(servers["Servers"]["1"]["Host"], "demo-postgres");
    }

    #[test]
    fn provision_stops_at_failing_command() {
        let state = TempDir::new().unwrap();
        let runner = RecordingRunner {
            fail_on: Some("run"),
            ..RecordingRunner::default()
        };

        let err = Provisioner::new(&runner)
            .with_wait(quick())
            .provision(&plan_with_pgadmin_port(5050), state.path())
            .unwrap_err();

        assert!(matches!(err, Error::Command { .. }));
        assert_eq!(runner.subcommands(), vec!["network", "run"]);
    }

    #[test]
    fn waits_through_created_state() {
        let runner = RecordingRunner::answering(vec![
            Err(Error::Command {
                program: DOCKER.to_string(),
                status: "exit status: 1".to_string(),
                stderr: "No such object".to_string(),
            }),
            Ok("created".to_string()),
            Ok("\"running\"".to_string()),
        ]);

        Provisioner::new(&runner)
            .with_wait(quick())
            .wait_until_running("demo-postgres")
            .unwrap();

        assert_eq!(runner.calls.borrow().len(), 3);
    }

    #[test]
    fn container_that_never_runs_times_out() {
        let runner = RecordingRunner::answering((0..5).map(|_| Ok("exited".to_string())).collect());

        let err = Provisioner::new(&runner)
            .with_wait(quick())
            .wait_until_running("demo-postgres")
            .unwrap_err();

        assert!(matches!(err, Error::Timeout(_)));
    }

    #[test]
    fn compose_targets_directory() {
        let runner = RecordingRunner::default();
        let provisioner = Provisioner::new(&runner);

        provisioner.compose_build(Path::new("/work/ws")).unwrap();
        provisioner.compose_up(Path::new("/work/ws")).unwrap();

        let calls = runner.calls.borrow();
        assert_eq!(calls[0], ["compose", "--project-directory", "/work/ws", "build"]);
        assert_eq!(calls[1], ["compose", "--project-directory", "/work/ws", "up", "-d"]);
    }
}
