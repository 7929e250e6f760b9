//! Running external programs.

use std::process::Command;

use crate::error::{Error, Result};

/// Runs an external program to completion.
pub trait CommandRunner {
    /// Run `program` with `args` and return its trimmed standard output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Command`] if the program cannot be started or exits
    /// unsuccessfully.
    fn run(&self, program: &str, args: &[String]) -> Result<String>;
}

/// [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String> {
        tracing::debug!(program, ?args, "Running command");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| Error::Command {
                program: program.to_string(),
                status: "failed to start".to_string(),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::Command {
                program: program.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
