//! External command execution.
//!
//! The pipeline shells out for compiling, installing the compiler tool,
//! bundling, and resetting the downstream tree. All invocations go through
//! the [`CommandExecutor`] trait so tests can substitute a stub.

use crate::error::{Result, WrapError};
use camino::Utf8Path;
use log::debug;
use std::process::{Command, Output};

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs a command with arguments, optionally scoped to a working
    /// directory, waits for completion, and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns [`WrapError::CommandFailed`] when the process cannot be
    /// started. A non-zero exit is not an error at this level; callers
    /// inspect the returned status.
    fn run(&self, cmd: &str, args: &[&str], cwd: Option<&Utf8Path>) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str], cwd: Option<&Utf8Path>) -> Result<Output> {
        debug!("running {}", render_command(cmd, args));
        let mut command = Command::new(cmd);
        command.args(args);
        if let Some(dir) = cwd {
            command.current_dir(dir.as_std_path());
        }
        command.output().map_err(|e| WrapError::CommandFailed {
            command: render_command(cmd, args),
            status: "failed to start".to_owned(),
            stderr: e.to_string(),
        })
    }
}

/// Runs a command and maps a non-zero exit to [`WrapError::CommandFailed`],
/// carrying the command line, exit status, and captured stderr.
///
/// # Errors
///
/// Returns [`WrapError::CommandFailed`] on spawn failure or non-zero exit.
pub fn run_checked(
    executor: &dyn CommandExecutor,
    cmd: &str,
    args: &[&str],
    cwd: Option<&Utf8Path>,
) -> Result<String> {
    let output = executor.run(cmd, args, cwd)?;
    if !output.status.success() {
        return Err(WrapError::CommandFailed {
            command: render_command(cmd, args),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Returns true when the command runs and exits successfully.
pub fn command_succeeds(executor: &dyn CommandExecutor, cmd: &str, args: &[&str]) -> bool {
    executor
        .run(cmd, args, None)
        .is_ok_and(|output| output.status.success())
}

fn render_command(cmd: &str, args: &[&str]) -> String {
    if args.is_empty() {
        cmd.to_owned()
    } else {
        format!("{cmd} {}", args.join(" "))
    }
}
