//! Shared test utilities for the packager crate.

use crate::bundler::{BundleConfig, Bundler};
use crate::error::{Result, WrapError};
use crate::exec::CommandExecutor;
use camino::Utf8Path;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with empty stdout and stderr.
pub fn success_output() -> Output {
    Output {
        status: exit_status(0),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The command to execute (e.g., "wasm-pack").
    pub cmd: &'static str,
    /// The arguments to pass to the command.
    pub args: Vec<&'static str>,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
}

#[derive(Debug)]
enum Expectation {
    Exact(ExpectedCall),
    Command {
        cmd: &'static str,
        result: Result<Output>,
    },
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Records command invocations and returns predefined results, allowing
/// tests to verify command execution without side effects.
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<Expectation>>,
    recorded: RefCell<Vec<(String, Vec<String>)>>,
}

impl StubExecutor {
    /// Creates a stub that asserts each invocation's command and arguments.
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into_iter().map(Expectation::Exact).collect()),
            recorded: RefCell::new(Vec::new()),
        }
    }

    /// Creates a stub that only asserts the command name, leaving argument
    /// checks to the test via [`Self::recorded_calls`].
    pub fn loose(expected: Vec<(&'static str, Result<Output>)>) -> Self {
        Self {
            expected: RefCell::new(
                expected
                    .into_iter()
                    .map(|(cmd, result)| Expectation::Command { cmd, result })
                    .collect(),
            ),
            recorded: RefCell::new(Vec::new()),
        }
    }

    /// Returns every `(command, arguments)` pair seen so far.
    pub fn recorded_calls(&self) -> Vec<(String, Vec<String>)> {
        self.recorded.borrow().clone()
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        assert!(
            self.expected.borrow().is_empty(),
            "expected no further command invocations"
        );
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, cmd: &str, args: &[&str], _cwd: Option<&Utf8Path>) -> Result<Output> {
        self.recorded.borrow_mut().push((
            cmd.to_owned(),
            args.iter().map(|&a| a.to_owned()).collect(),
        ));

        let expectation = self
            .expected
            .borrow_mut()
            .pop_front()
            .expect("unexpected command invocation");

        match expectation {
            Expectation::Exact(call) => {
                assert_eq!(call.cmd, cmd);
                assert_eq!(call.args.as_slice(), args);
                call.result
            }
            Expectation::Command { cmd: expected, result } => {
                assert_eq!(expected, cmd);
                result
            }
        }
    }
}

/// A naive in-process bundler for tests: concatenates the entry file and
/// every other `.js` file in the staging directory, in sorted order, into
/// the configured output file.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubBundler;

impl Bundler for StubBundler {
    fn bundle(&self, config: &BundleConfig) -> Result<()> {
        let staging = config.entry.parent().ok_or_else(|| WrapError::BundleFailed {
            reason: format!("entry {} has no parent directory", config.entry),
        })?;

        let mut bundle = format!("var {} = (() => {{\n", config.global_name);
        bundle.push_str(&std::fs::read_to_string(config.entry.as_std_path())?);

        let mut others: Vec<_> = std::fs::read_dir(staging.as_std_path())?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension().is_some_and(|ext| ext == "js")
                    && path != config.entry.as_std_path()
            })
            .collect();
        others.sort();
        for path in others {
            bundle.push('\n');
            bundle.push_str(&std::fs::read_to_string(&path)?);
        }
        bundle.push_str("\n})();\n");

        if let Some(parent) = config.outfile.parent() {
            std::fs::create_dir_all(parent.as_std_path())?;
        }
        std::fs::write(config.outfile.as_std_path(), bundle)?;
        Ok(())
    }
}
