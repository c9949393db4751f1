//! Error types for the wasmwrap CLI.
//!
//! This module defines semantic error variants for the pipeline stages. Every
//! stage either completes fully or returns one of these; the orchestrator
//! performs no translation, so the first failure reaches the caller unchanged.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while packaging or injecting the bundle.
#[derive(Debug, Error)]
pub enum WrapError {
    /// An external command exited non-zero or could not be started.
    #[error("command `{command}` failed ({status}): {stderr}")]
    CommandFailed {
        /// The command line that was invoked.
        command: String,
        /// Exit status, or a description of the spawn failure.
        status: String,
        /// Captured standard error output.
        stderr: String,
    },

    /// A previous-output directory could not be removed.
    #[error("failed to remove {path}: {reason}")]
    CleanupFailed {
        /// The directory that could not be deleted.
        path: Utf8PathBuf,
        /// Description of the underlying filesystem error.
        reason: String,
    },

    /// The compiler did not produce an expected artefact file.
    #[error("expected artefact {path} was not produced by the compiler")]
    MissingArtefact {
        /// Path where the artefact was expected.
        path: Utf8PathBuf,
    },

    /// A mandatory patch rule matched nothing, so the rewrite it guarantees
    /// would silently not happen.
    #[error("patch rule `{rule}` matched nothing in {file}")]
    PatchMissed {
        /// Name of the rule that failed to match.
        rule: String,
        /// File the rule was applied to.
        file: Utf8PathBuf,
    },

    /// A patch rule's pattern could not be compiled.
    #[error("invalid patch rule `{rule}`: {reason}")]
    InvalidRule {
        /// Name of the offending rule.
        rule: String,
        /// Description of the pattern error.
        reason: String,
    },

    /// The bundler reported an error; its output is surfaced verbatim.
    #[error("bundling failed: {reason}")]
    BundleFailed {
        /// The bundler's error output.
        reason: String,
    },

    /// Copying files into the staging area failed.
    #[error("staging failed: {reason}")]
    StagingFailed {
        /// Description of the staging failure.
        reason: String,
    },

    /// The final bundle still references an input that should have been
    /// inlined or excluded.
    #[error("bundle {bundle} still references `{reference}`")]
    ResidualReference {
        /// The residual reference found in the bundle text.
        reference: String,
        /// Path to the offending bundle.
        bundle: Utf8PathBuf,
    },

    /// A git operation against the downstream tree failed.
    #[error("git {operation} failed: {message}")]
    Git {
        /// The git operation that failed (reset, clean).
        operation: &'static str,
        /// Description of the failure.
        message: String,
    },

    /// Installing the compiler tool failed.
    #[error("failed to install {tool}: {message}")]
    ToolInstall {
        /// Name of the tool that failed to install.
        tool: &'static str,
        /// Description of the installation failure.
        message: String,
    },

    /// The configuration file could not be parsed.
    #[error("invalid configuration at {path}: {reason}")]
    Config {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// Description of the parse error.
        reason: String,
    },

    /// No project identifier was supplied.
    #[error("no project name; set `project` in wasmwrap.toml or pass --project")]
    MissingProject,

    /// The inject pipeline was requested without a downstream tree.
    #[error("inject requires `tree` under [inject] in wasmwrap.toml")]
    MissingInjectTree,

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`WrapError`].
pub type Result<T> = std::result::Result<T, WrapError>;
