//! CLI argument definitions for the wasm packager.
//!
//! This module defines the command-line interface using clap. It is
//! separated from the main entrypoint to keep the binary small and focused
//! on orchestration.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Package a wasm project into a single self-contained script.
#[derive(Parser, Debug)]
#[command(name = "wasmwrap")]
#[command(version, about)]
#[command(long_about = concat!(
    "Package a wasm project into a single self-contained script.\n\n",
    "wasmwrap drives wasm-pack, inlines the binary payload into the ",
    "generated glue as a base64 literal, bundles the result into one ",
    "dependency-free file, and can deliver it into a downstream source ",
    "tree.\n\n",
    "Settings come from wasmwrap.toml at the project root; every flag ",
    "below overrides its counterpart there.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Build the bundle for the project named in wasmwrap.toml:\n",
    "    $ wasmwrap build\n\n",
    "  Build a specific project without a config file:\n",
    "    $ wasmwrap --project foo-bar build\n\n",
    "  Deliver the bundle into the configured downstream tree:\n",
    "    $ wasmwrap inject\n\n",
    "  Remove every directory the pipeline owns:\n",
    "    $ wasmwrap clean\n",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file, relative to the project root.
    #[arg(short, long, value_name = "FILE", default_value = "wasmwrap.toml")]
    pub config: Utf8PathBuf,

    /// Project identifier (overrides the config file).
    #[arg(short, long, value_name = "NAME")]
    pub project: Option<String>,

    /// Project root directory.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub root: Utf8PathBuf,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Remove the compiler output, staging, and distribution directories.
    Clean,

    /// Compile the project and produce the self-contained bundle.
    Build,

    /// Build, then deliver the bundle into the downstream source tree.
    Inject,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
