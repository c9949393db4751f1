//! wasmwrap library.
//!
//! This crate packages a `wasm-pack` project into a single self-contained
//! script and optionally delivers it into a downstream source tree. It is
//! used by the `wasmwrap` CLI binary and can be consumed programmatically
//! for testing or custom packaging workflows.
//!
//! # Modules
//!
//! - [`bundler`] - External bundler invocation behind a trait seam
//! - [`cleaner`] - Idempotent removal of pipeline-owned directories
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - `wasmwrap.toml` loading and defaults
//! - [`error`] - Semantic error types for every failure mode
//! - [`exec`] - External command execution abstraction
//! - [`injector`] - Delivery of the bundle into the downstream tree
//! - [`inliner`] - Base64 inlining of the wasm payload into the glue
//! - [`patcher`] - Regex-rule patching of the generated glue scripts
//! - [`pipeline`] - Step model and the named pipeline compositions
//! - [`project`] - Project identity, artefact names, and directory layout
//! - [`stager`] - Verbatim staging of untouched compiler outputs
//! - [`tooling`] - Compiler tool detection, installation, and invocation
//! - [`verify`] - Post-bundle residual-reference checks

pub mod bundler;
pub mod cleaner;
pub mod cli;
pub mod config;
pub mod error;
pub mod exec;
pub mod injector;
pub mod inliner;
pub mod patcher;
pub mod pipeline;
pub mod project;
pub mod stager;
pub mod tooling;
pub mod verify;

#[cfg(test)]
pub mod test_utils;
