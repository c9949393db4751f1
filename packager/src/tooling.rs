//! Compiler tool availability and invocation.
//!
//! The wasm compiler is an opaque external process. This module checks that
//! it is installed, installs it on demand, and invokes it to populate the
//! raw output directory.

use crate::error::{Result, WrapError};
use crate::exec::{CommandExecutor, command_succeeds, run_checked};
use crate::project::Layout;
use log::debug;

/// The compiler tool command.
pub const WASM_PACK: &str = "wasm-pack";

/// The compiler's target environment.
const COMPILE_TARGET: &str = "nodejs";

/// Checks whether the compiler tool answers its version query.
pub fn is_wasm_pack_installed(executor: &dyn CommandExecutor) -> bool {
    command_succeeds(executor, WASM_PACK, &["--version"])
}

/// Ensures the compiler tool is available, installing it when the version
/// query fails. The pipeline resumes only if the install itself succeeds.
///
/// # Errors
///
/// Returns [`WrapError::ToolInstall`] when the install command fails.
pub fn ensure_wasm_pack(executor: &dyn CommandExecutor) -> Result<()> {
    if is_wasm_pack_installed(executor) {
        return Ok(());
    }

    debug!("{WASM_PACK} not found, installing");
    let output = executor
        .run("cargo", &["install", WASM_PACK], None)
        .map_err(|e| WrapError::ToolInstall {
            tool: WASM_PACK,
            message: e.to_string(),
        })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(WrapError::ToolInstall {
            tool: WASM_PACK,
            message: stderr.trim().to_owned(),
        });
    }
    Ok(())
}

/// Invokes the compiler, populating the layout's raw output directory with
/// the artefact set plus auxiliary files.
///
/// # Errors
///
/// Returns [`WrapError::CommandFailed`] when the compiler exits non-zero.
pub fn compile(executor: &dyn CommandExecutor, layout: &Layout) -> Result<()> {
    // The out-dir argument is interpreted by the compiler relative to the
    // project root, which is also the working directory here.
    run_checked(
        executor,
        WASM_PACK,
        &[
            "build",
            "--target",
            COMPILE_TARGET,
            "--out-dir",
            layout.wasm_dir_name(),
        ],
        Some(layout.root()),
    )?;
    Ok(())
}
