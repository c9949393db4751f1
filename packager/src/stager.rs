//! Copying of the unprocessed compiler output into the staging area.
//!
//! The inliner and patcher write their transformed artefacts into staging
//! directly; this stage copies everything else (manifest, type
//! declarations, auxiliary files), preserving nested paths. Exclusion is by
//! exact filename match against the artefact set, so no file is written
//! twice and nothing else is dropped.

use crate::error::{Result, WrapError};
use crate::project::ArtifactSet;
use camino::{Utf8Path, Utf8PathBuf};
use log::trace;
use std::fs;
use walkdir::WalkDir;

/// Copies every file under `wasm_dir` into `staging_dir` except the three
/// artefact files. Returns the destination paths written.
///
/// # Errors
///
/// Returns [`WrapError::StagingFailed`] when the tree cannot be walked or a
/// file cannot be copied.
pub fn stage_remainder(
    artefacts: &ArtifactSet,
    wasm_dir: &Utf8Path,
    staging_dir: &Utf8Path,
) -> Result<Vec<Utf8PathBuf>> {
    fs::create_dir_all(staging_dir.as_std_path())?;
    let excluded = artefacts.names();
    let mut copied = Vec::new();

    for entry in WalkDir::new(wasm_dir.as_std_path()) {
        let entry = entry.map_err(|e| WrapError::StagingFailed {
            reason: format!("failed to walk {wasm_dir}: {e}"),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = Utf8Path::from_path(entry.path()).ok_or_else(|| WrapError::StagingFailed {
            reason: format!("non-UTF-8 path under {wasm_dir}"),
        })?;
        let file_name = path.file_name().unwrap_or_default();
        if excluded.contains(&file_name) {
            continue;
        }

        let relative = path
            .strip_prefix(wasm_dir)
            .map_err(|e| WrapError::StagingFailed {
                reason: format!("{path} is outside {wasm_dir}: {e}"),
            })?;
        let dest = staging_dir.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent.as_std_path())?;
        }
        fs::copy(path.as_std_path(), dest.as_std_path()).map_err(|e| {
            WrapError::StagingFailed {
                reason: format!("failed to copy {path} to {dest}: {e}"),
            }
        })?;
        trace!("staged {relative}");
        copied.push(dest);
    }

    Ok(copied)
}
