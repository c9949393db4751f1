//! Removal of previous pipeline outputs.
//!
//! Deleting an absent directory is not an error; any other delete failure
//! aborts the pipeline. There is no partial-delete recovery.

use crate::error::{Result, WrapError};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::io::ErrorKind;

/// Recursively deletes each of the given directories.
///
/// # Errors
///
/// Returns [`WrapError::CleanupFailed`] for the first directory that exists
/// but cannot be removed.
pub fn remove_dirs(paths: &[Utf8PathBuf]) -> Result<()> {
    for path in paths {
        remove_dir(path)?;
    }
    Ok(())
}

/// Recursively deletes one directory, treating absence as success.
///
/// # Errors
///
/// Returns [`WrapError::CleanupFailed`] on any error other than the
/// directory not existing.
pub fn remove_dir(path: &Utf8Path) -> Result<()> {
    debug!("removing {path}");
    match std::fs::remove_dir_all(path.as_std_path()) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(WrapError::CleanupFailed {
            path: path.to_owned(),
            reason: e.to_string(),
        }),
    }
}
