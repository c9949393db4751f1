//! Delivery of the bundle into the downstream source tree.
//!
//! The downstream tree is externally owned; this module only ever resets it
//! to its last committed state, overwrites one known file with the
//! rewrapped bundle, and overlays the replacement-file directory onto the
//! tree root. The reset always precedes the overlay, so replacement files
//! are never wiped.

use crate::error::{Result, WrapError};
use crate::exec::CommandExecutor;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fs;
use walkdir::WalkDir;

/// Where and how the bundle is delivered.
#[derive(Debug, Clone)]
pub struct InjectTarget {
    /// Root of the downstream version-controlled tree.
    pub tree: Utf8PathBuf,
    /// Subdirectory of the tree (relative) receiving the rewrapped bundle.
    pub subdir: Utf8PathBuf,
    /// Directory whose contents are overlaid onto the tree root.
    pub overlay_dir: Utf8PathBuf,
    /// Analysis-suppression header lines prepended during rewrap.
    pub headers: Vec<String>,
    /// Extension given to the rewrapped artefact (without the dot).
    pub extension: String,
}

/// Path of the rewrapped twin for a given bundle.
#[must_use]
pub fn rewrapped_path(bundle: &Utf8Path, target: &InjectTarget) -> Utf8PathBuf {
    bundle.with_extension(target.extension.as_str())
}

/// Copies the bundle, prepends the suppression headers, and renames the
/// extension to the downstream tree's source language.
///
/// # Errors
///
/// Propagates I/O errors.
pub fn rewrap(bundle: &Utf8Path, target: &InjectTarget) -> Result<Utf8PathBuf> {
    let text = fs::read_to_string(bundle.as_std_path())?;
    let dest = rewrapped_path(bundle, target);

    let mut contents = String::with_capacity(text.len() + 64);
    for header in &target.headers {
        contents.push_str(header);
        contents.push('\n');
    }
    contents.push_str(&text);

    fs::write(dest.as_std_path(), contents)?;
    debug!("rewrapped {bundle} as {dest}");
    Ok(dest)
}

/// Hard-resets the downstream tree to its last committed state and removes
/// untracked files. Both operations are no-ops on an already-clean tree.
///
/// # Errors
///
/// Returns [`WrapError::Git`] when either git command fails.
pub fn reset_tree(executor: &dyn CommandExecutor, tree: &Utf8Path) -> Result<()> {
    run_git(executor, tree, "reset", &["reset", "--hard"])?;
    run_git(executor, tree, "clean", &["clean", "-fd"])?;
    Ok(())
}

fn run_git(
    executor: &dyn CommandExecutor,
    tree: &Utf8Path,
    operation: &'static str,
    args: &[&str],
) -> Result<()> {
    let output = executor
        .run("git", args, Some(tree))
        .map_err(|e| WrapError::Git {
            operation,
            message: e.to_string(),
        })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(WrapError::Git {
            operation,
            message: stderr.trim().to_owned(),
        });
    }
    Ok(())
}

/// Copies the rewrapped artefact into the tree's target subdirectory,
/// overwriting any existing file at that path.
///
/// # Errors
///
/// Propagates I/O errors; fails when the artefact path has no filename.
pub fn deliver(rewrapped: &Utf8Path, target: &InjectTarget) -> Result<Utf8PathBuf> {
    let file_name = rewrapped
        .file_name()
        .ok_or_else(|| WrapError::StagingFailed {
            reason: format!("{rewrapped} has no filename"),
        })?;
    let dest_dir = target.tree.join(&target.subdir);
    fs::create_dir_all(dest_dir.as_std_path())?;
    let dest = dest_dir.join(file_name);
    fs::copy(rewrapped.as_std_path(), dest.as_std_path())?;
    debug!("delivered {rewrapped} to {dest}");
    Ok(dest)
}

/// Overlays the replacement directory's entire contents onto the tree root,
/// overwriting files at matching relative paths. An absent replacement
/// directory is an empty overlay.
///
/// # Errors
///
/// Returns [`WrapError::StagingFailed`] when the overlay tree cannot be
/// walked or a file cannot be copied.
pub fn overlay(target: &InjectTarget) -> Result<Vec<Utf8PathBuf>> {
    if !target.overlay_dir.exists() {
        debug!("no replacement directory at {}", target.overlay_dir);
        return Ok(Vec::new());
    }

    let mut written = Vec::new();
    for entry in WalkDir::new(target.overlay_dir.as_std_path()) {
        let entry = entry.map_err(|e| WrapError::StagingFailed {
            reason: format!("failed to walk {}: {e}", target.overlay_dir),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = Utf8Path::from_path(entry.path()).ok_or_else(|| WrapError::StagingFailed {
            reason: format!("non-UTF-8 path under {}", target.overlay_dir),
        })?;
        let relative = path
            .strip_prefix(&target.overlay_dir)
            .map_err(|e| WrapError::StagingFailed {
                reason: format!("{path} is outside {}: {e}", target.overlay_dir),
            })?;
        let dest = target.tree.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent.as_std_path())?;
        }
        fs::copy(path.as_std_path(), dest.as_std_path()).map_err(|e| {
            WrapError::StagingFailed {
                reason: format!("failed to copy {path} to {dest}: {e}"),
            }
        })?;
        debug!("overlaid {relative}");
        written.push(dest);
    }
    Ok(written)
}
