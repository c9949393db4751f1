//! Project identity, derived artefact names, and the working-directory layout.
//!
//! Every filename the pipeline touches derives from a single configured
//! project identifier. The [`ArtifactSet`] is computed once and passed to
//! each stage as an explicit value, so no stage re-derives names from shared
//! state.

use crate::error::{Result, WrapError};
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;

/// The configured name of the wasm project (may contain hyphens).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    /// Creates a project name, rejecting the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`WrapError::MissingProject`] when `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(WrapError::MissingProject);
        }
        Ok(Self(name))
    }

    /// Returns the name as configured.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the identifier used in generated filenames: hyphens become
    /// underscores, matching the compiler's own naming convention.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.replace('-', "_")
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three files `wasm-pack` produces for a project: the main glue script,
/// the binary-loading glue script, and the wasm payload itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    /// The primary glue script, `<id>.js`.
    pub main_script: String,
    /// The secondary glue script that loads the payload, `<id>_bg.js`.
    pub loader_script: String,
    /// The compiled wasm payload, `<id>_bg.wasm`.
    pub payload: String,
}

impl ArtifactSet {
    /// Derives the artefact filenames for a project.
    #[must_use]
    pub fn for_project(name: &ProjectName) -> Self {
        let id = name.normalized();
        Self {
            main_script: format!("{id}.js"),
            loader_script: format!("{id}_bg.js"),
            payload: format!("{id}_bg.wasm"),
        }
    }

    /// Returns the three filenames.
    #[must_use]
    pub fn names(&self) -> [&str; 3] {
        [&self.main_script, &self.loader_script, &self.payload]
    }

    /// Verifies all three artefacts exist under `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`WrapError::MissingArtefact`] for the first missing file.
    pub fn verify_present(&self, dir: &Utf8Path) -> Result<()> {
        for name in self.names() {
            let path = dir.join(name);
            if !path.is_file() {
                return Err(WrapError::MissingArtefact { path });
            }
        }
        Ok(())
    }
}

/// Working directories used by the pipeline, resolved against a project root:
/// raw compiler output, the staging area, and the distribution directory.
#[derive(Debug, Clone)]
pub struct Layout {
    root: Utf8PathBuf,
    wasm: String,
    staging: String,
    dist: String,
}

impl Layout {
    /// Creates a layout with the default directory names.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self::with_dirs(root, "wasm", "tmp", "dist")
    }

    /// Creates a layout with explicit directory names.
    #[must_use]
    pub fn with_dirs(
        root: impl Into<Utf8PathBuf>,
        wasm: impl Into<String>,
        staging: impl Into<String>,
        dist: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            wasm: wasm.into(),
            staging: staging.into(),
            dist: dist.into(),
        }
    }

    /// The project root everything else resolves against.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Directory populated by the compiler (ephemeral).
    #[must_use]
    pub fn wasm_dir(&self) -> Utf8PathBuf {
        self.root.join(&self.wasm)
    }

    /// The compiler output directory name, as passed to the compiler.
    #[must_use]
    pub fn wasm_dir_name(&self) -> &str {
        &self.wasm
    }

    /// Scratch directory holding the transformed output tree (ephemeral).
    #[must_use]
    pub fn staging_dir(&self) -> Utf8PathBuf {
        self.root.join(&self.staging)
    }

    /// Directory receiving the final bundle and its rewrapped twin.
    #[must_use]
    pub fn dist_dir(&self) -> Utf8PathBuf {
        self.root.join(&self.dist)
    }

    /// All directories owned by the pipeline, in clean order.
    #[must_use]
    pub fn owned_dirs(&self) -> [Utf8PathBuf; 3] {
        [self.wasm_dir(), self.staging_dir(), self.dist_dir()]
    }
}
