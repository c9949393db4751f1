//! Configuration file loading.
//!
//! Settings come from an optional `wasmwrap.toml` at the project root. An
//! absent file yields the defaults; a present but malformed file is an
//! error rather than a silent fallback.

use crate::error::{Result, WrapError};
use camino::Utf8Path;
use serde::Deserialize;

/// Contents of `wasmwrap.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project identifier all artefact names derive from.
    pub project: Option<String>,

    /// Working-directory overrides.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Bundler settings.
    #[serde(default)]
    pub bundle: BundleConfigSection,

    /// Injection settings.
    #[serde(default)]
    pub inject: InjectConfigSection,

    /// Additional patch rules applied to the main glue script, after the
    /// built-in one.
    #[serde(default)]
    pub patch: Vec<PatchRuleConfig>,
}

/// The `[layout]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    /// Compiler output directory name.
    #[serde(default = "default_wasm_dir")]
    pub wasm_dir: String,
    /// Staging directory name.
    #[serde(default = "default_staging_dir")]
    pub staging_dir: String,
    /// Distribution directory name.
    #[serde(default = "default_dist_dir")]
    pub dist_dir: String,
}

/// The `[bundle]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleConfigSection {
    /// Global binding name the bundle exports.
    #[serde(default = "default_global_name")]
    pub global_name: String,
    /// Filename of the bundle inside the distribution directory.
    #[serde(default = "default_bundle_file")]
    pub file_name: String,
    /// Whether the bundler minifies its output.
    #[serde(default = "default_minify")]
    pub minify: bool,
}

/// The `[inject]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InjectConfigSection {
    /// Path to the downstream tree, relative to the project root.
    pub tree: Option<String>,
    /// Subdirectory of the tree receiving the rewrapped bundle.
    #[serde(default = "default_subdir")]
    pub subdir: String,
    /// Replacement-file directory, relative to the project root.
    #[serde(default = "default_overlay_dir")]
    pub overlay_dir: String,
    /// Header lines prepended to the rewrapped bundle.
    #[serde(default = "default_headers")]
    pub headers: Vec<String>,
    /// Extension of the rewrapped artefact (without the dot).
    #[serde(default = "default_extension")]
    pub extension: String,
}

/// One user-supplied patch rule.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchRuleConfig {
    /// Rule name, used in diagnostics.
    pub name: String,
    /// Regular expression to match.
    pub pattern: String,
    /// Literal replacement text.
    pub replacement: String,
    /// Whether a zero-match application fails the stage.
    #[serde(default)]
    pub mandatory: bool,
}

fn default_wasm_dir() -> String {
    "wasm".to_owned()
}

fn default_staging_dir() -> String {
    "tmp".to_owned()
}

fn default_dist_dir() -> String {
    "dist".to_owned()
}

fn default_global_name() -> String {
    "wasm".to_owned()
}

fn default_bundle_file() -> String {
    "wasm.js".to_owned()
}

fn default_minify() -> bool {
    true
}

fn default_subdir() -> String {
    "src/wasm".to_owned()
}

fn default_overlay_dir() -> String {
    "replacement".to_owned()
}

fn default_headers() -> Vec<String> {
    vec!["/* eslint-disable */".to_owned(), "// @ts-nocheck".to_owned()]
}

fn default_extension() -> String {
    "ts".to_owned()
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            wasm_dir: default_wasm_dir(),
            staging_dir: default_staging_dir(),
            dist_dir: default_dist_dir(),
        }
    }
}

impl Default for BundleConfigSection {
    fn default() -> Self {
        Self {
            global_name: default_global_name(),
            file_name: default_bundle_file(),
            minify: default_minify(),
        }
    }
}

impl Default for InjectConfigSection {
    fn default() -> Self {
        Self {
            tree: None,
            subdir: default_subdir(),
            overlay_dir: default_overlay_dir(),
            headers: default_headers(),
            extension: default_extension(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, returning the defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`WrapError::Config`] when the file exists but cannot be
    /// parsed, or an I/O error when it cannot be read.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path.as_std_path())?;
        toml::from_str(&contents).map_err(|e| WrapError::Config {
            path: path.to_owned(),
            reason: e.to_string(),
        })
    }
}
