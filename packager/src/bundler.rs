//! Bundling of the staged tree into one self-contained script.
//!
//! The bundler is an external transform: entry file in, single script out.
//! It is behind a trait so tests can substitute a stub; the production
//! implementation shells out to esbuild.

use crate::error::{Result, WrapError};
use crate::exec::CommandExecutor;
use camino::Utf8PathBuf;
use log::debug;

/// Configuration handed to the bundler.
#[derive(Debug, Clone)]
pub struct BundleConfig {
    /// Entry file inside the staging directory.
    pub entry: Utf8PathBuf,
    /// Output path for the bundled script.
    pub outfile: Utf8PathBuf,
    /// Global binding name the bundle exports, in variable style so the
    /// result loads as a plain script.
    pub global_name: String,
    /// Whether to minify. Comments explicitly marked for retention survive.
    pub minify: bool,
}

/// External transform that packages an entry file into one script.
pub trait Bundler {
    /// Produces the bundle described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`WrapError::BundleFailed`] carrying the bundler's error
    /// output verbatim.
    fn bundle(&self, config: &BundleConfig) -> Result<()>;
}

/// Bundles with esbuild, invoked through `npx`.
pub struct EsbuildBundler<'a> {
    executor: &'a dyn CommandExecutor,
}

impl<'a> EsbuildBundler<'a> {
    /// Creates a bundler that shells out through the given executor.
    #[must_use]
    pub fn new(executor: &'a dyn CommandExecutor) -> Self {
        Self { executor }
    }
}

impl Bundler for EsbuildBundler<'_> {
    fn bundle(&self, config: &BundleConfig) -> Result<()> {
        if let Some(parent) = config.outfile.parent() {
            std::fs::create_dir_all(parent.as_std_path())?;
        }

        let global_name = format!("--global-name={}", config.global_name);
        let outfile = format!("--outfile={}", config.outfile);
        let mut args = vec![
            "esbuild",
            config.entry.as_str(),
            "--bundle",
            "--format=iife",
            global_name.as_str(),
            outfile.as_str(),
        ];
        if config.minify {
            args.push("--minify");
            args.push("--legal-comments=inline");
        }

        debug!("bundling {} into {}", config.entry, config.outfile);
        let output = self
            .executor
            .run("npx", &args, None)
            .map_err(|e| WrapError::BundleFailed {
                reason: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(WrapError::BundleFailed {
                reason: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        Ok(())
    }
}
