//! Pipeline step model and the named pipeline compositions.
//!
//! A pipeline is an explicit list of named, fallible steps executed
//! strictly in order. The runner announces each step, halts on the first
//! error, and propagates it unchanged; there is no rollback, so a failing
//! run leaves partially written directories as-is.

use crate::bundler::{BundleConfig, Bundler};
use crate::cleaner;
use crate::error::Result;
use crate::exec::CommandExecutor;
use crate::injector::{self, InjectTarget};
use crate::inliner;
use crate::patcher::{self, PatchRule};
use crate::project::{ArtifactSet, Layout};
use crate::stager;
use crate::tooling;
use crate::verify;
use std::io::Write;

/// One named, fallible pipeline stage.
pub struct Step<'a> {
    name: &'static str,
    action: Box<dyn FnOnce() -> Result<()> + 'a>,
}

impl<'a> Step<'a> {
    /// Creates a step from a name and an action.
    pub fn new(name: &'static str, action: impl FnOnce() -> Result<()> + 'a) -> Self {
        Self {
            name,
            action: Box::new(action),
        }
    }

    /// The step's name, used in progress output.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Everything the pipeline compositions need.
pub struct PipelineContext<'a> {
    /// Working-directory layout.
    pub layout: &'a Layout,
    /// Artefact names derived once from the project identifier.
    pub artefacts: &'a ArtifactSet,
    /// Executor for external commands.
    pub executor: &'a dyn CommandExecutor,
    /// The bundler implementation.
    pub bundler: &'a dyn Bundler,
    /// Rules applied to the main glue script.
    pub main_rules: &'a [PatchRule],
    /// Bundler configuration for this run.
    pub bundle: BundleConfig,
}

/// Runs the steps in order, announcing each to `stderr` unless quiet.
///
/// # Errors
///
/// Returns the first failing step's error unchanged; later steps never run.
pub fn run_steps(
    pipeline: &str,
    steps: Vec<Step<'_>>,
    quiet: bool,
    stderr: &mut dyn Write,
) -> Result<()> {
    for step in steps {
        if !quiet {
            write_stderr_line(stderr, format!("[{pipeline}] {}", step.name));
        }
        (step.action)()?;
    }
    Ok(())
}

/// Writes one line to the stderr sink, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort progress output.
    }
}

/// The `clean` pipeline: remove every directory the pipeline owns. Takes
/// only the layout, so it runs without a project identifier.
pub fn clean_steps(layout: &Layout) -> Vec<Step<'_>> {
    vec![Step::new("clean", move || {
        cleaner::remove_dirs(&layout.owned_dirs())
    })]
}

/// The `build` pipeline: clean, ensure the compiler tool, compile, verify
/// the artefact set, inline the payload, patch the main glue, stage the
/// remainder, bundle, and verify the bundle.
pub fn build_steps<'a>(ctx: &'a PipelineContext<'a>) -> Vec<Step<'a>> {
    let wasm_dir = ctx.layout.wasm_dir();
    let staging_dir = ctx.layout.staging_dir();

    let mut steps = clean_steps(ctx.layout);
    steps.push(Step::new("ensure-tool", move || {
        tooling::ensure_wasm_pack(ctx.executor)
    }));
    steps.push(Step::new("compile", move || {
        tooling::compile(ctx.executor, ctx.layout)
    }));
    {
        let wasm_dir = wasm_dir.clone();
        steps.push(Step::new("verify-artefacts", move || {
            ctx.artefacts.verify_present(&wasm_dir)
        }));
    }
    {
        let wasm_dir = wasm_dir.clone();
        let staging_dir = staging_dir.clone();
        steps.push(Step::new("inline", move || {
            inliner::inline_payload(ctx.artefacts, &wasm_dir, &staging_dir).map(|_report| ())
        }));
    }
    {
        let source = wasm_dir.join(&ctx.artefacts.main_script);
        let dest = staging_dir.join(&ctx.artefacts.main_script);
        steps.push(Step::new("patch", move || {
            patcher::patch_file(&source, &dest, ctx.main_rules).map(|_outcomes| ())
        }));
    }
    steps.push(Step::new("stage", move || {
        stager::stage_remainder(ctx.artefacts, &wasm_dir, &staging_dir).map(|_copied| ())
    }));
    steps.push(Step::new("bundle", move || ctx.bundler.bundle(&ctx.bundle)));
    steps.push(Step::new("verify-bundle", move || {
        verify::verify_bundle(ctx.artefacts, &ctx.bundle.outfile)
    }));
    steps
}

/// The `inject` pipeline: build, then rewrap the bundle, reset the
/// downstream tree, deliver, and overlay the replacement files.
pub fn inject_steps<'a>(ctx: &'a PipelineContext<'a>, target: &'a InjectTarget) -> Vec<Step<'a>> {
    let mut steps = build_steps(ctx);
    let rewrapped = injector::rewrapped_path(&ctx.bundle.outfile, target);

    steps.push(Step::new("rewrap", move || {
        injector::rewrap(&ctx.bundle.outfile, target).map(|_path| ())
    }));
    steps.push(Step::new("reset-tree", move || {
        injector::reset_tree(ctx.executor, &target.tree)
    }));
    steps.push(Step::new("deliver", move || {
        injector::deliver(&rewrapped, target).map(|_path| ())
    }));
    steps.push(Step::new("overlay", move || {
        injector::overlay(target).map(|_written| ())
    }));
    steps
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
