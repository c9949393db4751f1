//! wasmwrap CLI entrypoint.
//!
//! This binary compiles a wasm project, inlines the binary payload into the
//! generated glue, bundles the result into one self-contained script, and
//! can deliver that script into a downstream source tree.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::io::Write;
use wasmwrap::bundler::{BundleConfig, EsbuildBundler};
use wasmwrap::cli::{Cli, Command};
use wasmwrap::config::Config;
use wasmwrap::error::{Result, WrapError};
use wasmwrap::exec::SystemCommandExecutor;
use wasmwrap::injector::InjectTarget;
use wasmwrap::patcher::{self, PatchRule};
use wasmwrap::pipeline::{
    PipelineContext, build_steps, clean_steps, inject_steps, run_steps,
};
use wasmwrap::project::{ArtifactSet, Layout, ProjectName};

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let config = Config::load(&cli.root.join(&cli.config))?;
    let layout = Layout::with_dirs(
        cli.root.clone(),
        config.layout.wasm_dir.as_str(),
        config.layout.staging_dir.as_str(),
        config.layout.dist_dir.as_str(),
    );

    match cli.command {
        // Cleaning operates on directories alone; only the compiling
        // pipelines need a project identifier.
        Command::Clean => run_steps("clean", clean_steps(&layout), cli.quiet, stderr),
        Command::Build | Command::Inject => {
            let project = resolve_project(cli, &config)?;
            let artefacts = ArtifactSet::for_project(&project);
            let main_rules = resolve_patch_rules(&config)?;

            let executor = SystemCommandExecutor;
            let bundler = EsbuildBundler::new(&executor);
            let context = PipelineContext {
                layout: &layout,
                artefacts: &artefacts,
                executor: &executor,
                bundler: &bundler,
                main_rules: &main_rules,
                bundle: bundle_config(&layout, &artefacts, &config),
            };

            if cli.command == Command::Inject {
                let target = resolve_inject_target(&cli.root, &config)?;
                run_steps(
                    "inject",
                    inject_steps(&context, &target),
                    cli.quiet,
                    stderr,
                )
            } else {
                run_steps("build", build_steps(&context), cli.quiet, stderr)
            }
        }
    }
}

/// Resolves the project identifier: the CLI flag wins over the config file.
fn resolve_project(cli: &Cli, config: &Config) -> Result<ProjectName> {
    let name = cli
        .project
        .as_deref()
        .or(config.project.as_deref())
        .ok_or(WrapError::MissingProject)?;
    ProjectName::new(name)
}

/// Compiles the built-in rule plus any user-supplied rules, in file order.
fn resolve_patch_rules(config: &Config) -> Result<Vec<PatchRule>> {
    let mut rules = vec![patcher::text_decoder_rule()?];
    for rule in &config.patch {
        let compiled = if rule.mandatory {
            PatchRule::mandatory(rule.name.as_str(), &rule.pattern, rule.replacement.as_str())?
        } else {
            PatchRule::optional(rule.name.as_str(), &rule.pattern, rule.replacement.as_str())?
        };
        rules.push(compiled);
    }
    Ok(rules)
}

fn bundle_config(layout: &Layout, artefacts: &ArtifactSet, config: &Config) -> BundleConfig {
    BundleConfig {
        entry: layout.staging_dir().join(&artefacts.main_script),
        outfile: layout.dist_dir().join(&config.bundle.file_name),
        global_name: config.bundle.global_name.clone(),
        minify: config.bundle.minify,
    }
}

/// Builds the injection target from the config, resolving paths against the
/// project root.
fn resolve_inject_target(root: &Utf8Path, config: &Config) -> Result<InjectTarget> {
    let tree = config
        .inject
        .tree
        .as_deref()
        .ok_or(WrapError::MissingInjectTree)?;
    Ok(InjectTarget {
        tree: root.join(tree),
        subdir: Utf8PathBuf::from(config.inject.subdir.as_str()),
        overlay_dir: root.join(config.inject.overlay_dir.as_str()),
        headers: config.inject.headers.clone(),
        extension: config.inject.extension.clone(),
    })
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let err = WrapError::MissingProject;

        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(stderr_text.contains("project"));
    }

    #[test]
    fn project_resolution_prefers_the_cli_flag() {
        let cli = Cli {
            command: Command::Build,
            config: Utf8PathBuf::from("wasmwrap.toml"),
            project: Some("from-cli".to_owned()),
            root: Utf8PathBuf::from("."),
            quiet: false,
        };
        let config = Config {
            project: Some("from-config".to_owned()),
            ..Config::default()
        };

        let name = resolve_project(&cli, &config).expect("project resolves");
        assert_eq!(name.as_str(), "from-cli");
    }

    #[test]
    fn project_resolution_falls_back_to_the_config() {
        let cli = Cli {
            command: Command::Build,
            config: Utf8PathBuf::from("wasmwrap.toml"),
            project: None,
            root: Utf8PathBuf::from("."),
            quiet: false,
        };
        let config = Config {
            project: Some("from-config".to_owned()),
            ..Config::default()
        };

        let name = resolve_project(&cli, &config).expect("project resolves");
        assert_eq!(name.as_str(), "from-config");
    }

    #[test]
    fn clean_runs_without_a_project_identifier() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root =
            Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        std::fs::create_dir_all(root.join("dist")).expect("create dist");

        let cli = Cli {
            command: Command::Clean,
            config: Utf8PathBuf::from("wasmwrap.toml"),
            project: None,
            root: root.clone(),
            quiet: true,
        };

        let mut stderr = Vec::new();
        run(&cli, &mut stderr).expect("clean needs no project");
        assert!(!root.join("dist").exists());
    }

    #[test]
    fn missing_project_everywhere_is_an_error() {
        let cli = Cli {
            command: Command::Build,
            config: Utf8PathBuf::from("wasmwrap.toml"),
            project: None,
            root: Utf8PathBuf::from("."),
            quiet: false,
        };

        let err = resolve_project(&cli, &Config::default()).expect_err("no project anywhere");
        assert!(matches!(err, WrapError::MissingProject));
    }

    #[test]
    fn inject_requires_a_configured_tree() {
        let err = resolve_inject_target(Utf8Path::new("/work"), &Config::default())
            .expect_err("tree is unset by default");
        assert!(matches!(err, WrapError::MissingInjectTree));
    }

    #[test]
    fn inject_target_resolves_paths_against_the_root() {
        let mut config = Config::default();
        config.inject.tree = Some("../downstream".to_owned());

        let target = resolve_inject_target(Utf8Path::new("/work/project"), &config)
            .expect("target resolves");
        assert_eq!(target.tree, Utf8PathBuf::from("/work/project/../downstream"));
        assert_eq!(
            target.overlay_dir,
            Utf8PathBuf::from("/work/project/replacement")
        );
        assert_eq!(target.extension, "ts");
    }
}
