//! Command handlers
//!
//! Each handler returns a process exit code. Errors are rendered to stderr;
//! report output goes to stdout (or a file when `-o` is given).

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::error;

use super::commands::{CheckArgs, CleanArgs, DoctorArgs, GenerateArgs, OutputFormatArg};
use super::output::{DoctorReport, OutputFormatter};
use crate::codegen::CodegenTask;
use crate::config::{ConfigError, IslgenConfig, ProjectConfig};
use crate::languages::LanguageRegistry;
use crate::tool::{probe_version, resolve};

/// Exit code for operational failures
const EXIT_ERROR: i32 = 2;

pub fn handle_generate(args: &GenerateArgs, quiet: bool) -> i32 {
    match run_generate(args, quiet) {
        Ok(()) => 0,
        Err(e) => {
            error!(error = %e, "generation failed");
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    }
}

fn run_generate(args: &GenerateArgs, quiet: bool) -> Result<()> {
    let root = project_root(&args.project_path)?;
    let registry = LanguageRegistry::with_defaults();
    let project = resolve_project(&root, &registry, args)?;

    let mut runtime = IslgenConfig::default();
    if args.no_fingerprint {
        runtime.fingerprint_enabled = false;
    }
    runtime.validate()?;

    let task = CodegenTask::new(project, runtime);

    let progress = if !quiet
        && args.format == OutputFormatArg::Human
        && task.project().schemas.len() > 1
    {
        let bar = ProgressBar::new(task.project().schemas.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                .expect("static progress template"),
        );
        Some(bar)
    } else {
        None
    };

    let report = task.run_with_observer(args.force, |schema| {
        if let Some(bar) = &progress {
            bar.set_message(schema.to_string());
            bar.inc(1);
        }
    })?;

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    let formatter = OutputFormatter::new(args.format.into());
    emit(&args.output, &formatter.format_report(&report)?)
}

pub fn handle_check(args: &CheckArgs) -> i32 {
    let run = || -> Result<i32> {
        let root = project_root(&args.project_path)?;
        let registry = LanguageRegistry::with_defaults();
        let project = ProjectConfig::load(&root, &registry)?;

        let task = CodegenTask::new(project, IslgenConfig::default());
        let staleness = task.check()?;

        let formatter = OutputFormatter::new(args.format.into());
        println!("{}", formatter.format_check(&staleness)?);

        Ok(if staleness.is_fresh() { 0 } else { 1 })
    };

    match run() {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "check failed");
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    }
}

pub fn handle_clean(args: &CleanArgs, quiet: bool) -> i32 {
    let run = || -> Result<()> {
        let root = project_root(&args.project_path)?;
        let registry = LanguageRegistry::with_defaults();
        let project = ProjectConfig::load(&root, &registry)?;
        let output_dir = project.output_dir_abs();

        let task = CodegenTask::new(project, IslgenConfig::default());
        let removed = task.clean()?;

        if !quiet {
            if removed {
                println!("Removed {}", output_dir.display());
            } else {
                println!("Nothing to clean");
            }
        }
        Ok(())
    };

    match run() {
        Ok(()) => 0,
        Err(e) => {
            error!(error = %e, "clean failed");
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    }
}

pub fn handle_doctor(args: &DoctorArgs) -> i32 {
    let runtime = IslgenConfig::default();
    let report = build_doctor_report(&runtime);

    let formatter = OutputFormatter::new(args.format.into());
    match formatter.format_doctor(&report) {
        Ok(output) => {
            println!("{}", output);
            if report.is_healthy() {
                0
            } else {
                1
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    }
}

fn build_doctor_report(runtime: &IslgenConfig) -> DoctorReport {
    match resolve(runtime) {
        Ok(tool) => {
            let working_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            let (version, error) = match probe_version(&tool, &working_dir) {
                Ok(version) => (Some(version.to_string()), None),
                Err(e) => (None, Some(e.to_string())),
            };
            DoctorReport {
                tool: tool.name.clone(),
                from_env: tool.from_env,
                path: Some(tool.path.display().to_string()),
                version,
                error,
            }
        }
        Err(e) => DoctorReport {
            tool: runtime.tool.clone(),
            from_env: runtime.tool_from_env,
            path: None,
            version: None,
            error: Some(e.to_string()),
        },
    }
}

/// Loads the project manifest, applying command-line overrides
///
/// A manifest is normally required; a fully-specified command line
/// (`--language` plus at least one `--schema`) can stand in for one, which
/// keeps one-off invocations possible in repositories that have not adopted
/// `islgen.toml`.
fn resolve_project(
    root: &Path,
    registry: &LanguageRegistry,
    args: &GenerateArgs,
) -> Result<ProjectConfig> {
    let mut project = match ProjectConfig::load(root, registry) {
        Ok(project) => project,
        Err(ConfigError::MissingManifest(_))
            if args.language.is_some() && !args.schemas.is_empty() =>
        {
            let name = args.language.as_deref().expect("guarded above");
            let language = registry
                .get(name)
                .ok_or_else(|| ConfigError::UnknownLanguage {
                    name: name.to_string(),
                    valid: registry.names().join(", "),
                })?;
            ProjectConfig {
                root: root.to_path_buf(),
                schema_dir: PathBuf::from(language.default_schema_dir()),
                schemas: Vec::new(),
                output_dir: PathBuf::from(language.default_output_dir()),
                language,
            }
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(name) = &args.language {
        project.language = registry
            .get(name)
            .ok_or_else(|| ConfigError::UnknownLanguage {
                name: name.clone(),
                valid: registry.names().join(", "),
            })?;
    }
    if let Some(dir) = &args.schema_dir {
        project.schema_dir = dir.clone();
    }
    if let Some(dir) = &args.out_dir {
        project.output_dir = dir.clone();
    }
    if !args.schemas.is_empty() {
        project.schemas = args.schemas.clone();
    }

    project.validate()?;
    Ok(project)
}

fn project_root(path: &Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path.clone()),
        None => env::current_dir().context("Failed to determine current directory"),
    }
}

fn emit(target: &Option<PathBuf>, output: &str) -> Result<()> {
    match target {
        Some(path) => fs::write(path, output)
            .with_context(|| format!("Failed to write output to {}", path.display())),
        None => {
            println!("{}", output);
            Ok(())
        }
    }
}
