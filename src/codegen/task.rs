//! The code generation task
//!
//! Mirrors the build-step contract of the original tooling: schema
//! directory in, generated sources out, with the task skipped when its
//! recorded inputs are unchanged and failed loudly the moment the external
//! tool misbehaves.

use super::fingerprint::{Fingerprint, TaskParameters};
use super::source_set::SourceSet;
use super::CodegenError;
use crate::config::{IslgenConfig, ProjectConfig};
use crate::tool::{resolve, Invocation};
use serde::Serialize;
use std::fs;
use std::time::Instant;
use tracing::{debug, info};

/// Result of a staleness check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Staleness {
    Fresh,
    Stale(StaleReason),
}

/// Why a task needs to re-run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleReason {
    /// Output directory does not exist
    OutputMissing,
    /// Output directory exists but holds no generated sources
    OutputEmpty,
    /// No stored fingerprint to compare against
    NoFingerprint,
    /// Fingerprinting is disabled, so every run regenerates
    FingerprintingDisabled,
    /// Invocation parameters changed since the last run
    ParametersChanged,
    /// Schema file contents changed since the last run
    InputsChanged,
}

impl Staleness {
    pub fn is_fresh(&self) -> bool {
        matches!(self, Staleness::Fresh)
    }
}

/// Structured result of a generation run
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    /// Target language flag value
    pub language: String,

    /// Tool that ran (or would have run, when the task was skipped)
    pub tool: String,

    /// Schema files the task covers
    pub schemas: Vec<String>,

    /// True when generation was skipped because inputs were unchanged
    pub skipped: bool,

    /// Generated sources on disk after the run
    pub source_set: SourceSet,

    /// Wall-clock duration of the run
    pub duration_ms: u64,
}

/// A configured code generation task
pub struct CodegenTask {
    project: ProjectConfig,
    runtime: IslgenConfig,
}

impl CodegenTask {
    pub fn new(project: ProjectConfig, runtime: IslgenConfig) -> Self {
        Self { project, runtime }
    }

    pub fn project(&self) -> &ProjectConfig {
        &self.project
    }

    fn parameters(&self) -> TaskParameters {
        TaskParameters {
            language: self.project.language.flag().to_string(),
            schema_dir: self.project.schema_dir.display().to_string(),
            schemas: self.project.schemas.clone(),
            output_dir: self.project.output_dir.display().to_string(),
        }
    }

    /// Verifies the declared inputs exist before any tool invocation
    fn preflight(&self) -> Result<(), CodegenError> {
        let schema_dir = self.project.schema_dir_abs();
        if !schema_dir.is_dir() {
            return Err(CodegenError::SchemaDirMissing(schema_dir));
        }
        for schema in &self.project.schemas {
            if !schema_dir.join(schema).is_file() {
                return Err(CodegenError::SchemaMissing {
                    schema: schema.clone(),
                    dir: schema_dir,
                });
            }
        }
        Ok(())
    }

    /// Reports whether the task would regenerate, without running the tool
    pub fn check(&self) -> Result<Staleness, CodegenError> {
        self.preflight()?;

        let output_dir = self.project.output_dir_abs();
        if !output_dir.is_dir() {
            return Ok(Staleness::Stale(StaleReason::OutputMissing));
        }

        let sources = SourceSet::collect(self.project.language.as_ref(), &output_dir)?;
        if sources.is_empty() {
            return Ok(Staleness::Stale(StaleReason::OutputEmpty));
        }

        if !self.runtime.fingerprint_enabled {
            return Ok(Staleness::Stale(StaleReason::FingerprintingDisabled));
        }

        let stored = match Fingerprint::load(&output_dir) {
            Some(stored) => stored,
            None => return Ok(Staleness::Stale(StaleReason::NoFingerprint)),
        };

        let current = Fingerprint::capture(&self.project.schema_dir_abs(), self.parameters())?;
        if stored.parameters != current.parameters {
            return Ok(Staleness::Stale(StaleReason::ParametersChanged));
        }
        if !stored.matches(&current) {
            return Ok(Staleness::Stale(StaleReason::InputsChanged));
        }

        Ok(Staleness::Fresh)
    }

    /// Runs the task
    ///
    /// When the task is fresh and `force` is false, no tool invocation
    /// happens and the report carries `skipped: true`.
    pub fn run(&self, force: bool) -> Result<GenerationReport, CodegenError> {
        self.run_with_observer(force, |_| {})
    }

    /// Runs the task, notifying the observer before each schema invocation
    pub fn run_with_observer(
        &self,
        force: bool,
        mut on_schema: impl FnMut(&str),
    ) -> Result<GenerationReport, CodegenError> {
        let started = Instant::now();
        self.preflight()?;

        let output_dir = self.project.output_dir_abs();

        if !force {
            let staleness = self.check()?;
            if staleness.is_fresh() {
                info!("generated sources are up to date, skipping generation");
                let source_set =
                    SourceSet::collect(self.project.language.as_ref(), &output_dir)?;
                return Ok(GenerationReport {
                    language: self.project.language.flag().to_string(),
                    tool: self.runtime.tool.clone(),
                    schemas: self.project.schemas.clone(),
                    skipped: true,
                    source_set,
                    duration_ms: started.elapsed().as_millis() as u64,
                });
            }
            debug!(staleness = ?staleness, "task is stale");
        }

        let tool = resolve(&self.runtime)?;
        fs::create_dir_all(&output_dir)?;

        let schema_dir = self.project.schema_dir_abs();
        for schema in &self.project.schemas {
            on_schema(schema);
            Invocation::generate(
                &tool,
                self.project.language.flag(),
                schema,
                &schema_dir,
                &output_dir,
                &self.project.root,
            )
            .run()?;
        }

        let source_set = SourceSet::collect(self.project.language.as_ref(), &output_dir)?;
        if source_set.is_empty() {
            return Err(CodegenError::EmptyOutput(output_dir));
        }

        if self.runtime.fingerprint_enabled {
            Fingerprint::capture(&schema_dir, self.parameters())?.store(&output_dir)?;
        }

        info!(
            files = source_set.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "generation complete"
        );

        Ok(GenerationReport {
            language: self.project.language.flag().to_string(),
            tool: tool.path.display().to_string(),
            schemas: self.project.schemas.clone(),
            skipped: false,
            source_set,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }

    /// Removes the output directory (and with it the stored fingerprint)
    ///
    /// Returns whether anything existed to remove.
    pub fn clean(&self) -> Result<bool, CodegenError> {
        let output_dir = self.project.output_dir_abs();
        if output_dir.is_dir() {
            fs::remove_dir_all(&output_dir)?;
            info!(dir = %output_dir.display(), "removed generated output");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::LanguageRegistry;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// A stub generator that writes one Java file into the -o directory
    const GENERATING_STUB: &str = r#"
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then out="$2"; fi
  shift
done
mkdir -p "$out"
echo "public class Generated {}" > "$out/Generated.java"
"#;

    #[cfg(unix)]
    fn write_stub(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn project_at(root: &Path) -> ProjectConfig {
        let registry = LanguageRegistry::with_defaults();
        ProjectConfig {
            root: root.to_path_buf(),
            language: registry.get("java").unwrap(),
            schema_dir: PathBuf::from("schemas"),
            schemas: vec!["struct_with_fields.isl".to_string()],
            output_dir: PathBuf::from("generated"),
        }
    }

    fn runtime_with_tool(tool: &Path) -> IslgenConfig {
        IslgenConfig {
            tool: tool.display().to_string(),
            tool_from_env: true,
            fingerprint_enabled: true,
            log_level: "info".to_string(),
        }
    }

    fn setup_project(root: &Path) {
        fs::create_dir_all(root.join("schemas")).unwrap();
        fs::write(
            root.join("schemas/struct_with_fields.isl"),
            "type::{ name: struct_with_fields }",
        )
        .unwrap();
    }

    #[test]
    #[cfg(unix)]
    fn test_run_generates_sources() {
        let dir = TempDir::new().unwrap();
        setup_project(dir.path());
        let tool = write_stub(dir.path(), "stub-ion", GENERATING_STUB);

        let task = CodegenTask::new(project_at(dir.path()), runtime_with_tool(&tool));
        let report = task.run(false).unwrap();

        assert!(!report.skipped);
        assert_eq!(report.language, "java");
        assert_eq!(report.source_set.len(), 1);
        assert!(dir.path().join("generated/Generated.java").is_file());
    }

    #[test]
    #[cfg(unix)]
    fn test_second_run_is_skipped() {
        let dir = TempDir::new().unwrap();
        setup_project(dir.path());
        let tool = write_stub(dir.path(), "stub-ion", GENERATING_STUB);

        let task = CodegenTask::new(project_at(dir.path()), runtime_with_tool(&tool));
        let first = task.run(false).unwrap();
        let second = task.run(false).unwrap();

        assert!(!first.skipped);
        assert!(second.skipped);
        assert_eq!(second.source_set.len(), 1);
    }

    #[test]
    #[cfg(unix)]
    fn test_schema_change_triggers_regeneration() {
        let dir = TempDir::new().unwrap();
        setup_project(dir.path());
        let tool = write_stub(dir.path(), "stub-ion", GENERATING_STUB);

        let task = CodegenTask::new(project_at(dir.path()), runtime_with_tool(&tool));
        task.run(false).unwrap();

        fs::write(
            dir.path().join("schemas/struct_with_fields.isl"),
            "type::{ name: struct_with_fields, fields: { a: int } }",
        )
        .unwrap();

        assert_eq!(
            task.check().unwrap(),
            Staleness::Stale(StaleReason::InputsChanged)
        );
        let report = task.run(false).unwrap();
        assert!(!report.skipped);
    }

    #[test]
    #[cfg(unix)]
    fn test_force_regenerates_fresh_task() {
        let dir = TempDir::new().unwrap();
        setup_project(dir.path());
        let tool = write_stub(dir.path(), "stub-ion", GENERATING_STUB);

        let task = CodegenTask::new(project_at(dir.path()), runtime_with_tool(&tool));
        task.run(false).unwrap();
        let report = task.run(true).unwrap();

        assert!(!report.skipped);
    }

    #[test]
    fn test_missing_tool_fails_run() {
        let dir = TempDir::new().unwrap();
        setup_project(dir.path());

        let runtime = IslgenConfig {
            tool: "definitely-not-installed-ion".to_string(),
            tool_from_env: false,
            fingerprint_enabled: true,
            log_level: "info".to_string(),
        };
        let task = CodegenTask::new(project_at(dir.path()), runtime);
        let err = task.run(false).unwrap_err();

        assert!(err.to_string().contains("definitely-not-installed-ion"));
    }

    #[test]
    #[cfg(unix)]
    fn test_tool_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        setup_project(dir.path());
        let tool = write_stub(dir.path(), "stub-ion", "echo 'invalid schema' >&2; exit 1");

        let task = CodegenTask::new(project_at(dir.path()), runtime_with_tool(&tool));
        let err = task.run(false).unwrap_err();

        assert!(err.to_string().contains("invalid schema"));
    }

    #[test]
    #[cfg(unix)]
    fn test_empty_output_after_success_is_error() {
        let dir = TempDir::new().unwrap();
        setup_project(dir.path());
        // Tool that exits zero without writing anything
        let tool = write_stub(dir.path(), "stub-ion", "exit 0");

        let task = CodegenTask::new(project_at(dir.path()), runtime_with_tool(&tool));
        let err = task.run(false).unwrap_err();

        assert!(matches!(err, CodegenError::EmptyOutput(_)));
    }

    #[test]
    #[cfg(unix)]
    fn test_missing_schema_file_fails_before_invocation() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("schemas")).unwrap();
        // Stub would leave a marker next to itself if it ever ran
        let tool = write_stub(
            dir.path(),
            "stub-ion",
            "touch \"$(dirname \"$0\")/invoked-marker\"; exit 0",
        );

        let task = CodegenTask::new(project_at(dir.path()), runtime_with_tool(&tool));
        let err = task.run(false).unwrap_err();

        assert!(matches!(err, CodegenError::SchemaMissing { .. }));
        assert!(err.to_string().contains("struct_with_fields.isl"));
        assert!(!dir.path().join("invoked-marker").exists());
    }

    #[test]
    fn test_missing_schema_dir_fails() {
        let dir = TempDir::new().unwrap();
        let runtime = IslgenConfig {
            tool: "ion".to_string(),
            tool_from_env: false,
            fingerprint_enabled: true,
            log_level: "info".to_string(),
        };
        let task = CodegenTask::new(project_at(dir.path()), runtime);

        let err = task.check().unwrap_err();
        assert!(matches!(err, CodegenError::SchemaDirMissing(_)));
    }

    #[test]
    #[cfg(unix)]
    fn test_check_reports_output_missing() {
        let dir = TempDir::new().unwrap();
        setup_project(dir.path());
        let tool = write_stub(dir.path(), "stub-ion", GENERATING_STUB);

        let task = CodegenTask::new(project_at(dir.path()), runtime_with_tool(&tool));
        assert_eq!(
            task.check().unwrap(),
            Staleness::Stale(StaleReason::OutputMissing)
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_fingerprint_disabled_always_stale() {
        let dir = TempDir::new().unwrap();
        setup_project(dir.path());
        let tool = write_stub(dir.path(), "stub-ion", GENERATING_STUB);

        let mut runtime = runtime_with_tool(&tool);
        runtime.fingerprint_enabled = false;
        let task = CodegenTask::new(project_at(dir.path()), runtime);

        task.run(false).unwrap();
        assert_eq!(
            task.check().unwrap(),
            Staleness::Stale(StaleReason::FingerprintingDisabled)
        );
        let second = task.run(false).unwrap();
        assert!(!second.skipped);
    }

    #[test]
    #[cfg(unix)]
    fn test_clean_removes_output_and_fingerprint() {
        let dir = TempDir::new().unwrap();
        setup_project(dir.path());
        let tool = write_stub(dir.path(), "stub-ion", GENERATING_STUB);

        let task = CodegenTask::new(project_at(dir.path()), runtime_with_tool(&tool));
        task.run(false).unwrap();
        assert!(dir.path().join("generated").is_dir());

        assert!(task.clean().unwrap());
        assert!(!dir.path().join("generated").exists());
        assert!(!task.clean().unwrap());
    }

    #[test]
    #[cfg(unix)]
    fn test_deleted_output_is_stale_again() {
        let dir = TempDir::new().unwrap();
        setup_project(dir.path());
        let tool = write_stub(dir.path(), "stub-ion", GENERATING_STUB);

        let task = CodegenTask::new(project_at(dir.path()), runtime_with_tool(&tool));
        task.run(false).unwrap();
        task.clean().unwrap();

        assert_eq!(
            task.check().unwrap(),
            Staleness::Stale(StaleReason::OutputMissing)
        );
    }
}
