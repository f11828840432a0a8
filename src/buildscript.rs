//! Cargo build-script integration
//!
//! Runs Ion Schema code generation from a `build.rs`, writing generated
//! Rust sources into `OUT_DIR` and printing the `cargo:` directives that
//! keep Cargo's own staleness tracking in sync with the schema inputs.
//!
//! ```no_run
//! // build.rs
//! fn main() {
//!     islgen::buildscript::Builder::new()
//!         .schema_dir("schema")
//!         .schema("struct_with_fields.isl")
//!         .run()
//!         .expect("ion schema code generation failed");
//! }
//! ```
//!
//! Consumers then pull the generated types in with
//!
//! ```ignore
//! include!(concat!(env!("OUT_DIR"), "/ion_data_model/struct_with_fields.rs"));
//! ```
//!
//! Generation failures (missing tool, non-zero exit, empty output) surface
//! as errors from [`Builder::run`]; propagating them out of `main` fails
//! the enclosing `cargo build`, which is the intended behavior for a
//! pre-compilation step.

use crate::codegen::{CodegenError, CodegenTask, GenerationReport};
use crate::config::{IslgenConfig, ProjectConfig, TOOL_ENV_VAR};
use crate::languages::LanguageRegistry;
use std::env;
use std::path::PathBuf;

/// Configures and runs code generation inside a build script
#[derive(Debug, Default)]
pub struct Builder {
    schema_dir: Option<PathBuf>,
    schemas: Vec<String>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema source directory, relative to the crate root.
    /// Defaults to the Rust target's conventional `schema` directory.
    pub fn schema_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.schema_dir = Some(dir.into());
        self
    }

    /// Adds one schema file to generate code for
    pub fn schema(mut self, file: impl Into<String>) -> Self {
        self.schemas.push(file.into());
        self
    }

    /// Runs generation into `OUT_DIR`
    ///
    /// Reads `CARGO_MANIFEST_DIR` and `OUT_DIR` from the environment, so it
    /// only works when invoked by Cargo.
    pub fn run(self) -> Result<GenerationReport, CodegenError> {
        let root = build_env("CARGO_MANIFEST_DIR")?;
        let out_dir = build_env("OUT_DIR")?;

        let registry = LanguageRegistry::with_defaults();
        let language = registry.get("rust").expect("rust target is registered");

        let schema_dir = self
            .schema_dir
            .unwrap_or_else(|| PathBuf::from(language.default_schema_dir()));

        // Emit rerun directives before generation so a failing run still
        // leaves Cargo watching the inputs.
        println!("cargo:rerun-if-env-changed={}", TOOL_ENV_VAR);
        println!("cargo:rerun-if-changed={}", root.join(&schema_dir).display());
        for schema in &self.schemas {
            println!(
                "cargo:rerun-if-changed={}",
                root.join(&schema_dir).join(schema).display()
            );
        }

        // OUT_DIR is absolute; Path::join resolves it as-is against the root.
        let project = ProjectConfig {
            root: root.clone(),
            language,
            schema_dir,
            schemas: self.schemas,
            output_dir: out_dir,
        };
        if project.schemas.is_empty() {
            return Err(crate::config::ConfigError::NoSchemas.into());
        }

        let task = CodegenTask::new(project, IslgenConfig::default());
        task.run(false)
    }
}

fn build_env(key: &'static str) -> Result<PathBuf, CodegenError> {
    env::var_os(key)
        .map(PathBuf::from)
        .ok_or(CodegenError::MissingBuildEnv(key))
}
