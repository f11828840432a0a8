//! islgen - Ion Schema code generation orchestrator
//!
//! This library runs the `ion` CLI's code generator as a managed
//! pre-compilation step. It resolves the external tool (honoring the
//! `ION_CLI` environment override), invokes it synchronously with the fixed
//! `beta generate` argument vector, fingerprints schema inputs so unchanged
//! projects skip regeneration, and reports the generated source set for the
//! enclosing build to compile.
//!
//! # Core Concepts
//!
//! - **Tool resolution**: the generator executable comes from `ION_CLI` or
//!   defaults to `ion` on `PATH`. A missing tool is a hard, named error -
//!   there is no fallback and no retry.
//! - **The task**: a [`codegen::CodegenTask`] declares the schema directory
//!   as its inputs and the output directory as its output, mirroring
//!   incremental-build dependency tracking. When it returns successfully,
//!   every generated source is on disk, which is what lets compilation
//!   safely depend on it.
//! - **Targets**: Java and Rust generation differ only in the `-l` flag and
//!   in how output lands; the [`languages`] registry captures both.
//!
//! # Example
//!
//! ```no_run
//! use islgen::codegen::CodegenTask;
//! use islgen::config::{IslgenConfig, ProjectConfig};
//! use islgen::languages::LanguageRegistry;
//! use std::path::Path;
//!
//! fn generate(project_root: &Path) -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = LanguageRegistry::with_defaults();
//!     let project = ProjectConfig::load(project_root, &registry)?;
//!     let task = CodegenTask::new(project, IslgenConfig::default());
//!
//!     let report = task.run(false)?;
//!     println!("{} files under {}", report.source_set.len(),
//!              report.source_set.source_root.display());
//!     Ok(())
//! }
//! ```
//!
//! For Cargo consumers, [`buildscript::Builder`] wraps the same task for
//! use from a `build.rs`, generating into `OUT_DIR` and emitting the
//! `cargo:rerun-if-changed` directives that keep Cargo's staleness tracking
//! aligned with the schema inputs.
//!
//! # Project Structure
//!
//! - [`config`]: environment configuration and the `islgen.toml` manifest
//! - [`languages`]: target language registry (Java, Rust)
//! - [`tool`]: executable resolution, invocation, version probing
//! - [`codegen`]: the generation task, fingerprinting, source sets
//! - [`buildscript`]: Cargo build-script entry point
//! - [`cli`]: command-line interface

// Public modules
pub mod buildscript;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod languages;
pub mod tool;
pub mod util;

// Re-export key types for convenient access
pub use codegen::{CodegenError, CodegenTask, GenerationReport, SourceSet, Staleness};
pub use config::{ConfigError, IslgenConfig, ProjectConfig};
pub use languages::{LanguageId, LanguageRegistry, TargetLanguage};
pub use tool::{ResolvedTool, ToolError};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
