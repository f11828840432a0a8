//! Code generation task
//!
//! The heart of the crate: a [`CodegenTask`] declares the schema directory
//! as its input set and the output directory as its output, decides whether
//! generation is stale, runs one tool invocation per schema file, and
//! enforces the post-condition that a successful run leaves the output
//! directory non-empty. Compilation ordering is expressed by the synchronous
//! [`CodegenTask::run`] contract: when it returns `Ok`, every generated
//! source file is on disk.

use crate::config::ConfigError;
use crate::tool::ToolError;
use std::path::PathBuf;
use thiserror::Error;

pub mod fingerprint;
pub mod source_set;
pub mod task;

pub use fingerprint::{Fingerprint, TaskParameters, FINGERPRINT_FILE};
pub use source_set::SourceSet;
pub use task::{CodegenTask, GenerationReport, StaleReason, Staleness};

/// Errors from the code generation task
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Declared schema directory does not exist
    #[error("Schema directory {0} does not exist")]
    SchemaDirMissing(PathBuf),

    /// A schema file named in the manifest is absent
    #[error("Schema file '{schema}' not found in {dir}")]
    SchemaMissing { schema: String, dir: PathBuf },

    /// The tool exited zero but wrote nothing
    #[error("Generator exited successfully but produced no source files in {0}")]
    EmptyOutput(PathBuf),

    /// Build-script entry points require Cargo's environment
    #[error("{0} is not set; islgen::buildscript must be called from a Cargo build script")]
    MissingBuildEnv(&'static str),

    /// Filesystem walk failed while fingerprinting inputs
    #[error("Failed to walk schema directory: {0}")]
    Walk(#[from] ignore::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
