//! External generator tool handling
//!
//! Resolves the `ion` executable (honoring the `ION_CLI` override), builds
//! the fixed `beta generate` argument vector, and runs it as a synchronous
//! child process. There is exactly one failure mode by design: if the tool
//! is missing or exits non-zero, the enclosing build step fails immediately.

use std::path::PathBuf;
use thiserror::Error;

pub mod invocation;
pub mod resolver;
pub mod version;

pub use invocation::{Invocation, InvocationOutput};
pub use resolver::{resolve, ResolvedTool};
pub use version::{probe_version, ToolVersion};

/// Errors from resolving or running the generator tool
#[derive(Debug, Error)]
pub enum ToolError {
    /// The executable could not be found
    #[error(
        "Generator tool '{name}' was not found on PATH. \
         Install ion-cli or point the ION_CLI environment variable at the executable"
    )]
    NotFound { name: String },

    /// The child process could not be spawned
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and exited non-zero
    #[error("'{command}' exited with {status}\n{stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    /// The tool's version output did not match the expected format
    #[error("Could not parse version from '{output}'")]
    UnrecognizedVersion { output: String },
}
