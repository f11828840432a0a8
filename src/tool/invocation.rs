//! Generator tool invocation
//!
//! One invocation is one child process running the fixed argument vector
//!
//! ```text
//! <tool> beta generate -l <language> -s <schema-file> -d <schema-dir> -o <output-dir>
//! ```
//!
//! with the working directory set to the project root. Execution is
//! synchronous and blocking; stdout and stderr are captured in full. A
//! non-zero exit is immediately fatal - no retry, no partial-failure
//! handling.

use super::{ResolvedTool, ToolError};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// A prepared child-process invocation of the generator tool
#[derive(Debug, Clone)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<String>,
    working_dir: PathBuf,
}

/// Captured output of a completed invocation
#[derive(Debug, Clone)]
pub struct InvocationOutput {
    pub stdout: String,
    pub stderr: String,
}

impl Invocation {
    /// Builds the `beta generate` invocation for one schema file
    pub fn generate(
        tool: &ResolvedTool,
        language_flag: &str,
        schema_file: &str,
        schema_dir: &Path,
        output_dir: &Path,
        project_root: &Path,
    ) -> Self {
        let args = vec![
            "beta".to_string(),
            "generate".to_string(),
            "-l".to_string(),
            language_flag.to_string(),
            "-s".to_string(),
            schema_file.to_string(),
            "-d".to_string(),
            schema_dir.display().to_string(),
            "-o".to_string(),
            output_dir.display().to_string(),
        ];

        Self {
            program: tool.path.clone(),
            args,
            working_dir: project_root.to_path_buf(),
        }
    }

    /// Builds a bare invocation with custom arguments (used for probing)
    pub fn bare(tool: &ResolvedTool, args: &[&str], working_dir: &Path) -> Self {
        Self {
            program: tool.path.clone(),
            args: args.iter().map(|s| s.to_string()).collect(),
            working_dir: working_dir.to_path_buf(),
        }
    }

    /// The full command line, for logs and error messages
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }

    /// Runs the invocation to completion
    ///
    /// Blocks until the child exits. Returns the captured output on a zero
    /// exit status and a [`ToolError`] otherwise.
    pub fn run(&self) -> Result<InvocationOutput, ToolError> {
        info!(command = %self.command_line(), "invoking generator tool");

        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.working_dir)
            .output()
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::NotFound => ToolError::NotFound {
                    name: self.program.display().to_string(),
                },
                _ => ToolError::Spawn {
                    program: self.program.clone(),
                    source,
                },
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(ToolError::Failed {
                command: self.command_line(),
                status: output.status.to_string(),
                stderr,
            });
        }

        debug!(stdout_bytes = stdout.len(), "generator tool completed");
        Ok(InvocationOutput { stdout, stderr })
    }
}
