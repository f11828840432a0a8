//! Generator tool version probing
//!
//! Used by the `doctor` command for diagnostics. Generation itself never
//! gates on a version: the tool either produces output or fails the build.

use super::{Invocation, ResolvedTool, ToolError};
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

/// A parsed `<tool> --version` result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    /// The raw version line as printed by the tool
    pub raw: String,
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").unwrap())
}

/// Parses a version triple out of arbitrary `--version` output
pub fn parse_version(output: &str) -> Result<ToolVersion, ToolError> {
    let line = output.lines().next().unwrap_or("").trim();

    let captures =
        version_pattern()
            .captures(line)
            .ok_or_else(|| ToolError::UnrecognizedVersion {
                output: line.to_string(),
            })?;

    // The regex guarantees all-digit captures; overflow of u32 is the only
    // way these parses can fail.
    let parse = |i: usize| {
        captures[i]
            .parse::<u32>()
            .map_err(|_| ToolError::UnrecognizedVersion {
                output: line.to_string(),
            })
    };

    Ok(ToolVersion {
        major: parse(1)?,
        minor: parse(2)?,
        patch: parse(3)?,
        raw: line.to_string(),
    })
}

/// Runs `<tool> --version` and parses the result
pub fn probe_version(tool: &ResolvedTool, working_dir: &Path) -> Result<ToolVersion, ToolError> {
    let output = Invocation::bare(tool, &["--version"], working_dir).run()?;
    parse_version(&output.stdout)
}
