//! Input fingerprinting for incremental builds
//!
//! A fingerprint records every file under the schema directory (path, size,
//! SHA-256) together with the invocation parameters. It is stored as JSON
//! inside the output directory, so deleting generated output automatically
//! invalidates it and `clean` removes both in one stroke. Comparison is
//! digest-based: touching a file's mtime without changing its content does
//! not make the task stale.

use super::CodegenError;
use chrono::{DateTime, Utc};
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// File the fingerprint is stored in, inside the output directory
pub const FINGERPRINT_FILE: &str = ".islgen-fingerprint.json";

/// Fingerprint format version; bump on incompatible layout changes
const FORMAT_VERSION: u32 = 1;

/// The invocation parameters that participate in staleness checks
///
/// If any of these change between runs the task re-runs even when the
/// schema files themselves are untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskParameters {
    pub language: String,
    pub schema_dir: String,
    pub schemas: Vec<String>,
    pub output_dir: String,
}

/// One fingerprinted input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEntry {
    pub size: u64,
    pub sha256: String,
}

/// A captured snapshot of the task's inputs and parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fingerprint {
    version: u32,
    pub generated_at: DateTime<Utc>,
    pub parameters: TaskParameters,
    /// Input files keyed by path relative to the schema directory
    pub inputs: BTreeMap<String, InputEntry>,
}

impl Fingerprint {
    /// Captures the current state of the schema directory
    pub fn capture(
        schema_dir: &Path,
        parameters: TaskParameters,
    ) -> Result<Self, CodegenError> {
        let mut inputs = BTreeMap::new();

        for entry in WalkBuilder::new(schema_dir).build() {
            let entry = entry?;
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }

            let path = entry.path();
            let relative = path
                .strip_prefix(schema_dir)
                .unwrap_or(path)
                .to_string_lossy()
                .into_owned();

            let contents = fs::read(path)?;
            let digest = Sha256::digest(&contents);

            inputs.insert(
                relative,
                InputEntry {
                    size: contents.len() as u64,
                    sha256: hex::encode(digest),
                },
            );
        }

        debug!(files = inputs.len(), dir = %schema_dir.display(), "fingerprinted schema inputs");

        Ok(Self {
            version: FORMAT_VERSION,
            generated_at: Utc::now(),
            parameters,
            inputs,
        })
    }

    /// Whether this stored fingerprint still matches a freshly captured one
    ///
    /// The capture timestamp is deliberately excluded from the comparison.
    pub fn matches(&self, current: &Fingerprint) -> bool {
        self.version == current.version
            && self.parameters == current.parameters
            && self.inputs == current.inputs
    }

    /// Loads the fingerprint stored in the output directory, if any
    ///
    /// A missing or unreadable fingerprint is not an error - it simply means
    /// the task is stale.
    pub fn load(output_dir: &Path) -> Option<Fingerprint> {
        let path = output_dir.join(FINGERPRINT_FILE);
        let raw = fs::read_to_string(&path).ok()?;

        match serde_json::from_str(&raw) {
            Ok(fingerprint) => Some(fingerprint),
            Err(error) => {
                warn!(path = %path.display(), %error, "discarding unreadable fingerprint");
                None
            }
        }
    }

    /// Stores this fingerprint in the output directory
    pub fn store(&self, output_dir: &Path) -> Result<(), CodegenError> {
        let path = output_dir.join(FINGERPRINT_FILE);
        let json = serde_json::to_string_pretty(self).expect("fingerprint serialization");
        fs::write(&path, json)?;
        debug!(path = %path.display(), "stored fingerprint");
        Ok(())
    }
}
