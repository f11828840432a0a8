//! Configuration management for islgen
//!
//! Two layers of configuration:
//!
//! 1. [`IslgenConfig`] - runtime settings loaded from environment variables
//!    with sensible defaults (tool override, fingerprinting, log level).
//! 2. [`ProjectConfig`] - per-project declaration loaded from an
//!    `islgen.toml` manifest at the project root: target language, schema
//!    source directory, schema files, output directory.
//!
//! # Environment Variables
//!
//! - `ION_CLI`: overrides the generator tool invocation name - default: "ion"
//! - `ISLGEN_LOG_LEVEL`: logging level - default: "info"
//! - `ISLGEN_LOG_JSON`: JSON log output (true|false) - default: "false"
//! - `ISLGEN_FINGERPRINT`: enable incremental fingerprinting (true|false) - default: "true"
//!
//! # Manifest format
//!
//! ```toml
//! [project]
//! language = "java"
//!
//! [schemas]
//! dir = "src/main/ion-schema"
//! files = ["struct_with_fields.isl"]
//!
//! [output]
//! dir = "generated/ion-schema/java"
//! ```
//!
//! `schemas.dir` and `output.dir` are optional; each language supplies its
//! conventional layout when they are omitted.

use crate::languages::{LanguageRegistry, TargetLanguage};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Name of the generator tool when `ION_CLI` is not set
pub const DEFAULT_TOOL: &str = "ion";

/// Environment variable overriding the generator tool invocation name
pub const TOOL_ENV_VAR: &str = "ION_CLI";

/// Manifest file name looked up at the project root
pub const MANIFEST_FILE: &str = "islgen.toml";

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_FINGERPRINT_ENABLED: bool = true;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Project manifest not found
    #[error("No islgen.toml found at {0}. Run from a project root or pass an explicit path")]
    MissingManifest(PathBuf),

    /// Manifest could not be parsed
    #[error("Failed to parse {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Unknown target language
    #[error("Unknown target language: {name}. Valid options: {valid}")]
    UnknownLanguage { name: String, valid: String },

    /// Manifest declares no schema files
    #[error("No schema files declared. List at least one file under [schemas] files")]
    NoSchemas,

    /// Manifest paths must stay inside the project
    #[error("{field} must be a relative path, got {path}")]
    AbsolutePath { field: &'static str, path: PathBuf },

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Manifest could not be read
    #[error("Failed to read project manifest: {0}")]
    Io(#[from] std::io::Error),
}

/// Runtime configuration loaded from the environment
///
/// Constructed via `Default::default()`, which reads the `ION_CLI` and
/// `ISLGEN_*` environment variables and falls back to defaults for any
/// missing values.
#[derive(Debug, Clone)]
pub struct IslgenConfig {
    /// Generator tool invocation name (`ION_CLI` override, or "ion")
    pub tool: String,

    /// Whether the tool name came from the environment override
    pub tool_from_env: bool,

    /// Enable incremental fingerprinting of schema inputs
    pub fingerprint_enabled: bool,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for IslgenConfig {
    fn default() -> Self {
        let (tool, tool_from_env) = match env::var(TOOL_ENV_VAR) {
            Ok(value) if !value.trim().is_empty() => (value, true),
            _ => (DEFAULT_TOOL.to_string(), false),
        };

        let fingerprint_enabled = env::var("ISLGEN_FINGERPRINT")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(DEFAULT_FINGERPRINT_ENABLED);

        let log_level = env::var("ISLGEN_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            tool,
            tool_from_env,
            fingerprint_enabled,
            log_level,
        }
    }
}

impl IslgenConfig {
    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tool.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Tool name cannot be empty".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }
}

impl fmt::Display for IslgenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "islgen configuration:")?;
        writeln!(
            f,
            "  Tool: {} ({})",
            self.tool,
            if self.tool_from_env {
                "from ION_CLI"
            } else {
                "default"
            }
        )?;
        writeln!(f, "  Fingerprinting: {}", self.fingerprint_enabled)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

// Raw manifest layout as written on disk. Kept private; callers only see
// the resolved ProjectConfig.

#[derive(Debug, Deserialize)]
struct Manifest {
    project: ManifestProject,
    schemas: ManifestSchemas,
    #[serde(default)]
    output: ManifestOutput,
}

#[derive(Debug, Deserialize)]
struct ManifestProject {
    language: String,
}

#[derive(Debug, Deserialize)]
struct ManifestSchemas {
    dir: Option<PathBuf>,
    #[serde(default)]
    files: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ManifestOutput {
    dir: Option<PathBuf>,
}

/// Resolved per-project configuration
///
/// Paths are stored relative to [`ProjectConfig::root`]; use
/// [`ProjectConfig::schema_dir_abs`] and [`ProjectConfig::output_dir_abs`]
/// when touching the filesystem.
#[derive(Clone)]
pub struct ProjectConfig {
    /// Project root; the working directory for tool invocations
    pub root: PathBuf,

    /// Target language implementation
    pub language: Arc<dyn TargetLanguage>,

    /// Schema source directory, relative to the root
    pub schema_dir: PathBuf,

    /// Schema file names inside the schema directory
    pub schemas: Vec<String>,

    /// Generated-source output directory, relative to the root
    pub output_dir: PathBuf,
}

impl ProjectConfig {
    /// Loads and resolves the `islgen.toml` manifest at the given root
    pub fn load(root: &Path, registry: &LanguageRegistry) -> Result<Self, ConfigError> {
        let manifest_path = root.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(ConfigError::MissingManifest(root.to_path_buf()));
        }

        let raw = std::fs::read_to_string(&manifest_path)?;
        let manifest: Manifest =
            toml::from_str(&raw).map_err(|source| ConfigError::ManifestParse {
                path: manifest_path,
                source,
            })?;

        Self::from_manifest(root, manifest, registry)
    }

    fn from_manifest(
        root: &Path,
        manifest: Manifest,
        registry: &LanguageRegistry,
    ) -> Result<Self, ConfigError> {
        let language = registry.get(&manifest.project.language).ok_or_else(|| {
            ConfigError::UnknownLanguage {
                name: manifest.project.language.clone(),
                valid: registry.names().join(", "),
            }
        })?;

        let schema_dir = manifest
            .schemas
            .dir
            .unwrap_or_else(|| PathBuf::from(language.default_schema_dir()));
        let output_dir = manifest
            .output
            .dir
            .unwrap_or_else(|| PathBuf::from(language.default_output_dir()));

        let config = Self {
            root: root.to_path_buf(),
            language,
            schema_dir,
            schemas: manifest.schemas.files,
            output_dir,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the resolved configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schemas.is_empty() {
            return Err(ConfigError::NoSchemas);
        }
        if self.schema_dir.is_absolute() {
            return Err(ConfigError::AbsolutePath {
                field: "schemas.dir",
                path: self.schema_dir.clone(),
            });
        }
        if self.output_dir.is_absolute() {
            return Err(ConfigError::AbsolutePath {
                field: "output.dir",
                path: self.output_dir.clone(),
            });
        }
        for schema in &self.schemas {
            if schema.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "Schema file names cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Absolute schema source directory
    pub fn schema_dir_abs(&self) -> PathBuf {
        self.root.join(&self.schema_dir)
    }

    /// Absolute output directory
    pub fn output_dir_abs(&self) -> PathBuf {
        self.root.join(&self.output_dir)
    }
}

impl fmt::Debug for ProjectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectConfig")
            .field("root", &self.root)
            .field("language", &self.language.id())
            .field("schema_dir", &self.schema_dir)
            .field("schemas", &self.schemas)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}
