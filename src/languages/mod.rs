//! Target language definitions
//!
//! Target languages are first-class entities: each one knows the flag value
//! the generator tool expects, where the tool places generated files under
//! the output root, and how those files get wired into a downstream build
//! (a compiler source root for Java, `include!`-able files for Rust).

use std::path::{Path, PathBuf};

/// Identifier for a supported target language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageId {
    Java,
    Rust,
}

impl LanguageId {
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageId::Java => "java",
            LanguageId::Rust => "rust",
        }
    }
}

impl std::fmt::Display for LanguageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target language trait
pub trait TargetLanguage: Send + Sync {
    fn id(&self) -> LanguageId;

    /// The value passed to the generator tool's `-l` flag
    fn flag(&self) -> &'static str {
        self.id().as_str()
    }

    /// Extension of generated source files ("java", "rs")
    fn file_extension(&self) -> &'static str;

    /// Subdirectory the tool creates under the output root, if any.
    /// The Rust generator nests everything under `ion_data_model`; the Java
    /// generator writes its package tree directly at the output root.
    fn generated_subdir(&self) -> Option<&'static str> {
        None
    }

    /// Default schema source directory, relative to the project root
    fn default_schema_dir(&self) -> &'static str;

    /// Default output directory, relative to the project root
    fn default_output_dir(&self) -> &'static str;

    /// File name the generator produces for a schema type name
    fn generated_file_name(&self, type_name: &str) -> String;

    /// Directory a consumer registers as a compile source root
    fn source_root(&self, output_dir: &Path) -> PathBuf {
        match self.generated_subdir() {
            Some(sub) => output_dir.join(sub),
            None => output_dir.to_path_buf(),
        }
    }

    /// A human-oriented hint for pulling one generated file into a build
    fn include_hint(&self, output_dir: &Path, type_name: &str) -> String;
}

pub mod java;
pub mod registry;
pub mod rust;

pub use java::JavaLanguage;
pub use registry::LanguageRegistry;
pub use rust::RustLanguage;
