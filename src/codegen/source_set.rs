//! Generated source set
//!
//! The analog of the original build-tool contract "add the generated
//! directory to the compile source set": after a run, the [`SourceSet`]
//! names the source root a consumer registers with its compiler and every
//! generated file found under it.

use super::CodegenError;
use crate::languages::TargetLanguage;
use ignore::WalkBuilder;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// The source roots and files produced by a generation run
#[derive(Debug, Clone, Serialize)]
pub struct SourceSet {
    /// Directory to register as a compiler source root
    pub source_root: PathBuf,

    /// Generated source files, relative to the source root
    pub files: Vec<PathBuf>,
}

impl SourceSet {
    /// Collects the generated sources under the output directory
    ///
    /// Only files with the target language's extension count; the
    /// fingerprint file and any tool droppings are ignored.
    pub fn collect(
        language: &dyn TargetLanguage,
        output_dir: &Path,
    ) -> Result<Self, CodegenError> {
        let source_root = language.source_root(output_dir);
        let mut files = Vec::new();

        if source_root.is_dir() {
            // Generated output is not under ignore-file control; walk everything
            for entry in WalkBuilder::new(&source_root)
                .standard_filters(false)
                .build()
            {
                let entry = entry?;
                if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                    continue;
                }
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) == Some(language.file_extension()) {
                    files.push(path.strip_prefix(&source_root).unwrap_or(path).to_path_buf());
                }
            }
        }

        files.sort();
        Ok(Self { source_root, files })
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}
