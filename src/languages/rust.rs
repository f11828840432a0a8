//! Rust target language

use super::{LanguageId, TargetLanguage};
use convert_case::{Case, Casing};
use std::path::Path;

/// Subdirectory the Rust generator nests its output under
const GENERATED_SUBDIR: &str = "ion_data_model";

pub struct RustLanguage;

impl TargetLanguage for RustLanguage {
    fn id(&self) -> LanguageId {
        LanguageId::Rust
    }

    fn file_extension(&self) -> &'static str {
        "rs"
    }

    fn generated_subdir(&self) -> Option<&'static str> {
        Some(GENERATED_SUBDIR)
    }

    fn default_schema_dir(&self) -> &'static str {
        "schema"
    }

    fn default_output_dir(&self) -> &'static str {
        "generated/ion-schema/rust"
    }

    fn generated_file_name(&self, type_name: &str) -> String {
        format!("{}.rs", type_name.to_case(Case::Snake))
    }

    fn include_hint(&self, output_dir: &Path, type_name: &str) -> String {
        format!(
            "include!(\"{}/{}/{}\");",
            output_dir.display(),
            GENERATED_SUBDIR,
            self.generated_file_name(type_name)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_rust_identity() {
        let lang = RustLanguage;
        assert_eq!(lang.id(), LanguageId::Rust);
        assert_eq!(lang.flag(), "rust");
        assert_eq!(lang.file_extension(), "rs");
    }

    #[test]
    fn test_rust_generated_file_name_snake() {
        let lang = RustLanguage;
        assert_eq!(
            lang.generated_file_name("StructWithFields"),
            "struct_with_fields.rs"
        );
    }

    #[test]
    fn test_rust_source_root_nests_under_data_model() {
        let lang = RustLanguage;
        let out = PathBuf::from("out");
        assert_eq!(lang.source_root(&out), PathBuf::from("out/ion_data_model"));
    }

    #[test]
    fn test_rust_include_hint_points_at_generated_file() {
        let lang = RustLanguage;
        let hint = lang.include_hint(&PathBuf::from("out"), "StructWithFields");
        assert!(hint.contains("out/ion_data_model/struct_with_fields.rs"));
    }
}
