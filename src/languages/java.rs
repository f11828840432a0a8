//! Java target language

use super::{LanguageId, TargetLanguage};
use convert_case::{Case, Casing};
use std::path::Path;

pub struct JavaLanguage;

impl TargetLanguage for JavaLanguage {
    fn id(&self) -> LanguageId {
        LanguageId::Java
    }

    fn file_extension(&self) -> &'static str {
        "java"
    }

    fn default_schema_dir(&self) -> &'static str {
        "src/main/ion-schema"
    }

    fn default_output_dir(&self) -> &'static str {
        "generated/ion-schema/java"
    }

    fn generated_file_name(&self, type_name: &str) -> String {
        format!("{}.java", type_name.to_case(Case::UpperCamel))
    }

    fn include_hint(&self, output_dir: &Path, _type_name: &str) -> String {
        format!(
            "add '{}' to the compiler's source roots (e.g. sourceSets.main.java.srcDir)",
            output_dir.display()
        )
    }
}
