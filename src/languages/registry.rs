//! Target language registry

use super::{JavaLanguage, LanguageId, RustLanguage, TargetLanguage};
use std::sync::Arc;

/// Registry of target languages
#[derive(Clone)]
pub struct LanguageRegistry {
    languages: Vec<Arc<dyn TargetLanguage>>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self {
            languages: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(JavaLanguage));
        registry.register(Arc::new(RustLanguage));
        registry
    }

    pub fn register(&mut self, language: Arc<dyn TargetLanguage>) {
        self.languages.push(language);
    }

    /// Look up a language by its flag value ("java", "rust"), case-insensitive
    pub fn get(&self, name: &str) -> Option<Arc<dyn TargetLanguage>> {
        self.languages
            .iter()
            .find(|l| l.flag().eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn get_by_id(&self, id: LanguageId) -> Option<Arc<dyn TargetLanguage>> {
        self.languages.iter().find(|l| l.id() == id).cloned()
    }

    /// All registered flag values, for error messages and help text
    pub fn names(&self) -> Vec<&'static str> {
        self.languages.iter().map(|l| l.flag()).collect()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
