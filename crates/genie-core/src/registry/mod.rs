//! Static lookup tables for libraries and features
//!
//! Registries are immutable once built. The CLI builds the built-in set once
//! ([`Registries::builtin`]) and hands it to every command; tests can build
//! their own tables with [`Registry::new`].

pub mod features;
pub mod libraries;
pub mod prompts;

use crate::error::GenieError;
use crate::stack::{StateManagement, UiLibrary};

pub use features::{FeatureContext, FeatureEntry, FeatureId, FeatureOptions};
pub use libraries::{ConfigFile, LibraryCategory, LibraryEntry};
pub use prompts::{PromptAnswer, PromptAnswers, PromptKind, PromptOption, PromptSpec};

/// Anything stored in a [`Registry`]
pub trait RegistryEntry {
    /// Identifier users type on the command line
    fn key(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    fn description(&self) -> &str;
}

/// Ordered, read-only table of entries keyed by identifier
#[derive(Debug, Clone)]
pub struct Registry<E> {
    kind: &'static str,
    entries: Vec<E>,
}

impl<E: RegistryEntry> Registry<E> {
    /// `kind` names the table in user-facing errors (e.g. "feature")
    pub fn new(kind: &'static str, entries: Vec<E>) -> Self {
        Self { kind, entries }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Find an entry by key (case-insensitive)
    pub fn lookup(&self, key: &str) -> Option<&E> {
        let key = key.trim();
        self.entries
            .iter()
            .find(|entry| entry.key().eq_ignore_ascii_case(key))
    }

    /// Find an entry or fail with a message listing the valid keys
    pub fn require(&self, key: &str) -> Result<&E, GenieError> {
        self.lookup(key)
            .ok_or_else(|| GenieError::not_found(self.kind, key, self.keys()))
    }

    /// Every entry in declaration order
    pub fn list_all(&self) -> &[E] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All registries a command may consult
#[derive(Debug, Clone)]
pub struct Registries {
    pub ui: Registry<LibraryEntry>,
    pub state: Registry<LibraryEntry>,
    pub libraries: Registry<LibraryEntry>,
    pub features: Registry<FeatureEntry>,
}

impl Registries {
    /// The tables shipped with the CLI
    pub fn builtin() -> Self {
        Self {
            ui: Registry::new("UI library", libraries::ui_libraries()),
            state: Registry::new("state management library", libraries::state_libraries()),
            libraries: Registry::new("library", libraries::extra_libraries()),
            features: Registry::new("feature", features::builtin_features()),
        }
    }

    pub fn ui_library(&self, library: UiLibrary) -> Option<&LibraryEntry> {
        self.ui.lookup(library.as_str())
    }

    pub fn state_library(&self, library: StateManagement) -> Option<&LibraryEntry> {
        self.state.lookup(library.as_str())
    }

    /// Entries of one extra-library category, in declaration order
    pub fn libraries_in(&self, category: LibraryCategory) -> Vec<&LibraryEntry> {
        self.libraries
            .list_all()
            .iter()
            .filter(|entry| entry.category == category)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_stack_choice_has_an_entry() {
        let registries = Registries::builtin();
        for lib in UiLibrary::ALL {
            assert!(registries.ui_library(lib).is_some(), "missing {}", lib);
        }
        for lib in StateManagement::ALL {
            assert!(registries.state_library(lib).is_some(), "missing {}", lib);
        }
    }

    #[test]
    fn test_list_all_keeps_declaration_order() {
        let registries = Registries::builtin();
        let keys: Vec<&str> = registries.features.keys().collect();
        assert_eq!(keys, vec!["auth", "payments", "chat", "camera", "maps"]);
        let again: Vec<&str> = registries.features.keys().collect();
        assert_eq!(keys, again);
    }

    #[test]
    fn test_require_unknown_key() {
        let registries = Registries::builtin();
        let err = registries.features.require("payment").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Unknown feature 'payment'"));
        assert!(message.contains("payments"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registries = Registries::builtin();
        assert!(registries.features.lookup("Camera").is_some());
        assert!(registries.libraries.lookup("ZOD").is_some());
    }

    #[test]
    fn test_extra_library_keys_are_unique() {
        let registries = Registries::builtin();
        let mut keys: Vec<&str> = registries.libraries.keys().collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }

    #[test]
    fn test_libraries_in_category() {
        let registries = Registries::builtin();
        let validation: Vec<&str> = registries
            .libraries_in(LibraryCategory::Validation)
            .iter()
            .map(|e| e.key)
            .collect();
        assert_eq!(validation, vec!["zod", "yup"]);
    }

    #[test]
    fn test_custom_registry_can_be_substituted() {
        let custom = Registry::new(
            "library",
            vec![LibraryEntry {
                key: "only",
                name: "Only",
                description: "single entry",
                category: LibraryCategory::Testing,
                packages: &[],
                dev_packages: &["only"],
                config_files: &[],
                setup: &[],
            }],
        );
        assert_eq!(custom.len(), 1);
        assert!(custom.require("other").is_err());
    }
}
