//! Registry of aggregated modules, owned by the editor session.

use std::collections::HashMap;

use thiserror::Error;

use crate::ir::translation::ModuleTranslationSet;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Module '{0}' is already registered")]
    AlreadyRegistered(String),
}

/// Module id → aggregated translations.
///
/// Every id is written at most once.
#[derive(Debug, Clone, Default)]
pub struct TranslationRegistry {
    /// 登録済みモジュール
    modules: HashMap<String, ModuleTranslationSet>,
}

impl TranslationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fully aggregated module.
    ///
    /// # Errors
    /// `AlreadyRegistered` if the id was written before; the stored entry is kept.
    pub fn register(&mut self, set: ModuleTranslationSet) -> Result<(), RegistryError> {
        if self.modules.contains_key(&set.module_id) {
            return Err(RegistryError::AlreadyRegistered(set.module_id));
        }
        tracing::debug!(
            module_id = %set.module_id,
            keys = set.translations.len(),
            "Registered module translations"
        );
        self.modules.insert(set.module_id.clone(), set);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, module_id: &str) -> Option<&ModuleTranslationSet> {
        self.modules.get(module_id)
    }

    #[must_use]
    pub fn contains(&self, module_id: &str) -> bool {
        self.modules.contains_key(module_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Registered modules for the module selector, by display name then id.
    #[must_use]
    pub fn modules(&self) -> Vec<&ModuleTranslationSet> {
        let mut modules: Vec<_> = self.modules.values().collect();
        modules.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.module_id.cmp(&b.module_id)));
        modules
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::ir::translation::TranslationTable;

    fn set(id: &str, name: &str) -> ModuleTranslationSet {
        let mut translations = TranslationTable::new();
        translations.insert("k", "en", id.to_string());
        ModuleTranslationSet {
            module_id: id.to_string(),
            name: name.to_string(),
            languages: Vec::new(),
            translations,
        }
    }

    #[rstest]
    fn register_is_write_once() {
        let mut registry = TranslationRegistry::new();

        assert_that!(registry.register(set("m", "First")), ok(anything()));
        assert!(matches!(
            registry.register(set("m", "Second")),
            Err(RegistryError::AlreadyRegistered(ref id)) if id == "m"
        ));
        assert_that!(registry.get("m").map(|s| s.name.as_str()), some(eq("First")));
        assert_that!(registry.len(), eq(1));
    }

    #[rstest]
    fn modules_are_sorted_by_name_then_id() {
        let mut registry = TranslationRegistry::new();
        registry.register(set("b", "Beta")).ok();
        registry.register(set("a2", "Alpha")).ok();
        registry.register(set("a1", "Alpha")).ok();

        let ids: Vec<_> = registry.modules().iter().map(|s| s.module_id.as_str()).collect();

        assert_eq!(ids, vec!["a1", "a2", "b"]);
    }

    #[rstest]
    fn empty_registry() {
        let registry = TranslationRegistry::new();

        assert!(registry.is_empty());
        assert!(registry.get("missing").is_none());
        assert!(!registry.contains("missing"));
    }
}
