use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::input::language_file::NestedKeyPolicy;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "excludePatterns[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorSettings {
    /// Current UI language. Preferred as the "from" column when a module has it.
    pub language: String,

    /// Ids of active modules.
    ///
    /// - `None`: every discovered module is active (default)
    /// - `Some([...])`: only the listed modules are loaded
    pub active_modules: Option<Vec<String>>,

    /// Glob (relative to the data root) matching module manifests.
    pub manifest_pattern: String,
    pub exclude_patterns: Vec<String>,

    pub nested_keys: NestedKeyPolicy,
    /// Used to join nested keys when `nestedKeys` is `flatten`.
    pub key_separator: String,

    /// Per language file fetch timeout. Unset waits indefinitely.
    pub fetch_timeout_ms: Option<u64>,

    pub indexing: IndexingConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexingConfig {
    /// Modules aggregated concurrently.
    /// Default: 80% of CPU cores (minimum 1).
    pub max_concurrent_modules: Option<usize>,
}

impl IndexingConfig {
    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrent_modules.unwrap_or_else(|| (num_cpus::get() * 4 / 5).max(1))
    }
}

impl EditorSettings {
    /// Whether a module id is active under these settings.
    #[must_use]
    pub fn is_active(&self, module_id: &str) -> bool {
        self.active_modules.as_ref().is_none_or(|ids| ids.iter().any(|id| id == module_id))
    }

    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Zero concurrency or timeout
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.language.trim().is_empty() {
            errors.push(ValidationError::new(
                "language",
                "The language cannot be empty. Example: \"en\"",
            ));
        }

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if self.manifest_pattern.is_empty() {
            errors.push(ValidationError::new(
                "manifestPattern",
                "The pattern cannot be empty. Example: \"modules/*/module.json\"",
            ));
        } else if let Err(e) = globset::Glob::new(&self.manifest_pattern) {
            errors.push(ValidationError::new(
                "manifestPattern",
                format!("Invalid glob pattern '{}': {e}", self.manifest_pattern),
            ));
        }

        for (index, pattern) in self.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if let Some(ids) = &self.active_modules {
            for (index, id) in ids.iter().enumerate() {
                if id.trim().is_empty() {
                    errors.push(ValidationError::new(
                        format!("activeModules[{index}]"),
                        "Module ids cannot be empty",
                    ));
                }
            }
        }

        if self.fetch_timeout_ms == Some(0) {
            errors.push(ValidationError::new(
                "fetchTimeoutMs",
                "The timeout must be greater than 0, or remove this field to wait indefinitely",
            ));
        }

        if self.indexing.max_concurrent_modules == Some(0) {
            errors.push(ValidationError::new(
                "indexing.maxConcurrentModules",
                "At least one module must be processed at a time",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            active_modules: None,
            manifest_pattern: "modules/*/module.json".to_string(),
            exclude_patterns: vec!["node_modules/**".to_string()],
            nested_keys: NestedKeyPolicy::default(),
            key_separator: ".".to_string(),
            fetch_timeout_ms: None,
            indexing: IndexingConfig::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[rstest]
    fn validate_valid_settings() {
        let settings = EditorSettings::default();

        assert_that!(settings.validate(), ok(anything()));
    }

    #[rstest]
    fn deserialize_partial_settings() {
        let json = r#"{"language": "fr", "nestedKeys": "flatten"}"#;

        let settings: EditorSettings = serde_json::from_str(json).unwrap();

        assert_that!(settings.language, eq("fr"));
        assert_that!(settings.nested_keys, eq(NestedKeyPolicy::Flatten));
        assert_that!(settings.key_separator, eq("."));
        assert_that!(settings.manifest_pattern, eq("modules/*/module.json"));
    }

    #[rstest]
    fn deserialize_empty_settings() {
        let settings: EditorSettings = serde_json::from_str("{}").unwrap();

        assert_that!(settings.language, eq("en"));
        assert_that!(settings.active_modules, none());
        assert_that!(settings.fetch_timeout_ms, none());
        assert_that!(settings.exclude_patterns, len(eq(1)));
    }

    #[rstest]
    #[case::all_active_when_unset(None, "any", true)]
    #[case::listed(Some(vec!["a".to_string()]), "a", true)]
    #[case::not_listed(Some(vec!["a".to_string()]), "b", false)]
    #[case::empty_list(Some(vec![]), "a", false)]
    fn is_active(#[case] active: Option<Vec<String>>, #[case] id: &str, #[case] expected: bool) {
        let settings = EditorSettings { active_modules: active, ..EditorSettings::default() };

        assert_that!(settings.is_active(id), eq(expected));
    }

    #[rstest]
    fn validate_invalid_key_separator_empty() {
        let settings = EditorSettings { key_separator: String::new(), ..EditorSettings::default() };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("keySeparator")),
                field!(ValidationError.message, contains_substring("cannot be empty"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_manifest_pattern() {
        let settings = EditorSettings {
            manifest_pattern: "modules/{a,b/module.json".to_string(),
            ..EditorSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![all![
                field!(ValidationError.field_path, eq("manifestPattern")),
                field!(ValidationError.message, contains_substring("Invalid glob pattern"))
            ]])
        );
    }

    #[rstest]
    fn validate_invalid_exclude_pattern() {
        let settings = EditorSettings {
            exclude_patterns: vec!["dist/**".to_string(), "invalid[pattern".to_string()],
            ..EditorSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![field!(ValidationError.field_path, eq("excludePatterns[1]"))])
        );
    }

    #[rstest]
    fn validate_zero_timeout_and_concurrency() {
        let settings = EditorSettings {
            fetch_timeout_ms: Some(0),
            indexing: IndexingConfig { max_concurrent_modules: Some(0) },
            ..EditorSettings::default()
        };

        assert_that!(
            settings.validate(),
            err(elements_are![
                field!(ValidationError.field_path, eq("fetchTimeoutMs")),
                field!(ValidationError.field_path, eq("indexing.maxConcurrentModules"))
            ])
        );
    }

    #[rstest]
    fn effective_concurrency_is_at_least_one() {
        let indexing = IndexingConfig::default();

        assert_that!(indexing.effective_concurrency(), ge(1));
    }

    #[rstest]
    fn config_error_validation_errors_format() {
        let settings = EditorSettings {
            language: String::new(),
            key_separator: String::new(),
            ..EditorSettings::default()
        };

        let errors = settings.validate().unwrap_err();
        let config_error = ConfigError::ValidationErrors(errors);

        let error_message = format!("{config_error}");
        assert_that!(error_message, contains_substring("Configuration validation failed"));
        assert_that!(error_message, contains_substring("1. language"));
        assert_that!(error_message, contains_substring("2. keySeparator"));
    }
}
