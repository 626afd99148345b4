//! Module descriptors and module manifest parsing.

use std::path::{
    Component,
    Path,
};

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// One declared language file of a module.
///
/// Identity is `lang`, which is unique within a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDescriptor {
    /// Language code (e.g. "en", "pt-BR").
    pub lang: String,
    /// Display name shown in the language selectors and the table header.
    pub name: String,
    /// Resource locator handed to the fetcher.
    pub path: String,
}

impl LanguageDescriptor {
    #[must_use]
    pub fn new(lang: impl Into<String>, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self { lang: lang.into(), name: name.into(), path: path.into() }
    }
}

/// A content module as exposed by the host registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDescriptor {
    pub id: String,
    /// Display title.
    pub name: String,
    pub active: bool,
    /// Declaration order drives default pair selection and column order.
    pub languages: Vec<LanguageDescriptor>,
}

impl ModuleDescriptor {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), active: true, languages: Vec::new() }
    }

    #[must_use]
    pub fn with_language(mut self, language: LanguageDescriptor) -> Self {
        self.languages.push(language);
        self
    }

    #[must_use]
    pub const fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read manifest {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse manifest {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Manifest {path} declares neither 'id' nor 'name'")]
    MissingId { path: String },
    #[error("Language path '{language_path}' in manifest {path} escapes the data directory")]
    PathEscapesRoot { path: String, language_path: String },
    #[error("Manifest {path} declares language '{lang}' more than once")]
    DuplicateLanguage { path: String, lang: String },
    #[error("Module id '{id}' in {path} is already declared by {first_path}")]
    DuplicateId { path: String, id: String, first_path: String },
}

/// On-disk shape of a `module.json` manifest. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawManifest {
    /// Module id.
    id: Option<String>,
    /// Legacy id field of older manifests.
    name: Option<String>,
    /// Display title.
    title: Option<String>,
    /// Declared language files, paths relative to the manifest.
    #[serde(default)]
    languages: Vec<LanguageDescriptor>,
}

/// Parses a module manifest.
///
/// `manifest_path` is relative to the data root; language paths in the
/// manifest are relative to the manifest's directory and get rewritten into
/// data-root-relative, `/`-separated locators.
pub fn parse_manifest(
    manifest_path: &Path,
    content: &str,
    active: impl FnOnce(&str) -> bool,
) -> Result<ModuleDescriptor, ManifestError> {
    let display_path = to_locator(manifest_path);
    let raw: RawManifest = serde_json::from_str(content)
        .map_err(|source| ManifestError::Parse { path: display_path.clone(), source })?;

    let Some(id) = raw.id.or(raw.name) else {
        return Err(ManifestError::MissingId { path: display_path });
    };
    let name = raw.title.unwrap_or_else(|| id.clone());

    let module_dir = manifest_path.parent().unwrap_or_else(|| Path::new(""));
    let mut languages = Vec::with_capacity(raw.languages.len());
    for language in raw.languages {
        if languages.iter().any(|known: &LanguageDescriptor| known.lang == language.lang) {
            return Err(ManifestError::DuplicateLanguage { path: display_path, lang: language.lang });
        }
        let Some(path) = resolve_relative(module_dir, &language.path) else {
            return Err(ManifestError::PathEscapesRoot {
                path: display_path,
                language_path: language.path,
            });
        };
        languages.push(LanguageDescriptor { path, ..language });
    }

    let active = active(&id);
    Ok(ModuleDescriptor { id, name, active, languages })
}

/// Joins `relative` onto `base` lexically, rejecting paths that climb above the root.
fn resolve_relative(base: &Path, relative: &str) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for component in base.join(relative).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(parts.join("/"))
}

/// Path as a `/`-separated locator.
fn to_locator(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[googletest::test]
    fn parse_manifest_resolves_language_paths() {
        let content = r#"{
  "id": "my-module",
  "title": "My Module",
  "version": "1.0.0",
  "languages": [
    { "lang": "en", "name": "English", "path": "lang/en.json" },
    { "lang": "de", "name": "Deutsch", "path": "./lang/../lang/de.json" }
  ]
}"#;

        let module =
            parse_manifest(Path::new("modules/my-module/module.json"), content, |_| true).unwrap();

        expect_that!(module.id, eq("my-module"));
        expect_that!(module.name, eq("My Module"));
        expect_that!(module.active, eq(true));
        expect_that!(module.languages, len(eq(2)));
        assert_eq!(
            module.languages.iter().map(|l| l.path.as_str()).collect::<Vec<_>>(),
            vec!["modules/my-module/lang/en.json", "modules/my-module/lang/de.json"]
        );
    }

    #[googletest::test]
    fn parse_manifest_falls_back_to_legacy_name() {
        let content = r#"{ "name": "legacy" }"#;

        let module = parse_manifest(Path::new("modules/legacy/module.json"), content, |id| {
            id == "other"
        })
        .unwrap();

        expect_that!(module.id, eq("legacy"));
        expect_that!(module.name, eq("legacy"));
        expect_that!(module.active, eq(false));
        expect_that!(module.languages, len(eq(0)));
    }

    #[rstest]
    fn parse_manifest_without_id_fails() {
        let result = parse_manifest(Path::new("modules/x/module.json"), r#"{"title": "X"}"#, |_| {
            true
        });

        assert!(matches!(result, Err(ManifestError::MissingId { .. })));
    }

    #[rstest]
    fn parse_manifest_rejects_escaping_paths() {
        let content = r#"{ "id": "x", "languages": [
            { "lang": "en", "name": "English", "path": "../../../etc/en.json" }
        ] }"#;

        let result = parse_manifest(Path::new("modules/x/module.json"), content, |_| true);

        assert!(matches!(result, Err(ManifestError::PathEscapesRoot { .. })));
    }

    #[rstest]
    fn parse_manifest_rejects_duplicate_language() {
        let content = r#"{ "id": "x", "languages": [
            { "lang": "en", "name": "English", "path": "en.json" },
            { "lang": "fr", "name": "French", "path": "fr.json" },
            { "lang": "en", "name": "English (UK)", "path": "en-gb.json" }
        ] }"#;

        let result = parse_manifest(Path::new("modules/x/module.json"), content, |_| true);

        assert!(matches!(
            result,
            Err(ManifestError::DuplicateLanguage { ref path, ref lang })
                if path == "modules/x/module.json" && lang == "en"
        ));
    }

    #[rstest]
    fn parse_manifest_invalid_json() {
        let result = parse_manifest(Path::new("modules/x/module.json"), "not json", |_| true);

        assert!(matches!(result, Err(ManifestError::Parse { .. })));
    }

    #[rstest]
    #[case("modules/a", "lang/en.json", Some("modules/a/lang/en.json"))]
    #[case("modules/a", "../b/en.json", Some("modules/b/en.json"))]
    #[case("", "en.json", Some("en.json"))]
    #[case("modules", "../../en.json", None)]
    fn test_resolve_relative(#[case] base: &str, #[case] relative: &str, #[case] expected: Option<&str>) {
        assert_eq!(resolve_relative(Path::new(base), relative).as_deref(), expected);
    }
}
