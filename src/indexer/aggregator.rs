//! Translation aggregation.
//!
//! Folds every language file of a module into one key-indexed
//! [`TranslationTable`], then registers the result.

use std::collections::HashSet;
use std::time::Duration;

use futures::StreamExt;

use crate::config::EditorSettings;
use crate::editor::registry::TranslationRegistry;
use crate::indexer::types::{
    LoadErrorKind,
    LoadSummary,
    ResourceLoadFailure,
};
use crate::input::fetch::{
    FetchError,
    ResourceFetcher,
};
use crate::input::language_file::parse_language_file;
use crate::input::module::{
    LanguageDescriptor,
    ModuleDescriptor,
};
use crate::ir::translation::{
    ModuleTranslationSet,
    TranslationTable,
};

/// Loads and merges all language files of one module.
///
/// Files are fetched concurrently but merged in declared language order, so
/// key insertion order never depends on which fetch finished first.
/// A module without languages yields an empty table and language list.
///
/// # Errors
/// The first language file that fails to fetch or parse.
pub async fn load_translations_for_module<F: ResourceFetcher>(
    fetcher: &F,
    module: &ModuleDescriptor,
    settings: &EditorSettings,
) -> Result<(TranslationTable, Vec<LanguageDescriptor>), ResourceLoadFailure> {
    tracing::info!(module_id = %module.id, "Loading translations for {}.", module.name);

    let mut table = TranslationTable::new();
    if module.languages.is_empty() {
        return Ok((table, Vec::new()));
    }

    let timeout = settings.fetch_timeout_ms.map(Duration::from_millis);
    let files = futures::future::try_join_all(
        module
            .languages
            .iter()
            .map(|language| load_language_file(fetcher, module, language, settings, timeout)),
    )
    .await?;

    for (language, entries) in module.languages.iter().zip(files) {
        tracing::debug!(lang = %language.lang, keys = entries.len(), "Merging language file");
        for (key, text) in entries {
            table.insert(&key, &language.lang, text);
        }
    }

    Ok((table, module.languages.clone()))
}

/// Fetches and parses a single language file.
async fn load_language_file<F: ResourceFetcher>(
    fetcher: &F,
    module: &ModuleDescriptor,
    language: &LanguageDescriptor,
    settings: &EditorSettings,
    timeout: Option<Duration>,
) -> Result<Vec<(String, String)>, ResourceLoadFailure> {
    tracing::debug!(lang = %language.lang, path = %language.path, "Current language key");

    let failure = |kind: LoadErrorKind| ResourceLoadFailure {
        module_id: module.id.clone(),
        lang: language.lang.clone(),
        path: language.path.clone(),
        kind,
    };

    let fetched = match timeout {
        Some(timeout) => tokio::time::timeout(timeout, fetcher.fetch(&language.path))
            .await
            .unwrap_or_else(|_| Err(FetchError::Timeout { path: language.path.clone(), timeout })),
        None => fetcher.fetch(&language.path).await,
    };
    let bytes = fetched.map_err(|e| failure(e.into()))?;

    parse_language_file(&bytes, settings.nested_keys, &settings.key_separator)
        .map_err(|e| failure(e.into()))
}

/// Aggregates every active module and registers the non-empty results.
///
/// Modules run concurrently, bounded by `indexing.maxConcurrentModules`.
/// Each module is registered only after its own aggregation has completed;
/// a failing module is left out of the registry and does not affect others.
/// When several active modules share an id, only the first in `modules` is
/// aggregated and the rest are reported in [`LoadSummary::duplicates`].
pub async fn load_translations<F: ResourceFetcher>(
    fetcher: &F,
    modules: &[ModuleDescriptor],
    settings: &EditorSettings,
    registry: &mut TranslationRegistry,
) -> LoadSummary {
    let mut summary = LoadSummary::default();

    let mut active = Vec::new();
    let mut seen = HashSet::new();
    for module in modules {
        if !module.active {
            summary.inactive.push(module.id.clone());
        } else if seen.insert(module.id.as_str()) {
            active.push(module);
        } else {
            tracing::warn!(module_id = %module.id, "Duplicate module id, keeping the first declaration");
            summary.duplicates.push(module.id.clone());
        }
    }

    let concurrency = settings.indexing.effective_concurrency();
    tracing::debug!(modules = active.len(), concurrency, "Aggregating active modules");

    let mut results = futures::stream::iter(active.into_iter().map(|module| async move {
        (module, load_translations_for_module(fetcher, module, settings).await)
    }))
    .buffer_unordered(concurrency);

    while let Some((module, result)) = results.next().await {
        match result {
            Ok((translations, _)) if translations.is_empty() => {
                tracing::debug!(module_id = %module.id, "No translations found, skipping");
                summary.empty.push(module.id.clone());
            }
            Ok((translations, languages)) => {
                let set = ModuleTranslationSet {
                    module_id: module.id.clone(),
                    name: module.name.clone(),
                    languages,
                    translations,
                };
                match registry.register(set) {
                    Ok(()) => summary.registered.push(module.id.clone()),
                    Err(error) => {
                        tracing::warn!("{error}");
                        summary.duplicates.push(module.id.clone());
                    }
                }
            }
            Err(failure) => {
                tracing::warn!(module_id = %module.id, "Skipping module: {failure}");
                summary.failed.push(failure);
            }
        }
    }

    tracing::info!(
        registered = summary.registered.len(),
        failed = summary.failed.len(),
        "Finished loading translations"
    );

    summary
}
