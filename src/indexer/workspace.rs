//! Module discovery in a data directory.
//!
//! Stands in for the host's module registry: every manifest matching
//! `manifestPattern` becomes a [`ModuleDescriptor`].
use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};
use ignore::WalkBuilder;

use crate::config::EditorSettings;
use crate::indexer::types::{
    IndexerError,
    SkippedManifest,
};
use crate::input::module::{
    ManifestError,
    ModuleDescriptor,
    parse_manifest,
};

/// Modules found under a data root.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Parsed modules, sorted by id.
    pub modules: Vec<ModuleDescriptor>,
    /// Manifests that could not be read or parsed.
    pub skipped: Vec<SkippedManifest>,
}

/// Scans `data_root` for module manifests.
///
/// # Errors
/// - The data root does not exist
/// - A configured glob pattern is invalid
pub async fn discover_modules(
    data_root: &Path,
    settings: &EditorSettings,
) -> Result<Discovery, IndexerError> {
    tracing::debug!(data_root = %data_root.display(), "Discovering modules");
    if !data_root.is_dir() {
        return Err(IndexerError::InvalidPath(data_root.display().to_string()));
    }

    let manifests =
        find_manifests(data_root, &settings.manifest_pattern, &settings.exclude_patterns)?;

    // マニフェストはパス順なので、同じ id は最初のパスが常に勝つ
    let mut first_paths: HashMap<String, String> = HashMap::new();
    let mut discovery = Discovery::default();
    for relative_path in manifests {
        let display_path = relative_path.display().to_string();
        let content = match tokio::fs::read_to_string(data_root.join(&relative_path)).await {
            Ok(content) => content,
            Err(source) => {
                tracing::warn!("Failed to read manifest {:?}: {}", relative_path, source);
                discovery.skipped.push(SkippedManifest {
                    path: display_path.clone(),
                    error: ManifestError::Io { path: display_path, source },
                });
                continue;
            }
        };

        match parse_manifest(&relative_path, &content, |id| settings.is_active(id)) {
            Ok(module) if first_paths.contains_key(&module.id) => {
                let first_path = first_paths.get(&module.id).cloned().unwrap_or_default();
                let error =
                    ManifestError::DuplicateId { path: display_path.clone(), id: module.id, first_path };
                tracing::warn!("Skipping manifest: {error}");
                discovery.skipped.push(SkippedManifest { path: display_path, error });
            }
            Ok(module) => {
                first_paths.insert(module.id.clone(), display_path);
                tracing::debug!(
                    module_id = %module.id,
                    languages = module.languages.len(),
                    active = module.active,
                    "Found module"
                );
                discovery.modules.push(module);
            }
            Err(error) => {
                tracing::warn!("Skipping manifest: {error}");
                discovery.skipped.push(SkippedManifest { path: display_path, error });
            }
        }
    }

    discovery.modules.sort_by(|a, b| a.id.cmp(&b.id));
    tracing::info!(modules = discovery.modules.len(), "Module discovery complete");

    Ok(discovery)
}

/// Builds a glob set, reporting the first invalid pattern.
fn build_glob_set<'a>(
    patterns: impl IntoIterator<Item = &'a String>,
) -> Result<GlobSet, IndexerError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| IndexerError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| IndexerError::InvalidPattern { pattern: String::new(), message: e.to_string() })
}

/// マニフェストファイルを検索（データルートからの相対パスを返す）
fn find_manifests(
    data_root: &Path,
    manifest_pattern: &str,
    exclude_patterns: &[String],
) -> Result<Vec<PathBuf>, IndexerError> {
    let include_set = build_glob_set([&manifest_pattern.to_string()])?;
    let exclude_set = build_glob_set(exclude_patterns)?;

    let mut found = Vec::new();
    for result in WalkBuilder::new(data_root)
        .hidden(false)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let Ok(relative_path) = entry.path().strip_prefix(data_root) else {
            continue;
        };
        if !include_set.is_match(relative_path) || exclude_set.is_match(relative_path) {
            continue;
        }

        found.push(relative_path.to_path_buf());
    }

    found.sort();
    Ok(found)
}
