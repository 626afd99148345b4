//! Indexer type definitions.

use thiserror::Error;

use crate::input::fetch::FetchError;
use crate::input::language_file::LanguageFileError;
use crate::input::module::ManifestError;

/// A language file could not be fetched or parsed.
///
/// Aborts aggregation of the owning module only.
#[derive(Error, Debug)]
#[error("Failed to load language '{lang}' of module '{module_id}' from {path}: {kind}")]
pub struct ResourceLoadFailure {
    pub module_id: String,
    pub lang: String,
    pub path: String,
    #[source]
    pub kind: LoadErrorKind,
}

#[derive(Error, Debug)]
pub enum LoadErrorKind {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Parse(#[from] LanguageFileError),
}

#[derive(Error, Debug)]
pub enum IndexerError {
    /// Invalid manifest or exclude pattern.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
    #[error("Data directory not found: {0}")]
    InvalidPath(String),
}

/// A manifest that was found but skipped during discovery.
#[derive(Debug)]
pub struct SkippedManifest {
    pub path: String,
    pub error: ManifestError,
}

/// Outcome of aggregating a list of modules.
#[derive(Debug, Default)]
pub struct LoadSummary {
    /// Registered module ids, in completion order.
    pub registered: Vec<String>,
    /// Modules the host flagged inactive.
    pub inactive: Vec<String>,
    /// Modules without any translation key.
    pub empty: Vec<String>,
    /// Modules whose aggregation failed.
    pub failed: Vec<ResourceLoadFailure>,
    /// Modules left out because their id was already declared or registered.
    pub duplicates: Vec<String>,
}

impl LoadSummary {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.duplicates.is_empty()
    }
}
