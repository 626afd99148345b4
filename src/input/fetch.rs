//! Resource fetching for language files.
//!
//! The aggregator only sees [`ResourceFetcher`]; where bytes come from is up
//! to the host. [`FsFetcher`] serves a data directory, [`MemoryFetcher`]
//! serves fixed payloads and is used by tests and embedders.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Resource not found: {path}")]
    NotFound { path: String },
    #[error("Failed to read resource {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Timed out after {}ms fetching {path}", timeout.as_millis())]
    Timeout { path: String, timeout: Duration },
}

/// Fetches raw bytes for a resource locator.
pub trait ResourceFetcher {
    /// Returns the bytes behind `path`, or a [`FetchError`].
    fn fetch(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Reads resources relative to a data root directory.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub const fn root(&self) -> &PathBuf {
        &self.root
    }
}

impl ResourceFetcher for FsFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let full_path = self.root.join(path);
        tracing::debug!(path = %full_path.display(), "Reading resource");

        tokio::fs::read(&full_path).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                FetchError::NotFound { path: path.to_string() }
            } else {
                FetchError::Io { path: path.to_string(), source }
            }
        })
    }
}

/// Serves resources from memory, optionally after a per-path delay.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    resources: HashMap<String, Vec<u8>>,
    delays: HashMap<String, Duration>,
}

impl MemoryFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_resource(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.resources.insert(path.into(), content.into());
        self
    }

    /// Delays the response for `path`, to simulate slow fetches.
    #[must_use]
    pub fn with_delay(mut self, path: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(path.into(), delay);
        self
    }
}

impl ResourceFetcher for MemoryFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }

        self.resources
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound { path: path.to_string() })
    }
}
