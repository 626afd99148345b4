//! Module discovery and translation aggregation.

pub mod aggregator;
pub mod types;
pub mod workspace;

pub use aggregator::{
    load_translations,
    load_translations_for_module,
};
pub use types::{
    IndexerError,
    LoadErrorKind,
    LoadSummary,
    ResourceLoadFailure,
};
pub use workspace::{
    Discovery,
    discover_modules,
};
