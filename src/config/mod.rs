//! Editor configuration: settings file, validation and manager.
mod loader;
mod manager;
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::{
    ConfigManager,
    SettingsOverrides,
};
pub use types::{
    ConfigError,
    EditorSettings,
    IndexingConfig,
    ValidationError,
};
