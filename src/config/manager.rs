//! 設定の管理
//!
//! 設定ファイルの内容に CLI 引数の上書きを重ね、検証済みの実効設定だけを公開する。

use std::path::{
    Path,
    PathBuf,
};

use super::loader::read_settings_file;
use super::{
    ConfigError,
    EditorSettings,
};

/// コマンドラインからの上書き
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    /// `--lang`
    pub language: Option<String>,
    /// `--active`（空なら上書きしない）
    pub active_modules: Vec<String>,
}

impl SettingsOverrides {
    /// `base` に上書きを適用した設定を返す
    #[must_use]
    pub fn apply_to(&self, base: &EditorSettings) -> EditorSettings {
        let mut settings = base.clone();
        if let Some(language) = &self.language {
            settings.language.clone_from(language);
        }
        if !self.active_modules.is_empty() {
            settings.active_modules = Some(self.active_modules.clone());
        }
        settings
    }
}

/// 設定を管理する
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 設定ファイル（なければデフォルト）の内容
    file_settings: EditorSettings,
    /// 読み込んだ設定ファイルのパス
    config_path: Option<PathBuf>,
    /// CLI 引数による上書き
    overrides: SettingsOverrides,
    /// 上書き適用後の検証済み設定
    effective: EditorSettings,
}

impl ConfigManager {
    /// デフォルト設定で作成
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 上書きを指定して作成
    #[must_use]
    pub fn with_overrides(overrides: SettingsOverrides) -> Self {
        let effective = overrides.apply_to(&EditorSettings::default());
        Self { overrides, effective, ..Self::default() }
    }

    /// データディレクトリの設定ファイルを読み込む
    ///
    /// 上書き適用後の設定が不正ならエラーを返し、現在の設定を維持する。
    pub fn load_settings(&mut self, data_root: &Path) -> Result<(), ConfigError> {
        let (file_settings, config_path) = match read_settings_file(data_root)? {
            Some(file) => (file.settings, Some(file.path)),
            None => (EditorSettings::default(), None),
        };

        let effective = self.overrides.apply_to(&file_settings);
        effective.validate().map_err(ConfigError::ValidationErrors)?;

        tracing::debug!(config_path = ?config_path, "Settings loaded: {:?}", effective);
        self.file_settings = file_settings;
        self.config_path = config_path;
        self.effective = effective;
        Ok(())
    }

    /// 上書きを差し替える
    ///
    /// 不正になる場合は現在の設定を維持する。
    pub fn set_overrides(&mut self, overrides: SettingsOverrides) -> Result<(), ConfigError> {
        let effective = overrides.apply_to(&self.file_settings);
        effective.validate().map_err(ConfigError::ValidationErrors)?;

        self.overrides = overrides;
        self.effective = effective;
        Ok(())
    }

    /// 実効設定
    #[must_use]
    pub const fn get_settings(&self) -> &EditorSettings {
        &self.effective
    }

    /// 設定ファイルの内容（上書き前）
    #[must_use]
    pub const fn file_settings(&self) -> &EditorSettings {
        &self.file_settings
    }

    /// 読み込んだ設定ファイルのパス。デフォルト設定なら `None`
    #[must_use]
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::config::CONFIG_FILE_NAME;

    fn data_root(content: Option<&str>) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        if let Some(content) = content {
            fs::write(temp_dir.path().join(CONFIG_FILE_NAME), content).unwrap();
        }
        temp_dir
    }

    #[rstest]
    fn defaults_without_settings_file() {
        let temp_dir = data_root(None);
        let mut manager = ConfigManager::new();

        manager.load_settings(temp_dir.path()).unwrap();

        assert_eq!(manager.get_settings().language, "en");
        assert!(manager.config_path().is_none());
    }

    #[rstest]
    fn overrides_win_over_settings_file() {
        let temp_dir = data_root(Some(r#"{"language": "fr", "activeModules": ["a"]}"#));
        let mut manager = ConfigManager::with_overrides(SettingsOverrides {
            language: Some("de".to_string()),
            active_modules: vec!["b".to_string(), "c".to_string()],
        });

        manager.load_settings(temp_dir.path()).unwrap();

        assert_eq!(manager.get_settings().language, "de");
        assert_eq!(
            manager.get_settings().active_modules,
            Some(vec!["b".to_string(), "c".to_string()])
        );
        assert_eq!(manager.file_settings().language, "fr");
        assert_eq!(manager.config_path(), Some(temp_dir.path().join(CONFIG_FILE_NAME).as_path()));
    }

    #[rstest]
    fn empty_active_override_keeps_file_value() {
        let temp_dir = data_root(Some(r#"{"activeModules": ["a"]}"#));
        let mut manager = ConfigManager::with_overrides(SettingsOverrides {
            language: Some("ja".to_string()),
            active_modules: Vec::new(),
        });

        manager.load_settings(temp_dir.path()).unwrap();

        assert_eq!(manager.get_settings().active_modules, Some(vec!["a".to_string()]));
    }

    #[rstest]
    fn invalid_settings_file_keeps_previous() {
        let temp_dir = data_root(Some(r#"{"fetchTimeoutMs": 0}"#));
        let mut manager = ConfigManager::new();

        let result = manager.load_settings(temp_dir.path());

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
        assert_eq!(manager.get_settings().fetch_timeout_ms, None);
        assert!(manager.config_path().is_none());
    }

    #[rstest]
    fn invalid_override_is_rejected() {
        let temp_dir = data_root(Some(r#"{"language": "fr"}"#));
        let mut manager = ConfigManager::new();
        manager.load_settings(temp_dir.path()).unwrap();

        let result = manager.set_overrides(SettingsOverrides {
            language: Some(String::new()),
            ..SettingsOverrides::default()
        });

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
        assert_eq!(manager.get_settings().language, "fr");
    }
}
