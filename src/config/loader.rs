//! 設定ファイルの読み込み

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    EditorSettings,
};

/// データディレクトリ直下の設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".translation-editor.json";

/// 読み込んだ設定ファイル
#[derive(Debug, Clone)]
pub(super) struct SettingsFile {
    /// ファイルのパス
    pub(super) path: PathBuf,
    /// ファイルの内容（未指定の項目はデフォルト値）
    pub(super) settings: EditorSettings,
}

/// `data_root` 直下の `.translation-editor.json` を読む
///
/// ファイルがなければ `Ok(None)`。ディレクトリなど通常ファイル以外も「なし」として扱う。
pub(super) fn read_settings_file(data_root: &Path) -> Result<Option<SettingsFile>, ConfigError> {
    let path = data_root.join(CONFIG_FILE_NAME);
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "No settings file");
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)?;
    let settings = serde_json::from_str(&content)?;
    tracing::debug!(path = %path.display(), "Read settings file");

    Ok(Some(SettingsFile { path, settings }))
}
