//! 翻訳編集ダイアログのセッション
//!
//! レジストリと表示状態を所有し、UI からのイベントをハンドラーとして受け取る。
//! 集約と投影は純粋関数のまま、状態遷移はここに閉じ込める。

use std::str::FromStr;

use thiserror::Error;

use crate::config::EditorSettings;
use crate::editor::projector::{
    Cell,
    Column,
    LanguageOption,
    LanguagePairSelection,
    Row,
    build_rows,
    language_options,
    reload_column,
    select_language_pair,
};
use crate::editor::registry::TranslationRegistry;
use crate::indexer::aggregator::load_translations;
use crate::indexer::types::LoadSummary;
use crate::input::fetch::ResourceFetcher;
use crate::input::module::ModuleDescriptor;
use crate::ir::translation::ModuleTranslationSet;

/// 表示層で発生するエラー
///
/// どれもダイアログを壊さず、その操作だけを中断する。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Module '{0}' is not registered")]
    UnknownModuleSelected(String),
    #[error("No value selected for the {0} language")]
    MissingSelectorValue(Column),
    #[error("No module is displayed")]
    NoModuleSelected,
    #[error("Module '{module_id}' has no language '{lang}'")]
    UnknownLanguageSelected { module_id: String, lang: String },
    #[error("Unknown translation key: {0}")]
    UnknownTranslationKey(String),
    #[error("Unknown column '{0}' (expected 'from' or 'to')")]
    UnknownColumn(String),
}

impl FromStr for Column {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "from" => Ok(Self::From),
            "to" => Ok(Self::To),
            _ => Err(SessionError::UnknownColumn(s.to_string())),
        }
    }
}

/// 表示中モジュールのビュー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleView {
    pub module_id: String,
    pub module_name: String,
    /// 言語セレクターの選択肢
    pub languages: Vec<LanguageOption>,
    pub pair: LanguagePairSelection,
    pub rows: Vec<Row>,
}

impl ModuleView {
    /// テーブルのヘッダー（キー、from 言語名、to 言語名）
    #[must_use]
    pub fn header(&self) -> [&str; 3] {
        ["Key", &self.pair.from_language.name, &self.pair.to_language.name]
    }

    #[must_use]
    pub fn row(&self, key: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.key == key)
    }

    /// 言語ペアを決めて行を組み立てる。言語のないモジュールは `None`
    fn build(set: &ModuleTranslationSet, current_language: &str) -> Option<Self> {
        let pair = select_language_pair(&set.languages, current_language)?;
        let rows: Vec<_> = build_rows(&set.translations, &pair).collect();
        tracing::debug!(
            module_id = %set.module_id,
            from = %pair.from_language.lang,
            to = %pair.to_language.lang,
            rows = rows.len(),
            "Built rows"
        );

        Some(Self {
            module_id: set.module_id.clone(),
            module_name: set.name.clone(),
            languages: language_options(&set.languages, &pair),
            pair,
            rows,
        })
    }
}

/// ダイアログの状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DialogueState {
    #[default]
    Idle,
    /// モジュール切り替え中（セレクター無効）
    Loading { module_id: String },
    Displaying(Box<ModuleView>),
}

/// 翻訳編集セッション
///
/// 集約はセッションにつき一度だけ。[`EditorSession::reset`] でダイアログを閉じた状態に戻る。
#[derive(Debug, Default)]
pub struct EditorSession {
    /// 設定（現在の UI 言語を含む）
    settings: EditorSettings,
    /// 集約済みモジュール
    registry: TranslationRegistry,
    /// 集約済みかどうか
    opened: bool,
    /// 表示状態
    state: DialogueState,
}

impl EditorSession {
    #[must_use]
    pub fn new(settings: EditorSettings) -> Self {
        Self { settings, ..Self::default() }
    }

    /// モジュールを集約してレジストリに登録する
    ///
    /// 二回目以降の呼び出しは何もせず空のサマリーを返す。
    pub async fn open<F: ResourceFetcher>(
        &mut self,
        fetcher: &F,
        modules: &[ModuleDescriptor],
    ) -> LoadSummary {
        if self.opened {
            tracing::debug!("Translations already aggregated for this session");
            return LoadSummary::default();
        }
        self.opened = true;

        load_translations(fetcher, modules, &self.settings, &mut self.registry).await
    }

    /// ダイアログを閉じる（レジストリと表示を破棄）
    pub fn reset(&mut self) {
        tracing::debug!("Resetting editor session");
        self.registry = TranslationRegistry::new();
        self.state = DialogueState::Idle;
        self.opened = false;
    }

    #[must_use]
    pub const fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    #[must_use]
    pub const fn registry(&self) -> &TranslationRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn state(&self) -> &DialogueState {
        &self.state
    }

    /// 表示中のビュー
    #[must_use]
    pub fn view(&self) -> Option<&ModuleView> {
        match &self.state {
            DialogueState::Displaying(view) => Some(&**view),
            _ => None,
        }
    }

    /// モジュールセレクターが操作可能か
    #[must_use]
    pub const fn is_selector_enabled(&self) -> bool {
        !matches!(self.state, DialogueState::Loading { .. })
    }

    /// モジュール選択イベント
    ///
    /// 未登録のモジュールなら状態を変えずにエラーを返す。
    pub fn on_module_selected(&mut self, module_id: &str) -> Result<&ModuleView, SessionError> {
        self.begin_module_load(module_id)?;
        self.finish_module_load()
            .ok_or_else(|| SessionError::UnknownModuleSelected(module_id.to_string()))
    }

    /// `Loading` に遷移する
    pub fn begin_module_load(&mut self, module_id: &str) -> Result<(), SessionError> {
        if !self.registry.contains(module_id) {
            let error = SessionError::UnknownModuleSelected(module_id.to_string());
            tracing::error!("{error}");
            return Err(error);
        }

        tracing::info!(module_id, "Module selected");
        self.state = DialogueState::Loading { module_id: module_id.to_string() };
        Ok(())
    }

    /// `Loading` 中のモジュールのビューを組み立てて `Displaying` に遷移する
    ///
    /// `Loading` でなければ何もしない。
    pub fn finish_module_load(&mut self) -> Option<&ModuleView> {
        let DialogueState::Loading { module_id } = &self.state else {
            return None;
        };

        let view = self
            .registry
            .get(module_id)
            .and_then(|set| ModuleView::build(set, &self.settings.language));

        if let Some(view) = view {
            tracing::info!(module_id = %view.module_id, "Translation table updated");
            self.state = DialogueState::Displaying(Box::new(view));
            self.view()
        } else {
            tracing::error!(module_id = %module_id, "Module has no languages to display");
            self.state = DialogueState::Idle;
            None
        }
    }

    /// 言語セレクターの変更イベント
    ///
    /// 該当列だけを読み直す。`Loading` には遷移しない。
    pub fn on_language_selected(
        &mut self,
        column: Column,
        lang: Option<&str>,
    ) -> Result<&ModuleView, SessionError> {
        let Some(lang) = lang.filter(|lang| !lang.is_empty()) else {
            let error = SessionError::MissingSelectorValue(column);
            tracing::error!("{error}");
            return Err(error);
        };
        let DialogueState::Displaying(view) = &mut self.state else {
            return Err(SessionError::NoModuleSelected);
        };
        let Some(set) = self.registry.get(&view.module_id) else {
            return Err(SessionError::UnknownModuleSelected(view.module_id.clone()));
        };
        let Some(language) = set.language(lang) else {
            let error = SessionError::UnknownLanguageSelected {
                module_id: view.module_id.clone(),
                lang: lang.to_string(),
            };
            tracing::error!("{error}");
            return Err(error);
        };

        view.pair.set_language(column, language.clone());
        view.languages = language_options(&set.languages, &view.pair);
        reload_column(&set.translations, lang, column, &mut view.rows);
        tracing::info!(module_id = %view.module_id, %column, lang, "Language column reloaded");

        Ok(&**view)
    }

    /// セル編集イベント
    ///
    /// そのセルの文字数だけを再計算する。レジストリには書き戻さない。
    pub fn on_cell_edited(
        &mut self,
        key: &str,
        column: Column,
        text: &str,
    ) -> Result<&Cell, SessionError> {
        let DialogueState::Displaying(view) = &mut self.state else {
            return Err(SessionError::NoModuleSelected);
        };
        let row = view
            .rows
            .iter_mut()
            .find(|row| row.key == key)
            .ok_or_else(|| SessionError::UnknownTranslationKey(key.to_string()))?;

        let cell = row.cell_mut(column);
        cell.edit(text);
        tracing::debug!(key, %column, chars = cell.char_count, "Cell edited");

        Ok(&*cell)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::input::fetch::MemoryFetcher;
    use crate::input::module::LanguageDescriptor;

    fn fixture() -> (MemoryFetcher, Vec<ModuleDescriptor>) {
        let fetcher = MemoryFetcher::new()
            .with_resource("p1", r#"{"hello": "Hello"}"#)
            .with_resource("p2", r#"{"hello": "Bonjour", "bye": "Au revoir"}"#)
            .with_resource("p3", r#"{"hello": "Hallo"}"#);
        let modules = vec![
            ModuleDescriptor::new("m1", "Module One")
                .with_language(LanguageDescriptor::new("en", "English", "p1"))
                .with_language(LanguageDescriptor::new("fr", "Français", "p2"))
                .with_language(LanguageDescriptor::new("de", "Deutsch", "p3")),
        ];
        (fetcher, modules)
    }

    async fn opened_session(language: &str) -> EditorSession {
        let (fetcher, modules) = fixture();
        let settings = EditorSettings { language: language.to_string(), ..EditorSettings::default() };
        let mut session = EditorSession::new(settings);
        session.open(&fetcher, &modules).await;
        session
    }

    #[rstest]
    #[case("from", Column::From)]
    #[case("to", Column::To)]
    #[case(" TO ", Column::To)]
    fn column_from_str(#[case] input: &str, #[case] expected: Column) {
        assert_eq!(input.parse::<Column>(), Ok(expected));
    }

    #[rstest]
    fn column_from_str_rejects_unknown() {
        assert_eq!(
            "left".parse::<Column>(),
            Err(SessionError::UnknownColumn("left".to_string()))
        );
    }

    #[tokio::test]
    async fn module_selection_displays_rows() {
        let mut session = opened_session("fr").await;

        let view = session.on_module_selected("m1").unwrap();

        assert_eq!(view.header(), ["Key", "Français", "English"]);
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].from.as_str(), "Bonjour");
        assert_eq!(view.rows[0].to.as_str(), "Hello");
        assert_eq!(view.rows[1].from.as_str(), "Au revoir");
        assert!(view.rows[1].to.is_absent());
        assert!(session.is_selector_enabled());
    }

    #[tokio::test]
    async fn selector_is_disabled_while_loading() {
        let mut session = opened_session("en").await;

        session.begin_module_load("m1").unwrap();
        assert!(!session.is_selector_enabled());
        assert!(matches!(session.state(), DialogueState::Loading { module_id } if module_id == "m1"));

        assert!(session.finish_module_load().is_some());
        assert!(session.is_selector_enabled());
        assert!(session.view().is_some());
    }

    #[tokio::test]
    async fn unknown_module_keeps_prior_state() {
        let mut session = opened_session("en").await;
        session.on_module_selected("m1").unwrap();
        let before = session.state().clone();

        let result = session.on_module_selected("missing");

        assert_eq!(result, Err(SessionError::UnknownModuleSelected("missing".to_string())));
        assert_eq!(session.state(), &before);
    }

    #[tokio::test]
    async fn language_change_reloads_one_column() {
        let mut session = opened_session("en").await;
        session.on_module_selected("m1").unwrap();

        let view = session.on_language_selected(Column::To, Some("de")).unwrap();

        assert_eq!(view.pair.to_language.lang, "de");
        assert_eq!(view.header(), ["Key", "English", "Deutsch"]);
        assert_eq!(view.rows[0].to.as_str(), "Hallo");
        assert_eq!(view.rows[1].to, Cell::default());
        assert_eq!(view.rows[0].from.as_str(), "Hello");
        let flagged: Vec<_> =
            view.languages.iter().filter(|o| o.is_to).map(|o| o.language.lang.as_str()).collect();
        assert_eq!(flagged, vec!["de"]);
        assert!(matches!(session.state(), DialogueState::Displaying(_)));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[tokio::test]
    async fn missing_selector_value_is_a_no_op(#[case] lang: Option<&str>) {
        let mut session = opened_session("en").await;
        session.on_module_selected("m1").unwrap();
        let before = session.state().clone();

        let result = session.on_language_selected(Column::From, lang);

        assert_eq!(result, Err(SessionError::MissingSelectorValue(Column::From)));
        assert_eq!(session.state(), &before);
    }

    #[tokio::test]
    async fn language_selection_errors() {
        let mut session = opened_session("en").await;

        assert_eq!(
            session.on_language_selected(Column::To, Some("fr")),
            Err(SessionError::NoModuleSelected)
        );

        session.on_module_selected("m1").unwrap();
        assert_eq!(
            session.on_language_selected(Column::To, Some("ja")),
            Err(SessionError::UnknownLanguageSelected {
                module_id: "m1".to_string(),
                lang: "ja".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn cell_edit_updates_count_only() {
        let mut session = opened_session("en").await;
        session.on_module_selected("m1").unwrap();

        let cell = session.on_cell_edited("bye", Column::From, "Goodbye").unwrap();
        assert_eq!(cell.char_count, 7);

        let registry_text = session
            .registry()
            .get("m1")
            .and_then(|set| set.translations.get("bye"))
            .and_then(|entry| entry.get("en"));
        assert_that!(registry_text, none());
        assert_eq!(session.view().unwrap().row("bye").unwrap().from.as_str(), "Goodbye");
    }

    #[tokio::test]
    async fn cell_edit_errors() {
        let mut session = opened_session("en").await;

        assert_eq!(
            session.on_cell_edited("hello", Column::To, "x"),
            Err(SessionError::NoModuleSelected)
        );

        session.on_module_selected("m1").unwrap();
        assert_eq!(
            session.on_cell_edited("nope", Column::To, "x"),
            Err(SessionError::UnknownTranslationKey("nope".to_string()))
        );
    }

    #[tokio::test]
    async fn open_aggregates_once_per_session() {
        let (fetcher, modules) = fixture();
        let mut session = EditorSession::new(EditorSettings::default());

        let first = session.open(&fetcher, &modules).await;
        let second = session.open(&fetcher, &modules).await;

        assert_eq!(first.registered, vec!["m1".to_string()]);
        assert!(second.registered.is_empty());
        assert_eq!(session.registry().len(), 1);

        session.reset();
        assert!(session.registry().is_empty());
        assert_eq!(session.state(), &DialogueState::Idle);

        let reopened = session.open(&fetcher, &modules).await;
        assert_eq!(reopened.registered, vec!["m1".to_string()]);
    }
}
