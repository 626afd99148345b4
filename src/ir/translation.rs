//! 翻訳データの中間表現
//!
//! 1 モジュール分の言語ファイルを集約した結果を保持します。
//! キーの順序は「最初に現れた順」を保証します。

use std::collections::{
    BTreeMap,
    HashMap,
};

use serde::Serialize;

use crate::input::module::LanguageDescriptor;

/// 1 つの翻訳キーに対する言語ごとの翻訳
///
/// 言語コードが存在しない場合は「その言語の翻訳なし」を意味し、
/// 空文字列とは区別されます。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationEntry {
    /// 言語コード → 翻訳文字列
    pub translations: HashMap<String, String>,
}

impl TranslationEntry {
    /// 指定言語の翻訳を取得
    #[must_use]
    pub fn get(&self, lang: &str) -> Option<&str> {
        self.translations.get(lang).map(String::as_str)
    }

    /// 指定言語の翻訳が存在するか
    #[must_use]
    pub fn contains(&self, lang: &str) -> bool {
        self.translations.contains_key(lang)
    }

    /// 翻訳が存在する言語コードの一覧（順不同）
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.translations.keys().map(String::as_str)
    }
}

/// キーの挿入順を保持する翻訳テーブル
///
/// `entries` が順序を、`index` がキー検索を担当します。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    /// 挿入順のエントリ
    entries: Vec<(String, TranslationEntry)>,
    /// キー → `entries` 内の位置
    index: HashMap<String, usize>,
}

impl TranslationTable {
    /// 空のテーブルを作成
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 翻訳を設定する
    ///
    /// キーが未登録の場合は末尾にエントリを追加します。
    pub fn insert(&mut self, key: &str, lang: &str, text: String) {
        let position = match self.index.get(key) {
            Some(&position) => position,
            None => {
                let position = self.entries.len();
                self.entries.push((key.to_string(), TranslationEntry::default()));
                self.index.insert(key.to_string(), position);
                position
            }
        };

        if let Some((_, entry)) = self.entries.get_mut(position) {
            entry.translations.insert(lang.to_string(), text);
        }
    }

    /// キーのエントリを取得
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TranslationEntry> {
        self.index.get(key).and_then(|&position| self.entries.get(position)).map(|(_, e)| e)
    }

    /// キーが存在するか
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// 挿入順にエントリを列挙
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &TranslationEntry)> + Clone {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// 挿入順で `position` 番目のエントリ
    #[must_use]
    pub fn entry_at(&self, position: usize) -> Option<(&str, &TranslationEntry)> {
        self.entries.get(position).map(|(key, entry)| (key.as_str(), entry))
    }

    /// 挿入順にキーを列挙
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> + Clone {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// キー数
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 空かどうか
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 言語コード順に出力し、同じ内容なら同じ JSON になるようにする
impl Serialize for TranslationEntry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let sorted: BTreeMap<&str, &str> =
            self.translations.iter().map(|(lang, text)| (lang.as_str(), text.as_str())).collect();
        let mut entry = serializer.serialize_struct("TranslationEntry", 1)?;
        entry.serialize_field("translations", &sorted)?;
        entry.end()
    }
}

impl Serialize for TranslationTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

/// 集約済みのモジュール翻訳
///
/// 集約完了後に一度だけレジストリへ登録され、その後は読み取り専用です。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleTranslationSet {
    /// モジュール ID
    pub module_id: String,
    /// 表示名
    pub name: String,
    /// 宣言順の言語一覧
    pub languages: Vec<LanguageDescriptor>,
    /// キー → 翻訳
    pub translations: TranslationTable,
}

impl ModuleTranslationSet {
    /// 言語コードから言語を探す
    #[must_use]
    pub fn language(&self, lang: &str) -> Option<&LanguageDescriptor> {
        self.languages.iter().find(|language| language.lang == lang)
    }
}
