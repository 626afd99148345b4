//! Bilingual view projection.
//!
//! Pure functions from an aggregated [`TranslationTable`] and a language pair
//! to display rows. Nothing here mutates the table.

use std::iter::FusedIterator;

use serde::Serialize;

use crate::input::module::LanguageDescriptor;
use crate::ir::translation::TranslationTable;

/// One of the two compared columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Column {
    From,
    To,
}

impl Column {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::From => "from",
            Self::To => "to",
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The languages shown side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguagePairSelection {
    pub from_language: LanguageDescriptor,
    pub to_language: LanguageDescriptor,
}

impl LanguagePairSelection {
    #[must_use]
    pub const fn language(&self, column: Column) -> &LanguageDescriptor {
        match column {
            Column::From => &self.from_language,
            Column::To => &self.to_language,
        }
    }

    pub fn set_language(&mut self, column: Column, language: LanguageDescriptor) {
        match column {
            Column::From => self.from_language = language,
            Column::To => self.to_language = language,
        }
    }
}

/// Picks the default from/to pair for a module.
///
/// The current UI language becomes "from" when the module has it, and "to"
/// is then the first declared language other than it. Without a match the
/// first two declared languages are used. A single language pairs with itself.
/// Returns `None` only for an empty language list.
#[must_use]
pub fn select_language_pair(
    languages: &[LanguageDescriptor],
    current_language: &str,
) -> Option<LanguagePairSelection> {
    let first = languages.first()?;
    let second = languages.get(1);

    let (from_language, to_language) =
        match languages.iter().find(|language| language.lang == current_language) {
            None => (first, second.unwrap_or(first)),
            Some(matched) => {
                let to = match second {
                    Some(second) if first.lang == matched.lang => second,
                    Some(_) => first,
                    None => matched,
                };
                (matched, to)
            }
        };

    Some(LanguagePairSelection {
        from_language: from_language.clone(),
        to_language: to_language.clone(),
    })
}

/// Length of the raw stored string in UTF-16 code units, the unit the
/// host UI counts in. Characters outside the BMP count as 2.
#[must_use]
pub fn char_count(text: &str) -> usize {
    text.encode_utf16().count()
}

/// A table cell. `text: None` is an absent translation, rendered as an empty
/// editable cell with a count of 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub text: Option<String>,
    pub char_count: usize,
}

impl Cell {
    #[must_use]
    pub fn new(text: Option<&str>) -> Self {
        text.map_or_else(Self::default, |text| Self {
            text: Some(text.to_string()),
            char_count: char_count(text),
        })
    }

    /// Replaces the displayed text after a user edit.
    pub fn edit(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.char_count = char_count(&text);
        self.text = Some(text);
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub const fn is_absent(&self) -> bool {
        self.text.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub key: String,
    pub from: Cell,
    pub to: Cell,
}

impl Row {
    #[must_use]
    pub const fn cell(&self, column: Column) -> &Cell {
        match column {
            Column::From => &self.from,
            Column::To => &self.to,
        }
    }

    pub const fn cell_mut(&mut self, column: Column) -> &mut Cell {
        match column {
            Column::From => &mut self.from,
            Column::To => &mut self.to,
        }
    }
}

/// Lazily built rows, in table insertion order.
///
/// Cloning restarts from the clone's position; calling [`build_rows`] again
/// always yields the same sequence.
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    /// Table being projected.
    table: &'a TranslationTable,
    /// Language code of the from column.
    from_lang: &'a str,
    /// Language code of the to column.
    to_lang: &'a str,
    /// Position of the next entry to yield.
    position: usize,
}

impl Iterator for Rows<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        let (key, entry) = self.table.entry_at(self.position)?;
        self.position += 1;

        Some(Row {
            key: key.to_string(),
            from: Cell::new(entry.get(self.from_lang)),
            to: Cell::new(entry.get(self.to_lang)),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.table.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rows<'_> {}

impl FusedIterator for Rows<'_> {}

/// Projects the table onto the selected pair.
#[must_use]
pub fn build_rows<'a>(table: &'a TranslationTable, pair: &'a LanguagePairSelection) -> Rows<'a> {
    Rows {
        table,
        from_lang: &pair.from_language.lang,
        to_lang: &pair.to_language.lang,
        position: 0,
    }
}

/// Refreshes one column of already built rows for a newly selected language.
///
/// Cells whose key has no translation in `lang` are cleared.
pub fn reload_column(table: &TranslationTable, lang: &str, column: Column, rows: &mut [Row]) {
    for row in rows {
        let text = table.get(&row.key).and_then(|entry| entry.get(lang));
        *row.cell_mut(column) = Cell::new(text);
    }
}

/// One entry of a language selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageOption {
    pub language: LanguageDescriptor,
    pub is_from: bool,
    pub is_to: bool,
}

/// Selector options in declaration order, flagged with the current pair.
#[must_use]
pub fn language_options(
    languages: &[LanguageDescriptor],
    pair: &LanguagePairSelection,
) -> Vec<LanguageOption> {
    languages
        .iter()
        .map(|language| LanguageOption {
            language: language.clone(),
            is_from: language.lang == pair.from_language.lang,
            is_to: language.lang == pair.to_language.lang,
        })
        .collect()
}
