//! Plain-text rendering of the editor state.

use std::io::{
    self,
    Write,
};

use unicode_width::UnicodeWidthStr;

use crate::editor::projector::Cell;
use crate::editor::registry::TranslationRegistry;
use crate::editor::session::ModuleView;
use crate::indexer::types::LoadSummary;

/// Column separator of the comparison table.
const SEPARATOR: &str = " | ";

/// Lists registered modules, one per line.
pub fn render_modules(registry: &TranslationRegistry, out: &mut impl Write) -> io::Result<()> {
    if registry.is_empty() {
        return writeln!(out, "No modules with translations.");
    }

    let id_width = registry
        .modules()
        .iter()
        .map(|set| UnicodeWidthStr::width(set.module_id.as_str()))
        .max()
        .unwrap_or_default();

    for set in registry.modules() {
        let languages: Vec<_> = set.languages.iter().map(|l| l.lang.as_str()).collect();
        writeln!(
            out,
            "{}  {}  [{}] {} keys",
            pad(&set.module_id, id_width),
            set.name,
            languages.join(", "),
            set.translations.len()
        )?;
    }
    Ok(())
}

/// Reports modules that were not registered.
pub fn render_summary(summary: &LoadSummary, out: &mut impl Write) -> io::Result<()> {
    for failure in &summary.failed {
        writeln!(out, "warning: {failure}")?;
    }
    if !summary.duplicates.is_empty() {
        writeln!(out, "warning: duplicate module ids skipped: {}", summary.duplicates.join(", "))?;
    }
    if !summary.empty.is_empty() {
        writeln!(out, "No translations: {}", summary.empty.join(", "))?;
    }
    if !summary.inactive.is_empty() {
        writeln!(out, "Inactive: {}", summary.inactive.join(", "))?;
    }
    Ok(())
}

/// Text of a cell with its character count.
fn cell_text(cell: &Cell) -> String {
    format!("({}) {}", cell.char_count, cell.as_str())
}

/// 表示幅で右側を埋める
fn pad(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{text}{}", " ".repeat(padding))
}

/// Prints the comparison table of the displayed module.
pub fn render_view(view: &ModuleView, out: &mut impl Write) -> io::Result<()> {
    let cells: Vec<[String; 3]> = view
        .rows
        .iter()
        .map(|row| [row.key.clone(), cell_text(&row.from), cell_text(&row.to)])
        .collect();
    let header = view.header();

    let mut widths = header.map(|text| text.width());
    for row in &cells {
        for (width, text) in widths.iter_mut().zip(row) {
            *width = (*width).max(UnicodeWidthStr::width(text.as_str()));
        }
    }

    writeln!(out, "{} ({})", view.module_name, view.module_id)?;
    write_line(out, header.iter().copied(), widths)?;
    let total = widths.iter().sum::<usize>() + SEPARATOR.len() * (widths.len() - 1);
    writeln!(out, "{}", "-".repeat(total))?;
    for row in &cells {
        write_line(out, row.iter().map(String::as_str), widths)?;
    }
    Ok(())
}

/// Writes one padded table line without trailing spaces.
fn write_line<'a>(
    out: &mut impl Write,
    texts: impl Iterator<Item = &'a str>,
    widths: [usize; 3],
) -> io::Result<()> {
    let line: Vec<_> = texts.zip(widths).map(|(text, width)| pad(text, width)).collect();
    writeln!(out, "{}", line.join(SEPARATOR).trim_end())
}
