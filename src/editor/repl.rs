//! 対話モードの入力ループ
//!
//! 一行ずつ [`Command`] に変換してセッションのハンドラーへ渡す。
//! 表示層のエラーは出力して次の行へ進む。

use std::io::{
    self,
    BufRead,
    Write,
};

use crate::editor::command::{
    Command,
    HELP,
};
use crate::editor::render::{
    render_modules,
    render_view,
};
use crate::editor::session::EditorSession;

/// 入力が尽きるか `quit` まで読み続ける
pub fn run_commands(
    session: &mut EditorSession,
    input: impl BufRead,
    out: &mut impl Write,
) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(error) => {
                writeln!(out, "error: {error}")?;
                continue;
            }
        };
        tracing::debug!(?command, "Received command");

        if !execute(session, command, out)? {
            break;
        }
    }
    Ok(())
}

/// 一つのコマンドを実行する。`false` なら終了
fn execute(session: &mut EditorSession, command: Command, out: &mut impl Write) -> io::Result<bool> {
    let result = match command {
        Command::Quit => return Ok(false),
        Command::Help => {
            write!(out, "{HELP}")?;
            return Ok(true);
        }
        Command::Modules => {
            render_modules(session.registry(), out)?;
            return Ok(true);
        }
        Command::Show => {
            match session.view() {
                Some(view) => render_view(view, out)?,
                None => writeln!(out, "No module selected.")?,
            }
            return Ok(true);
        }
        Command::Select(module_id) => session.on_module_selected(&module_id).map(|_| ()),
        Command::Lang { column, lang } => {
            session.on_language_selected(column, lang.as_deref()).map(|_| ())
        }
        Command::Edit { key, column, text } => {
            session.on_cell_edited(&key, column, &text).map(|cell| {
                tracing::debug!(chars = cell.char_count, "Edited");
            })
        }
    };

    match result {
        Ok(()) => {
            if let Some(view) = session.view() {
                render_view(view, out)?;
            }
        }
        Err(error) => writeln!(out, "error: {error}")?,
    }
    Ok(true)
}
