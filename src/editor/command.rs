//! Line commands for the interactive editor.

use std::str::FromStr;

use thiserror::Error;

use crate::editor::projector::Column;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the registered modules.
    Modules,
    /// Switch the displayed module.
    Select(String),
    /// Change the language of a column. `None` models a cleared selector.
    Lang { column: Column, lang: Option<String> },
    /// Replace the displayed text of one cell.
    Edit { key: String, column: Column, text: String },
    /// Print the current table.
    Show,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}' (type 'help')")]
    Unknown(String),
    #[error("Missing {argument} for '{command}'")]
    MissingArgument { command: &'static str, argument: &'static str },
    #[error("Invalid column '{0}' (expected 'from' or 'to')")]
    InvalidColumn(String),
}

/// Text printed by `help`.
pub const HELP: &str = "\
Commands:
  modules                      list registered modules
  select <module>              display a module
  lang <from|to> [code]        change the language of a column
  edit <key> <from|to> <text>  edit a cell (not saved)
  show                         print the current table
  help                         show this help
  quit                         leave the editor
";

/// Splits off the first whitespace-delimited word.
fn next_word(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    Some(input.split_once(char::is_whitespace).unwrap_or((input, "")))
}

/// Column argument, reported as a command error.
fn parse_column(word: &str) -> Result<Column, CommandError> {
    word.parse().map_err(|_| CommandError::InvalidColumn(word.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (name, rest) = next_word(line).ok_or(CommandError::Empty)?;

        match name {
            "modules" | "ls" => Ok(Self::Modules),
            "show" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            "select" => {
                let (module_id, _) = next_word(rest).ok_or(CommandError::MissingArgument {
                    command: "select",
                    argument: "module id",
                })?;
                Ok(Self::Select(module_id.to_string()))
            }
            "lang" => {
                let (column, rest) = next_word(rest)
                    .ok_or(CommandError::MissingArgument { command: "lang", argument: "column" })?;
                Ok(Self::Lang {
                    column: parse_column(column)?,
                    lang: next_word(rest).map(|(lang, _)| lang.to_string()),
                })
            }
            "edit" => {
                let (key, rest) = next_word(rest)
                    .ok_or(CommandError::MissingArgument { command: "edit", argument: "key" })?;
                let (column, text) = next_word(rest)
                    .ok_or(CommandError::MissingArgument { command: "edit", argument: "column" })?;
                Ok(Self::Edit {
                    key: key.to_string(),
                    column: parse_column(column)?,
                    text: text.trim_start().to_string(),
                })
            }
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
