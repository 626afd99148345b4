//! translation-editor
//!
//! モジュールごとの言語 JSON を集約し、二言語を並べて比較・編集するためのライブラリ

pub mod config;
pub mod editor;
pub mod indexer;
pub mod input;
pub mod ir;

pub use editor::EditorSession;
