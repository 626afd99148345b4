//! Translation editing dialogue: registry, projection, session and text front end.
pub mod command;
pub mod projector;
pub mod registry;
pub mod render;
pub mod repl;
pub mod session;

pub use projector::{
    Cell,
    Column,
    LanguageOption,
    LanguagePairSelection,
    Row,
    build_rows,
    reload_column,
    select_language_pair,
};
pub use registry::{
    RegistryError,
    TranslationRegistry,
};
pub use session::{
    DialogueState,
    EditorSession,
    ModuleView,
    SessionError,
};
