//! Command-line interface.

use std::io::{
    self,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};

use anyhow::{
    Context,
    Result,
};
use clap::{
    Parser,
    Subcommand,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use translation_editor::EditorSession;
use translation_editor::config::{
    ConfigManager,
    EditorSettings,
    SettingsOverrides,
};
use translation_editor::editor::Column;
use translation_editor::editor::render::{
    render_modules,
    render_summary,
    render_view,
};
use translation_editor::editor::repl::run_commands;
use translation_editor::indexer::discover_modules;
use translation_editor::input::fetch::FsFetcher;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "translation_editor=info";

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Data directory containing module manifests
    #[arg(long, env = "TRANSLATION_EDITOR_DATA", default_value = ".")]
    pub data_path: PathBuf,

    /// Current UI language (overrides config file)
    #[arg(long)]
    pub lang: Option<String>,

    /// Active module id; repeatable (overrides config file)
    #[arg(long = "active")]
    pub active: Vec<String>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List modules with translations
    Modules,
    /// Print the comparison table of a module
    Show {
        module: String,
        /// Language of the left column
        #[arg(long)]
        from: Option<String>,
        /// Language of the right column
        #[arg(long)]
        to: Option<String>,
    },
    /// Interactive editing session on stdin
    Edit,
}

/// Sets up the global subscriber. The returned guard flushes the log file on drop.
pub fn init_tracing(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .context("Invalid log filter")?;

    let Some(path) = log_file else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", path.display()))?;
    let directory = path.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();

    Ok(Some(guard))
}

/// 設定ファイルを読み込み、CLI 引数で上書きする
fn load_settings(args: &Arguments) -> Result<EditorSettings> {
    let mut config_manager = ConfigManager::with_overrides(SettingsOverrides {
        language: args.lang.clone(),
        active_modules: args.active.clone(),
    });
    config_manager.load_settings(&args.data_path)?;

    Ok(config_manager.get_settings().clone())
}

pub async fn run(args: Arguments) -> Result<()> {
    let settings = load_settings(&args)?;
    tracing::debug!(?settings, "Effective settings");

    let discovery = discover_modules(&args.data_path, &settings).await?;
    let fetcher = FsFetcher::new(&args.data_path);
    let mut session = EditorSession::new(settings);
    let summary = session.open(&fetcher, &discovery.modules).await;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for skipped in &discovery.skipped {
        writeln!(out, "warning: skipped {}: {}", skipped.path, skipped.error)?;
    }

    match args.command {
        Command::Modules => {
            render_summary(&summary, &mut out)?;
            render_modules(session.registry(), &mut out)?;
        }
        Command::Show { module, from, to } => {
            session.on_module_selected(&module)?;
            if let Some(from) = from {
                session.on_language_selected(Column::From, Some(&from))?;
            }
            if let Some(to) = to {
                session.on_language_selected(Column::To, Some(&to))?;
            }
            if let Some(view) = session.view() {
                render_view(view, &mut out)?;
            }
        }
        Command::Edit => {
            render_summary(&summary, &mut out)?;
            render_modules(session.registry(), &mut out)?;
            out.flush()?;
            run_commands(&mut session, io::stdin().lock(), &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}
