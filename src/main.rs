//! Entry point for the translation editor CLI.

mod cli;

use clap::Parser;

use crate::cli::Arguments;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Arguments::parse();
    let _guard = cli::init_tracing(args.log_file.as_deref())?;

    cli::run(args).await
}
