//! Tidemark - reconcile a database against a directory of SQL scripts.

use clap::Parser;

use tidemark_cli::cli::{Cli, Command};
use tidemark_cli::commands;
use tidemark_cli::error::CliResult;
use tidemark_cli::output;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        output::newline();
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Update(args) => commands::update::run(args).await,
        Command::Plan(args) => commands::plan::run(args).await,
        Command::Status(args) => commands::status::run(args).await,
        Command::Version => commands::version::run().await,
    }
}
