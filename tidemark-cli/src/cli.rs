//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Tidemark - reconcile a database against a directory of SQL scripts
#[derive(Parser, Debug)]
#[command(name = "tidemark")]
#[command(version)]
#[command(about = "Tidemark - reconcile a database against a directory of SQL scripts", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plan and apply pending scripts
    Update(UpdateArgs),

    /// Show what would execute, without applying anything
    Plan(PlanArgs),

    /// List the applied script records
    Status(StatusArgs),

    /// Display version information
    Version,
}

/// Arguments shared by every command that touches the store
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Directory containing the SQL scripts
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Path to the SQLite database file
    #[arg(short = 'D', long)]
    pub database: Option<PathBuf>,

    /// Path to the tidemark.toml config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the `update` command
#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Repeatable scripts per concurrent group
    #[arg(long)]
    pub group_size: Option<usize>,

    /// Apply without the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `plan` command
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

/// Arguments for the `status` command
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}
