use std::path::PathBuf;

use clap::Parser;
use sea_orm_cli::MigrateSubcommands;

/// Release tracker database migration tool.
#[derive(Parser)]
pub(crate) struct Cli {
    /// Path to the configuration file.
    #[clap(long)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Option<MigrateSubcommands>,
}
