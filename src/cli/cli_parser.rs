use crate::cli::{Commands, HELP_TEMPLATE};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    // Obtain during build time, not runtime
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None
)]
#[command(
    after_help = HELP_TEMPLATE.replace("%BINARY_NAME%", env!("CARGO_PKG_NAME"))
)]
pub struct Cli {
    /// The archive to inspect, or to create with `pack` and `merge`.
    #[arg(
        value_name = "archive",
        help = "Path to the MEG archive. Read by info, list and read; written by pack and merge."
    )]
    pub archive: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}
