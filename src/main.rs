use clap::Parser;
use meg_archive::cli::{Cli, execute_command};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = execute_command(&cli) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
