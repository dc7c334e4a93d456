//! Tabsmith CLI
//!
//! Command-line interface for the Tabsmith bash completion compiler.

use clap::Parser;
use tabsmith_cli::{Cli, Commands};
use tabsmith_core::TabsmithError;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), TabsmithError> {
    let cli = Cli::parse();

    // Logs go to stderr so `preview` output stays clean
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::New(cmd) => cmd.execute()?,
        Commands::Preview(cmd) => cmd.execute()?,
        Commands::Generate(cmd) => cmd.execute()?,
        Commands::Test(cmd) => cmd.execute()?,
        Commands::Install(cmd) => cmd.execute()?,
        Commands::Uninstall(cmd) => cmd.execute()?,
        Commands::Completion(cmd) => cmd.execute(),
    }

    Ok(())
}
