//! CLI commands

mod compile;
mod completion;
mod generate;
mod install;
mod new;
mod preview;
mod uninstall;

pub use compile::CompileArgs;
pub use completion::CompletionCommand;
pub use generate::GenerateCommand;
pub use install::InstallCommand;
pub use new::NewCommand;
pub use preview::PreviewCommand;
pub use test::{TestCommand, TestReport};
pub use uninstall::UninstallCommand;

use clap::{Parser, Subcommand};

/// Tabsmith - compile YAML completion documents into bash completion scripts
#[derive(Parser, Debug)]
#[command(name = "tabsmith")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a sample completion document
    New(NewCommand),

    /// Print the generated script to stdout
    Preview(PreviewCommand),

    /// Write the generated script to a file
    Generate(GenerateCommand),

    /// Show the completions offered for a command line
    Test(TestCommand),

    /// Install a completion script into a bash-completion directory
    Install(InstallCommand),

    /// Remove an installed completion script
    Uninstall(UninstallCommand),

    /// Generate completions for tabsmith itself
    #[command(hide = true)]
    Completion(CompletionCommand),
}
