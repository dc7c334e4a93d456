//! Install command implementation

use clap::Args;
use std::path::PathBuf;
use tabsmith_core::TabsmithError;

use crate::installer::{command_string, Installer};

/// Install command arguments
#[derive(Args, Debug)]
pub struct InstallCommand {
    /// Program the completions belong to
    pub program: String,

    /// Completion script to install
    #[arg(env = "TABSMITH_OUTPUT_PATH", default_value = "tabsmith.bash")]
    pub script_path: PathBuf,

    /// Replace an installed script
    #[arg(long)]
    pub force: bool,

    /// Print the install command instead of running it
    #[arg(long)]
    pub dry: bool,
}

impl InstallCommand {
    /// Execute the install command
    pub fn execute(&self) -> Result<(), TabsmithError> {
        let installer = Installer::new(&self.program, &self.script_path);

        if self.dry {
            println!("{}", command_string(&installer.install_command()?));
            return Ok(());
        }

        installer.install(self.force)
    }
}
