//! Uninstall command implementation

use clap::Args;
use tabsmith_core::TabsmithError;

use crate::installer::{command_string, Installer};

/// Uninstall command arguments
#[derive(Args, Debug)]
pub struct UninstallCommand {
    /// Program whose completions should be removed
    pub program: String,

    /// Print the uninstall command instead of running it
    #[arg(long)]
    pub dry: bool,
}

impl UninstallCommand {
    /// Execute the uninstall command
    pub fn execute(&self) -> Result<(), TabsmithError> {
        // The script path is irrelevant for removal
        let installer = Installer::new(&self.program, "");

        if self.dry {
            println!("{}", command_string(&installer.uninstall_command()?));
            return Ok(());
        }

        installer.uninstall()
    }
}
