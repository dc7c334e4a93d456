//! Generate command implementation

use clap::Args;
use std::fs;
use std::path::PathBuf;
use tabsmith_core::TabsmithError;
use tracing::info;

use super::CompileArgs;

/// Generate command arguments
#[derive(Args, Debug)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub compile: CompileArgs,

    /// Where to write the completion script
    #[arg(env = "TABSMITH_OUTPUT_PATH", default_value = "tabsmith.bash")]
    pub output_path: PathBuf,
}

impl GenerateCommand {
    /// Execute the generate command
    pub fn execute(&self) -> Result<(), TabsmithError> {
        // Compile fully before touching the output file
        let script = self.compile.compile()?;

        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.output_path, script.as_str())?;
        info!("Saved {}", self.output_path.display());
        Ok(())
    }
}
