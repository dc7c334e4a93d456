//! Arguments shared by the commands that compile a document

use clap::Args;
use std::path::PathBuf;
use tabsmith_core::{CompileOptions, CompiledScript, CompletionTree, TabsmithError};
use tracing::debug;

/// Compiler arguments
#[derive(Args, Debug, Clone)]
pub struct CompileArgs {
    /// Completion document to compile
    #[arg(env = "TABSMITH_CONFIG_PATH", default_value = "tabsmith.yaml")]
    pub config_path: PathBuf,

    /// Name of the generated completion function
    #[arg(short = 'f', long = "function")]
    pub function_name: Option<String>,

    /// Offer each flag only once unless the document says otherwise
    #[arg(long)]
    pub single_use_flags: bool,
}

impl CompileArgs {
    /// Compiler options selected on the command line
    pub fn options(&self) -> CompileOptions {
        let mut options = CompileOptions::default();
        if let Some(name) = &self.function_name {
            options = options.with_function_name(name);
        }
        if self.single_use_flags {
            options = options.single_use_flags();
        }
        options
    }

    /// Parse and validate the document
    pub fn tree(&self) -> Result<CompletionTree, TabsmithError> {
        debug!("Reading document: {}", self.config_path.display());
        tabsmith_parser::parse_file(&self.config_path, &self.options())
    }

    /// Compile the document into a script
    pub fn compile(&self) -> Result<CompiledScript, TabsmithError> {
        debug!("Compiling document: {}", self.config_path.display());
        tabsmith_emitter::compile_file(&self.config_path, &self.options())
    }
}
