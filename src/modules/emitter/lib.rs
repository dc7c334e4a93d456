//! Completion script generation for Tabsmith
//!
//! Turns a validated completion tree into a shell script. The `compile*`
//! functions run the whole pipeline from document text to script, and never
//! return partial output: a document that fails to parse, validate or emit
//! yields an error only.

pub mod bash;
mod writer;

pub use bash::BashEmitter;

use std::path::Path;
use tabsmith_core::{CompileOptions, CompiledScript, Result};

/// Compile a completion document into a bash script.
///
/// `function_name` replaces the derived `_<program>_completions` name.
pub fn compile(text: &str, function_name: Option<&str>) -> Result<CompiledScript> {
    let mut options = CompileOptions::default();
    if let Some(name) = function_name {
        options = options.with_function_name(name);
    }
    compile_with(text, &options)
}

/// Compile a completion document with explicit options
pub fn compile_with(text: &str, options: &CompileOptions) -> Result<CompiledScript> {
    let tree = tabsmith_parser::parse_string(text, options)?;
    BashEmitter::new().emit(&tree)
}

/// Compile the completion document at `path`
pub fn compile_file(path: impl AsRef<Path>, options: &CompileOptions) -> Result<CompiledScript> {
    let tree = tabsmith_parser::parse_file(path, options)?;
    BashEmitter::new().emit(&tree)
}
