//! Completion document parsing for Tabsmith
//!
//! This crate reads YAML completion documents and builds the validated
//! completion tree the emitter and resolver work on.

pub mod builder;
pub mod yaml;

pub use builder::TreeBuilder;
pub use yaml::{Document, RawNode, YamlParser};

use std::path::Path;
use tabsmith_core::{CompileOptions, CompletionTree, TabsmithError};

/// Parse a completion document from a path
pub fn parse_file(
    path: impl AsRef<Path>,
    options: &CompileOptions,
) -> Result<CompletionTree, TabsmithError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        TabsmithError::Config(format!("Failed to read file '{}': {}", path.display(), e))
    })?;

    parse_string(&content, options)
}

/// Parse a completion document from a string
pub fn parse_string(content: &str, options: &CompileOptions) -> Result<CompletionTree, TabsmithError> {
    // Parse YAML
    let document = YamlParser::parse(content)?;

    // Validate and build the tree
    let builder = TreeBuilder::new(options.clone());
    builder.build(&document)
}
