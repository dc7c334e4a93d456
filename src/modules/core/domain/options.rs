//! Compiler options

use serde::{Deserialize, Serialize};

/// Settings for a single compile run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Replaces the derived completion function name when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,

    /// Default repeatability of flags that do not declare it (default: true)
    #[serde(default = "default_repeatable_flags")]
    pub repeatable_flags: bool,
}

fn default_repeatable_flags() -> bool {
    true
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            function_name: None,
            repeatable_flags: true,
        }
    }
}

impl CompileOptions {
    /// Override the completion function name
    pub fn with_function_name(mut self, function_name: impl Into<String>) -> Self {
        self.function_name = Some(function_name.into());
        self
    }

    /// Make flags single-use unless they declare otherwise
    pub fn single_use_flags(mut self) -> Self {
        self.repeatable_flags = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_options_default() {
        let options = CompileOptions::default();
        assert!(options.function_name.is_none());
        assert!(options.repeatable_flags);
    }

    #[test]
    fn test_compile_options_builders() {
        let options = CompileOptions::default()
            .with_function_name("my_completions")
            .single_use_flags();
        assert_eq!(options.function_name.as_deref(), Some("my_completions"));
        assert!(!options.repeatable_flags);
    }

    #[test]
    fn test_compile_options_serde() {
        let options: CompileOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, CompileOptions::default());
    }
}
