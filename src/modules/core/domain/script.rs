//! Compiled completion scripts

use serde::Serialize;
use std::fmt;
use tabsmith_types::Shell;

/// Output of a compile run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledScript {
    /// Program the script registers completion for
    pub program: String,

    /// Name of the completion function defined by the script
    pub function_name: String,

    /// Shell grammar the script is written in
    pub shell: Shell,

    /// Script text
    pub text: String,
}

impl CompiledScript {
    /// Script text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Default file name for the script, e.g. `prog.bash`
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.program, self.shell.extension())
    }
}

impl fmt::Display for CompiledScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
