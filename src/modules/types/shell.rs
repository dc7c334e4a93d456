//! Target shell definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shells a completion script can be compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    /// GNU bash, using `complete -F` and `COMPREPLY`
    #[default]
    Bash,
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shell::Bash => write!(f, "bash"),
        }
    }
}

impl FromStr for Shell {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bash" => Ok(Shell::Bash),
            _ => Err(format!("Unsupported shell: {}", s)),
        }
    }
}

impl Shell {
    /// Oldest shell version the emitted syntax runs on
    pub fn min_version(&self) -> &'static str {
        match self {
            // `printf -v`, `+=` on arrays and `[[ ]]` pattern matching
            Shell::Bash => "3.2",
        }
    }

    /// Conventional file extension for scripts of this shell
    pub fn extension(&self) -> &'static str {
        match self {
            Shell::Bash => "bash",
        }
    }
}
