//! Flag definitions

use serde::{Deserialize, Serialize};

/// One recognized option at a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSpec {
    /// Spellings that select this flag (e.g. `-f` and `--file`)
    pub tokens: Vec<String>,

    /// Whether the next word is consumed as the flag's value
    #[serde(default)]
    pub takes_value: bool,

    /// Candidates offered when completing the value (empty means free text)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_candidates: Vec<String>,

    /// Whether the flag is offered again after it was typed (default: true)
    #[serde(default = "default_repeatable")]
    pub repeatable: bool,
}

fn default_repeatable() -> bool {
    true
}

impl FlagSpec {
    /// Create a repeatable flag that takes no value
    pub fn switch<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            takes_value: false,
            value_candidates: Vec::new(),
            repeatable: true,
        }
    }

    /// Create a repeatable flag whose value is completed from `candidates`
    pub fn with_value<I, S, C, V>(tokens: I, candidates: C) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        C: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            takes_value: true,
            value_candidates: candidates.into_iter().map(Into::into).collect(),
            repeatable: true,
        }
    }

    /// Mark this flag as single-use
    pub fn single_use(mut self) -> Self {
        self.repeatable = false;
        self
    }

    /// Check if `word` is one of this flag's spellings
    pub fn matches(&self, word: &str) -> bool {
        self.tokens.iter().any(|t| t == word)
    }

    /// Whether completing the value has candidates (as opposed to free text)
    pub fn has_value_candidates(&self) -> bool {
        self.takes_value && !self.value_candidates.is_empty()
    }
}
