//! In-memory completion resolver
//!
//! Maps the words typed so far to the candidates for the word under the
//! cursor. The generated bash function performs the same walk; this module is
//! the reference used by `tabsmith test` and by the emitter's tests.

use crate::{CompletionNode, FlagSpec};

/// Result of walking the prior words through the tree
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    /// Deepest node reached
    pub position: &'a CompletionNode,

    /// Words matched as child literals or flag tokens, in input order
    pub consumed: Vec<String>,

    /// Value-taking flag waiting for its value, if the cursor is on it
    pub pending: Option<&'a FlagSpec>,

    /// Index of the first word the walk did not recognize
    pub stopped_at: Option<usize>,
}

/// Resolves completion candidates against a completion tree
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    root: &'a CompletionNode,
}

impl<'a> Resolver<'a> {
    /// Create a resolver for the tree rooted at `root`
    pub fn new(root: &'a CompletionNode) -> Self {
        Self { root }
    }

    /// Walk `prior` words from the root.
    ///
    /// Flags taking a value skip the following word, switches and literals
    /// advance by one, and the first unrecognized word ends the walk.
    pub fn walk<S: AsRef<str>>(&self, prior: &[S]) -> Walk<'a> {
        let mut position = self.root;
        let mut consumed = Vec::new();
        let mut pending = None;
        let mut stopped_at = None;
        let mut index = 0;

        while index < prior.len() {
            let word = prior[index].as_ref();

            if let Some(flag) = position.find_flag(word) {
                consumed.push(word.to_string());
                if flag.takes_value {
                    if index + 1 == prior.len() {
                        pending = Some(flag);
                    }
                    index += 2;
                } else {
                    index += 1;
                }
            } else if let Some(child) = position.find_child(word) {
                consumed.push(word.to_string());
                position = child;
                index += 1;
            } else {
                stopped_at = Some(index);
                break;
            }
        }

        // The word before the cursor may still name a value flag even when
        // the walk stopped earlier on an unknown word.
        if stopped_at.is_some() && pending.is_none() {
            if let Some(last) = prior.last() {
                pending = position
                    .find_flag(last.as_ref())
                    .filter(|flag| flag.takes_value);
            }
        }

        Walk {
            position,
            consumed,
            pending,
            stopped_at,
        }
    }

    /// Candidates for the word under the cursor, in declaration order
    pub fn resolve<S: AsRef<str>>(&self, prior: &[S], prefix: &str) -> Vec<String> {
        let walk = self.walk(prior);

        let candidates: Vec<&str> = match walk.pending {
            Some(flag) => flag.value_candidates.iter().map(String::as_str).collect(),
            None => walk
                .position
                .candidates()
                .into_iter()
                .filter(|c| {
                    !(walk.position.is_exclusive(c) && walk.consumed.iter().any(|w| w == c))
                })
                .collect(),
        };

        candidates
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .map(str::to_string)
            .collect()
    }
}
