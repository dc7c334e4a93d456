//! Root completion tree

use serde::{Deserialize, Serialize};
use tabsmith_types::identifier;

use super::CompletionNode;

/// A validated completion tree for one program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionTree {
    /// Program the completion is registered for
    pub program: String,

    /// Name of the generated completion function
    pub function_name: String,

    /// Root of the command hierarchy
    pub root: CompletionNode,
}

impl CompletionTree {
    /// Create a tree using the default function name for `program`
    pub fn new(program: impl Into<String>, root: CompletionNode) -> Self {
        let program = program.into();
        let function_name = identifier::completion_function_name(&program);
        Self {
            program,
            function_name,
            root,
        }
    }

    /// Replace the completion function name
    pub fn with_function_name(mut self, function_name: impl Into<String>) -> Self {
        self.function_name = function_name.into();
        self
    }

    /// Number of nodes in the tree, root included
    pub fn node_count(&self) -> usize {
        self.root.preorder().len()
    }

    /// Number of flags declared anywhere in the tree
    pub fn flag_count(&self) -> usize {
        self.root.preorder().iter().map(|n| n.flags.len()).sum()
    }
}
