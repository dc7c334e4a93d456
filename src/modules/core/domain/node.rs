//! Completion tree nodes

use serde::{Deserialize, Serialize};

use super::FlagSpec;

/// One position in the command hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompletionNode {
    /// Word that leads from the parent to this node (absent at the root)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,

    /// Sub-words, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CompletionNode>,

    /// Flags valid at this position, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagSpec>,
}

impl CompletionNode {
    /// Create an empty root node
    pub fn root() -> Self {
        Self::default()
    }

    /// Create an empty node reached by `literal`
    pub fn new(literal: impl Into<String>) -> Self {
        Self {
            literal: Some(literal.into()),
            children: Vec::new(),
            flags: Vec::new(),
        }
    }

    /// Add a child node
    pub fn with_child(mut self, child: CompletionNode) -> Self {
        self.children.push(child);
        self
    }

    /// Add a flag
    pub fn with_flag(mut self, flag: FlagSpec) -> Self {
        self.flags.push(flag);
        self
    }

    /// Find the child reached by `word`
    pub fn find_child(&self, word: &str) -> Option<&CompletionNode> {
        self.children
            .iter()
            .find(|c| c.literal.as_deref() == Some(word))
    }

    /// Find the flag spelled `word`
    pub fn find_flag(&self, word: &str) -> Option<&FlagSpec> {
        self.flags.iter().find(|f| f.matches(word))
    }

    /// Literals of all children, in declaration order
    pub fn literals(&self) -> impl Iterator<Item = &str> {
        self.children.iter().filter_map(|c| c.literal.as_deref())
    }

    /// Flag tokens of all flags, in declaration order
    pub fn flag_tokens(&self) -> impl Iterator<Item = &str> {
        self.flags
            .iter()
            .flat_map(|f| f.tokens.iter().map(String::as_str))
    }

    /// Every word offered at this position: child literals, then flag tokens
    pub fn candidates(&self) -> Vec<&str> {
        self.literals().chain(self.flag_tokens()).collect()
    }

    /// Whether `candidate` is dropped once it has been typed.
    ///
    /// Child literals are never offered twice; flag tokens only when the flag
    /// is single-use.
    pub fn is_exclusive(&self, candidate: &str) -> bool {
        self.find_child(candidate).is_some()
            || self
                .find_flag(candidate)
                .map(|f| !f.repeatable)
                .unwrap_or(false)
    }

    /// Whether nothing can be completed after this node
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.flags.is_empty()
    }

    /// This node and all descendants in depth-first preorder.
    ///
    /// The order is stable for a given tree; the emitter numbers nodes by
    /// their position in this list.
    pub fn preorder(&self) -> Vec<&CompletionNode> {
        let mut nodes = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            nodes.push(node);
            stack.extend(node.children.iter().rev());
        }
        nodes
    }
}
