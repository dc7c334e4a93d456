//! Domain models for completion trees

mod flag;
mod node;
mod options;
mod script;
mod tree;

pub use flag::FlagSpec;
pub use node::CompletionNode;
pub use options::CompileOptions;
pub use script::CompiledScript;
pub use tree::CompletionTree;
