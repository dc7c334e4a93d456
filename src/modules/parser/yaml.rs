//! YAML completion document parser
//!
//! Reads the loosely-typed YAML mapping into a tagged [`Document`] so the
//! tree builder never has to look at raw YAML values.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tabsmith_core::{Result, TabsmithError};

/// Key listing the literal sub-words of a node
pub(crate) const VALUES_KEY: &str = "values";

/// Key listing the flags of a node
pub(crate) const FLAGS_KEY: &str = "flags";

/// YAML parser for completion documents
pub struct YamlParser;

/// A parsed, not yet validated, completion document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Top-level key: the program being completed
    pub program: String,

    /// Declarations for the program itself
    pub root: RawNode,
}

/// Declarations for one position in the command hierarchy
#[derive(Debug, Clone, PartialEq)]
pub enum RawNode {
    /// An entry with nothing declared below it
    Leaf,

    /// An entry with sub-words, flags or nested entries
    Branch(RawBranch),
}

/// Contents of a [`RawNode::Branch`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawBranch {
    /// Literal sub-words, in declaration order
    pub values: Vec<String>,

    /// Flags, in declaration order
    pub flags: Vec<RawFlag>,

    /// Declarations nested under a literal, keyed by that literal
    pub nested: Vec<(String, RawNode)>,
}

/// A flag entry as written in the document
#[derive(Debug, Clone, PartialEq)]
pub struct RawFlag {
    /// Mapping key: one or more spellings separated by spaces or commas
    pub spelling: String,

    /// What the entry says about the flag's value
    pub arity: RawArity,
}

/// Value declaration of a flag entry
#[derive(Debug, Clone, PartialEq)]
pub enum RawArity {
    /// `true` or nothing: the flag takes no value
    Switch,

    /// A list: the flag takes a value completed from these candidates
    Values(Vec<String>),

    /// A mapping spelling out each property
    Explicit(FlagOptions),
}

/// Explicit flag properties
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlagOptions {
    /// Whether the flag takes a value
    pub value: Option<bool>,

    /// Value candidates
    pub candidates: Option<Vec<String>>,

    /// Whether the flag may be given more than once
    pub repeat: Option<bool>,
}

/// Mapping form of a flag entry, e.g. `{ value: true, candidates: [a, b], repeat: false }`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TerseFlagOptions {
    #[serde(default)]
    value: Option<bool>,

    #[serde(default)]
    candidates: Option<Vec<Value>>,

    #[serde(default)]
    repeat: Option<bool>,
}

impl YamlParser {
    /// Parse a YAML string into a completion document
    pub fn parse(content: &str) -> Result<Document> {
        let value: Value = serde_yaml::from_str(content)
            .map_err(|e| TabsmithError::Document(format!("YAML parse error: {}", e)))?;

        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => {
                return Err(TabsmithError::Document(
                    "Document is empty: expected a top-level program key".to_string(),
                ))
            }
            other => {
                return Err(TabsmithError::Document(format!(
                    "Top level must be a mapping with one program key, found {}",
                    kind(&other)
                )))
            }
        };

        if mapping.len() != 1 {
            return Err(TabsmithError::Document(format!(
                "Expected exactly one top-level program key, found {}",
                mapping.len()
            )));
        }

        let Some((key, body)) = mapping.into_iter().next() else {
            return Err(TabsmithError::Document(
                "Document has no program key".to_string(),
            ));
        };

        let program = yaml_scalar_to_string(&key).ok_or_else(|| {
            TabsmithError::Document(format!(
                "Program key must be a scalar, found {}",
                kind(&key)
            ))
        })?;

        let root = parse_node(&program, body)?;

        Ok(Document { program, root })
    }
}

fn parse_node(path: &str, value: Value) -> Result<RawNode> {
    match value {
        Value::Null => Ok(RawNode::Leaf),
        // `prog: [a, b]` is shorthand for `prog: { values: [a, b] }`
        Value::Sequence(items) => Ok(RawNode::Branch(RawBranch {
            values: parse_words(path, VALUES_KEY, items)?,
            ..RawBranch::default()
        })),
        Value::Mapping(mapping) => parse_branch(path, mapping).map(RawNode::Branch),
        other => Err(TabsmithError::Document(format!(
            "'{}': expected a mapping, a list or nothing, found {}",
            path,
            kind(&other)
        ))),
    }
}

fn parse_branch(path: &str, mapping: Mapping) -> Result<RawBranch> {
    let mut branch = RawBranch::default();

    for (key, value) in mapping {
        let key = yaml_scalar_to_string(&key).ok_or_else(|| {
            TabsmithError::Document(format!(
                "'{}': keys must be scalars, found {}",
                path,
                kind(&key)
            ))
        })?;

        match key.as_str() {
            VALUES_KEY => {
                branch.values = match value {
                    Value::Null => Vec::new(),
                    Value::Sequence(items) => parse_words(path, VALUES_KEY, items)?,
                    other => {
                        return Err(TabsmithError::Document(format!(
                            "'{}': '{}' must be a list, found {}",
                            path,
                            VALUES_KEY,
                            kind(&other)
                        )))
                    }
                };
            }
            FLAGS_KEY => {
                branch.flags = match value {
                    Value::Null => Vec::new(),
                    Value::Mapping(flags) => parse_flags(path, flags)?,
                    other => {
                        return Err(TabsmithError::Document(format!(
                            "'{}': '{}' must be a mapping, found {}",
                            path,
                            FLAGS_KEY,
                            kind(&other)
                        )))
                    }
                };
            }
            _ => {
                let nested_path = format!("{} {}", path, key);
                let node = parse_node(&nested_path, value)?;
                branch.nested.push((key, node));
            }
        }
    }

    Ok(branch)
}

fn parse_flags(path: &str, flags: Mapping) -> Result<Vec<RawFlag>> {
    let mut parsed = Vec::with_capacity(flags.len());

    for (key, value) in flags {
        let spelling = yaml_scalar_to_string(&key).ok_or_else(|| {
            TabsmithError::Document(format!(
                "'{}': flag keys must be scalars, found {}",
                path,
                kind(&key)
            ))
        })?;
        let flag_path = format!("{} {}", path, spelling);

        let arity = match value {
            Value::Null | Value::Bool(true) => RawArity::Switch,
            Value::Sequence(items) => RawArity::Values(parse_words(&flag_path, "candidates", items)?),
            Value::Mapping(mapping) => {
                let options: TerseFlagOptions = serde_yaml::from_value(Value::Mapping(mapping))
                    .map_err(|e| {
                        TabsmithError::Document(format!("'{}': invalid flag options: {}", flag_path, e))
                    })?;
                let candidates = match options.candidates {
                    None => None,
                    Some(items) => Some(parse_words(&flag_path, "candidates", items)?),
                };
                RawArity::Explicit(FlagOptions {
                    value: options.value,
                    candidates,
                    repeat: options.repeat,
                })
            }
            other => {
                return Err(TabsmithError::Document(format!(
                    "'{}': a flag must be `true`, a list of values or a mapping, found {}",
                    flag_path,
                    kind(&other)
                )))
            }
        };

        parsed.push(RawFlag { spelling, arity });
    }

    Ok(parsed)
}

fn parse_words(path: &str, field: &str, items: Vec<Value>) -> Result<Vec<String>> {
    items
        .iter()
        .map(|item| {
            yaml_scalar_to_string(item).ok_or_else(|| {
                TabsmithError::Document(format!(
                    "'{}': entries of '{}' must be scalars, found {}",
                    path,
                    field,
                    kind(item)
                ))
            })
        })
        .collect()
}

fn yaml_scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
