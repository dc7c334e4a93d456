//! Completion tree building and validation

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tabsmith_core::{CompileOptions, CompletionNode, CompletionTree, FlagSpec, Result, TabsmithError};
use tabsmith_types::{identifier, word};
use tracing::{debug, warn};

use crate::yaml::{Document, RawArity, RawBranch, RawFlag, RawNode, FLAGS_KEY, VALUES_KEY};

/// Separators between the spellings of one flag entry, e.g. `-f, --file`
static SPELLING_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s,]+").unwrap());

/// Turns a parsed document into a validated completion tree
pub struct TreeBuilder {
    options: CompileOptions,
}

impl TreeBuilder {
    /// Create a builder with the given compile options
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    /// Validate the document and build its completion tree
    pub fn build(&self, document: &Document) -> Result<CompletionTree> {
        let program = document.program.as_str();
        self.validate_program(program)?;

        let function_name = self.resolve_function_name(program)?;
        let root = self.build_node(program, None, &document.root)?;

        let tree = CompletionTree {
            program: program.to_string(),
            function_name,
            root,
        };

        debug!(
            program = %tree.program,
            function = %tree.function_name,
            nodes = tree.node_count(),
            flags = tree.flag_count(),
            "Built completion tree"
        );

        Ok(tree)
    }

    /// Validate the program name the completion is registered for
    fn validate_program(&self, program: &str) -> Result<()> {
        self.validate_word(program, program, "program name")?;

        if program.chars().any(char::is_whitespace) {
            return Err(TabsmithError::validation(
                program,
                "program name must not contain whitespace",
            ));
        }

        Ok(())
    }

    /// Use the override when given, otherwise derive from the program name
    fn resolve_function_name(&self, program: &str) -> Result<String> {
        match &self.options.function_name {
            Some(name) => {
                identifier::check_function_name(name)
                    .map_err(|message| TabsmithError::validation(program, message))?;
                Ok(name.clone())
            }
            None => Ok(identifier::completion_function_name(program)),
        }
    }

    fn build_node(&self, path: &str, literal: Option<&str>, raw: &RawNode) -> Result<CompletionNode> {
        let mut node = match literal {
            Some(literal) => CompletionNode::new(literal),
            None => CompletionNode::root(),
        };

        let branch = match raw {
            RawNode::Leaf => return Ok(node),
            RawNode::Branch(branch) => branch,
        };

        self.validate_literals(path, &branch.values)?;
        self.validate_nested(path, branch)?;
        node.flags = self.build_flags(path, branch)?;

        for value in &branch.values {
            let child = match branch.nested.iter().find(|(key, _)| key == value) {
                Some((_, raw_child)) => {
                    let child_path = format!("{} {}", path, value);
                    self.build_node(&child_path, Some(value), raw_child)?
                }
                None => CompletionNode::new(value.as_str()),
            };
            node.children.push(child);
        }

        Ok(node)
    }

    /// Validate the literal sub-words of a node
    fn validate_literals(&self, path: &str, values: &[String]) -> Result<()> {
        let mut seen = HashSet::new();

        for value in values {
            self.validate_word(path, value, "literal")?;
            self.validate_walked_word(path, value, "literal")?;

            if value == VALUES_KEY || value == FLAGS_KEY {
                return Err(TabsmithError::validation(
                    path,
                    format!(
                        "literal '{}' is a reserved key and cannot be declared as a sub-word",
                        value
                    ),
                ));
            }

            if !seen.insert(value.as_str()) {
                return Err(TabsmithError::validation(
                    path,
                    format!("duplicate literal '{}'", value),
                ));
            }
        }

        Ok(())
    }

    /// Validate that every nested entry refers to a declared literal
    fn validate_nested(&self, path: &str, branch: &RawBranch) -> Result<()> {
        for (key, _) in &branch.nested {
            if !branch.values.contains(key) {
                return Err(TabsmithError::validation(
                    path,
                    format!(
                        "entry '{}' does not match any literal listed under 'values'",
                        key
                    ),
                ));
            }
        }

        Ok(())
    }

    fn build_flags(&self, path: &str, branch: &RawBranch) -> Result<Vec<FlagSpec>> {
        let literals: HashSet<&str> = branch.values.iter().map(String::as_str).collect();
        let mut tokens_seen: HashSet<String> = HashSet::new();
        let mut flags = Vec::with_capacity(branch.flags.len());

        for raw in &branch.flags {
            let tokens = split_spelling(&raw.spelling);
            if tokens.is_empty() {
                return Err(TabsmithError::validation(
                    path,
                    format!("flag '{}' has no spelling", raw.spelling),
                ));
            }

            for token in &tokens {
                self.validate_word(path, token, "flag token")?;
                self.validate_walked_word(path, token, "flag token")?;

                if literals.contains(token.as_str()) {
                    return Err(TabsmithError::validation(
                        path,
                        format!("flag token '{}' collides with a literal of the same name", token),
                    ));
                }

                if !tokens_seen.insert(token.clone()) {
                    return Err(TabsmithError::validation(
                        path,
                        format!("duplicate flag token '{}'", token),
                    ));
                }
            }

            flags.push(self.build_flag(path, raw, tokens)?);
        }

        Ok(flags)
    }

    fn build_flag(&self, path: &str, raw: &RawFlag, tokens: Vec<String>) -> Result<FlagSpec> {
        let flag_path = format!("{} {}", path, raw.spelling);

        let (takes_value, candidates, repeat) = match &raw.arity {
            RawArity::Switch => (false, None, None),
            RawArity::Values(candidates) => (true, Some(candidates), None),
            RawArity::Explicit(options) => {
                let takes_value = options.value.unwrap_or(options.candidates.is_some());
                if !takes_value && options.candidates.is_some() {
                    return Err(TabsmithError::validation(
                        flag_path,
                        "value candidates are listed for a flag that takes no value",
                    ));
                }
                (takes_value, options.candidates.as_ref(), options.repeat)
            }
        };

        let value_candidates = match candidates {
            Some(candidates) => self.build_candidates(&flag_path, candidates)?,
            None => Vec::new(),
        };

        Ok(FlagSpec {
            tokens,
            takes_value,
            value_candidates,
            repeatable: repeat.unwrap_or(self.options.repeatable_flags),
        })
    }

    /// Validate value candidates, collapsing duplicates
    fn build_candidates(&self, path: &str, candidates: &[String]) -> Result<Vec<String>> {
        let mut unique: Vec<String> = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            self.validate_word(path, candidate, "value candidate")?;

            if word::has_word_breaks(candidate) {
                warn!(
                    path,
                    candidate = %candidate,
                    "Value candidate contains ':' or '=', which bash splits into separate words"
                );
            }

            if unique.contains(candidate) {
                warn!(path, candidate = %candidate, "Ignoring duplicate value candidate");
                continue;
            }
            unique.push(candidate.clone());
        }

        Ok(unique)
    }

    /// Words the generated script walks must reach it as a single `COMP_WORDS` entry
    fn validate_walked_word(&self, path: &str, word: &str, what: &str) -> Result<()> {
        if word::has_word_breaks(word) {
            return Err(TabsmithError::validation(
                path,
                format!(
                    "{} '{}' contains ':' or '=', which bash splits into separate words",
                    what, word
                ),
            ));
        }

        Ok(())
    }

    /// Check that a word can be completed and written into the script
    fn validate_word(&self, path: &str, word: &str, what: &str) -> Result<()> {
        if word.trim().is_empty() {
            return Err(TabsmithError::validation(
                path,
                format!("{} cannot be empty or whitespace", what),
            ));
        }

        if word::has_control_chars(word) {
            return Err(TabsmithError::validation(
                path,
                format!(
                    "{} '{}' contains control characters that cannot be escaped",
                    what,
                    word.escape_debug()
                ),
            ));
        }

        Ok(())
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(CompileOptions::default())
    }
}

/// Split a flag entry key into its spellings
fn split_spelling(spelling: &str) -> Vec<String> {
    SPELLING_SEPARATOR
        .split(spelling)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::YamlParser;

    fn build(yaml: &str) -> Result<CompletionTree> {
        build_with(yaml, CompileOptions::default())
    }

    fn build_with(yaml: &str, options: CompileOptions) -> Result<CompletionTree> {
        let document = YamlParser::parse(yaml)?;
        TreeBuilder::new(options).build(&document)
    }

    fn validation_message(result: Result<CompletionTree>) -> String {
        match result {
            Err(TabsmithError::Validation { message, .. }) => message,
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_build_simple_tree() {
        let tree = build("prog:\n  values: [new, preview, generate]\n").unwrap();
        assert_eq!(tree.program, "prog");
        assert_eq!(tree.function_name, "_prog_completions");
        assert_eq!(tree.root.literal, None);
        assert_eq!(tree.root.candidates(), vec!["new", "preview", "generate"]);
    }

    #[test]
    fn test_build_nested_flags() {
        let yaml = r#"
prog:
  values: [generate]
  generate:
    flags:
      "-f, --function": [func_a, func_b, func_a]
      --dry:
"#;
        let tree = build(yaml).unwrap();
        let generate = tree.root.find_child("generate").unwrap();
        assert_eq!(generate.flags.len(), 2);

        let function = generate.find_flag("--function").unwrap();
        assert_eq!(function.tokens, vec!["-f", "--function"]);
        assert!(function.takes_value);
        assert_eq!(function.value_candidates, vec!["func_a", "func_b"]);

        let dry = generate.find_flag("--dry").unwrap();
        assert!(!dry.takes_value);
        assert!(dry.repeatable);
    }

    #[test]
    fn test_explicit_flag_options() {
        let yaml = r#"
prog:
  flags:
    --mode: { candidates: [fast, slow] }
    --name: { value: true }
    --once: { repeat: false }
"#;
        let tree = build(yaml).unwrap();
        let mode = tree.root.find_flag("--mode").unwrap();
        assert!(mode.takes_value);
        assert_eq!(mode.value_candidates, vec!["fast", "slow"]);

        let name = tree.root.find_flag("--name").unwrap();
        assert!(name.takes_value);
        assert!(name.value_candidates.is_empty());

        let once = tree.root.find_flag("--once").unwrap();
        assert!(!once.takes_value);
        assert!(!once.repeatable);
    }

    #[test]
    fn test_single_use_flags_option() {
        let yaml = "prog:\n  flags:\n    -v:\n    -x: { repeat: true }\n";
        let tree = build_with(yaml, CompileOptions::default().single_use_flags()).unwrap();
        assert!(!tree.root.find_flag("-v").unwrap().repeatable);
        assert!(tree.root.find_flag("-x").unwrap().repeatable);
    }

    #[test]
    fn test_function_name_override() {
        let options = CompileOptions::default().with_function_name("my_completions");
        let tree = build_with("my-app: [a]\n", options).unwrap();
        assert_eq!(tree.function_name, "my_completions");

        let tree = build("my-app: [a]\n").unwrap();
        assert_eq!(tree.function_name, "_my_app_completions");
    }

    #[test]
    fn test_invalid_function_name_override() {
        let options = CompileOptions::default().with_function_name("cd");
        let message = validation_message(build_with("prog: [a]\n", options));
        assert!(message.contains("builtin"));

        let options = CompileOptions::default().with_function_name("bad name");
        assert!(build_with("prog: [a]\n", options).is_err());
    }

    #[test]
    fn test_duplicate_literal() {
        let message = validation_message(build("prog: [a, b, a]\n"));
        assert!(message.contains("duplicate literal 'a'"));
    }

    #[test]
    fn test_flag_collides_with_literal() {
        let yaml = "prog:\n  values: [generate, -h]\n  flags:\n    -h --help: true\n";
        let message = validation_message(build(yaml));
        assert!(message.contains("collides"));
    }

    #[test]
    fn test_duplicate_flag_token() {
        let yaml = "prog:\n  flags:\n    -f --file:\n    -f --force:\n";
        let message = validation_message(build(yaml));
        assert!(message.contains("duplicate flag token '-f'"));
    }

    #[test]
    fn test_candidates_for_switch() {
        let yaml = "prog:\n  flags:\n    --mode: { value: false, candidates: [a] }\n";
        let err = build(yaml).unwrap_err();
        assert_eq!(err.path(), Some("prog --mode"));
        assert!(err.to_string().contains("takes no value"));
    }

    #[test]
    fn test_malformed_words() {
        assert!(validation_message(build("prog: ['  ']\n")).contains("empty"));
        assert!(validation_message(build("prog: [\"a\\nb\"]\n")).contains("control characters"));
        assert!(validation_message(build("prog:\n  flags:\n    \"-x\\a\": true\n")).contains("control"));
        assert!(validation_message(build("prog:\n  flags:\n    ' , ': true\n")).contains("no spelling"));
        assert!(validation_message(build("prog:\n  flags:\n    -f: ['']\n")).contains("value candidate"));
        assert!(validation_message(build("'my prog': [a]\n")).contains("whitespace"));
    }

    #[test]
    fn test_nested_entry_without_literal() {
        let yaml = "prog:\n  values: [generate]\n  generat:\n    values: [x]\n";
        let err = build(yaml).unwrap_err();
        assert_eq!(err.path(), Some("prog"));
        assert!(err.to_string().contains("'generat'"));
    }

    #[test]
    fn test_error_path_points_at_nested_node() {
        let yaml = "prog:\n  values: [generate]\n  generate: [x, x]\n";
        let err = build(yaml).unwrap_err();
        assert_eq!(err.path(), Some("prog generate"));
    }

    #[test]
    fn test_literal_with_space_is_allowed() {
        let tree = build("prog: ['my command', \"it's\"]\n").unwrap();
        assert_eq!(tree.root.candidates(), vec!["my command", "it's"]);
    }

    #[test]
    fn test_word_breaks_in_walked_words() {
        let err = build("prog: [--out=dir]\n").unwrap_err();
        assert_eq!(err.path(), Some("prog"));
        assert!(err.to_string().contains("':' or '='"));

        let err = build("prog:\n  values: [a]\n  a:\n    flags:\n      --opt=x: true\n").unwrap_err();
        assert_eq!(err.path(), Some("prog a"));

        // value candidates are only offered, never walked
        let tree = build("prog:\n  flags:\n    --host: [\"localhost:8080\"]\n").unwrap();
        assert_eq!(tree.root.flags[0].value_candidates, vec!["localhost:8080"]);
    }

    #[test]
    fn test_reserved_keys_are_not_literals() {
        for yaml in ["prog: [a, flags]\n", "prog:\n  values: [values]\n"] {
            let message = validation_message(build(yaml));
            assert!(message.contains("reserved key"), "{}", message);
        }
    }

    #[test]
    fn test_split_spelling() {
        assert_eq!(split_spelling("-f --file"), vec!["-f", "--file"]);
        assert_eq!(split_spelling("-f, --file"), vec!["-f", "--file"]);
        assert!(split_spelling(" , ").is_empty());
    }
}
