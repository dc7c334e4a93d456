//! Bash completion script emitter
//!
//! The generated function re-runs the resolver walk natively: every node gets
//! a number, prior words are matched with `case` over the current node, and
//! the candidates of the node (or of a flag waiting for its value) are
//! prefix-filtered into `COMPREPLY`.

use tabsmith_core::{CompiledScript, CompletionNode, CompletionTree, FlagSpec, Result, TabsmithError};
use tabsmith_types::{identifier, word, Shell};
use tracing::debug;

use crate::writer::ScriptWriter;

const TABSMITH_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A node with the numbers of its children and value flags
struct Numbered<'a> {
    node: &'a CompletionNode,
    children: Vec<usize>,
    /// Per flag of the node: its number if it takes a value
    value_flags: Vec<Option<usize>>,
}

/// Node and value-flag numbering, in depth-first preorder
struct Layout<'a> {
    nodes: Vec<Numbered<'a>>,
    value_flags: Vec<&'a FlagSpec>,
}

impl<'a> Layout<'a> {
    fn new(root: &'a CompletionNode) -> Self {
        let mut layout = Self {
            nodes: Vec::new(),
            value_flags: Vec::new(),
        };
        layout.number(root);
        layout
    }

    fn number(&mut self, node: &'a CompletionNode) -> usize {
        let id = self.nodes.len();

        let value_flags = node
            .flags
            .iter()
            .map(|flag| {
                flag.takes_value.then(|| {
                    self.value_flags.push(flag);
                    self.value_flags.len() - 1
                })
            })
            .collect();

        self.nodes.push(Numbered {
            node,
            children: Vec::new(),
            value_flags,
        });

        for child in &node.children {
            let child_id = self.number(child);
            self.nodes[id].children.push(child_id);
        }

        id
    }
}

/// Emits bash completion scripts
#[derive(Debug, Default, Clone, Copy)]
pub struct BashEmitter;

impl BashEmitter {
    /// Create a new bash emitter
    pub fn new() -> Self {
        Self
    }

    /// Render the completion script for `tree`
    pub fn emit(&self, tree: &CompletionTree) -> Result<CompiledScript> {
        self.check_tree(tree)?;

        let layout = Layout::new(&tree.root);
        let mut writer = ScriptWriter::new();

        self.write_header(&mut writer, tree);
        writer.line(0, format!("{}() {{", tree.function_name));
        self.write_locals(&mut writer);
        self.write_walk(&mut writer, &layout);
        self.write_pending_flag(&mut writer, &layout);
        self.write_candidates(&mut writer, &layout);
        self.write_reply(&mut writer);
        writer.line(0, "}");
        writer.blank();
        writer.line(
            0,
            format!(
                "complete -F {} {}",
                tree.function_name,
                word::quote(&tree.program)
            ),
        );

        debug!(
            program = %tree.program,
            nodes = layout.nodes.len(),
            value_flags = layout.value_flags.len(),
            "Emitted bash completion script"
        );

        Ok(CompiledScript {
            program: tree.program.clone(),
            function_name: tree.function_name.clone(),
            shell: Shell::Bash,
            text: writer.finish(),
        })
    }

    /// Reject names and words bash cannot represent
    fn check_tree(&self, tree: &CompletionTree) -> Result<()> {
        identifier::check_function_name(&tree.function_name).map_err(TabsmithError::Emission)?;

        let check = |what: &str, text: &str| -> Result<()> {
            if word::is_representable(text) {
                Ok(())
            } else {
                Err(TabsmithError::Emission(format!(
                    "{} '{}' cannot be written as a bash word",
                    what,
                    text.escape_debug()
                )))
            }
        };

        check("program name", &tree.program)?;
        for node in tree.root.preorder() {
            if let Some(literal) = &node.literal {
                check("literal", literal)?;
            }
            for flag in &node.flags {
                for token in &flag.tokens {
                    check("flag token", token)?;
                }
                for candidate in &flag.value_candidates {
                    check("value candidate", candidate)?;
                }
            }
        }

        Ok(())
    }

    fn write_header(&self, w: &mut ScriptWriter, tree: &CompletionTree) {
        w.line(0, format!("# {} completion -*- shell-script -*-", tree.program));
        w.line(0, "#");
        w.line(
            0,
            format!("# Generated by tabsmith {}. Regenerate it instead of editing by hand.", TABSMITH_VERSION),
        );
        w.line(0, format!("# Requires bash {} or later.", Shell::Bash.min_version()));
        w.blank();
    }

    fn write_locals(&self, w: &mut ScriptWriter) {
        w.line(1, r#"local cur="${COMP_WORDS[COMP_CWORD]}""#);
        w.line(1, r#"local -a words=("${COMP_WORDS[@]:1:COMP_CWORD-1}")"#);
        w.line(1, "local -a used=() candidates=() exclusive=()");
        w.line(1, "local -i node=0 index=0 count=${#words[@]}");
        w.line(1, r#"local word flag="" stopped="""#);
        w.blank();
    }

    /// Walk the prior words, tracking the current node
    fn write_walk(&self, w: &mut ScriptWriter, layout: &Layout<'_>) {
        w.line(1, "while (( index < count )); do");
        w.line(2, r#"word="${words[index]}""#);

        let arms: Vec<&Numbered<'_>> = layout.nodes.iter().filter(|n| !n.node.is_leaf()).collect();
        if !arms.is_empty() {
            w.line(2, r#"case "$node" in"#);
            for (id, numbered) in layout.nodes.iter().enumerate() {
                if numbered.node.is_leaf() {
                    continue;
                }

                w.line(3, format!("{})", id));
                w.line(4, r#"case "$word" in"#);
                for (flag, flag_id) in numbered.node.flags.iter().zip(&numbered.value_flags) {
                    for token in &flag.tokens {
                        let step = match flag_id {
                            Some(flag_id) => format!(
                                "(( index + 1 == count )) && flag={}; index=$((index + 2))",
                                flag_id
                            ),
                            None => "index=$((index + 1))".to_string(),
                        };
                        w.line(
                            5,
                            format!(
                                "{}) used+=({}); {}; continue ;;",
                                patterns(token),
                                word::quote(token),
                                step
                            ),
                        );
                    }
                }
                for (child, child_id) in numbered.node.children.iter().zip(&numbered.children) {
                    if let Some(literal) = &child.literal {
                        w.line(
                            5,
                            format!(
                                "{}) used+=({}); node={}; index=$((index + 1)); continue ;;",
                                patterns(literal),
                                word::quote(literal),
                                child_id
                            ),
                        );
                    }
                }
                w.line(4, "esac");
                w.line(4, ";;");
            }
            w.line(2, "esac");
        }

        w.line(2, "stopped=1");
        w.line(2, "break");
        w.line(1, "done");
        w.blank();
    }

    /// After an early stop, the word before the cursor may still be a flag
    /// waiting for its value
    fn write_pending_flag(&self, w: &mut ScriptWriter, layout: &Layout<'_>) {
        if layout.value_flags.is_empty() {
            return;
        }

        w.line(1, r#"if [[ -n "$stopped" && -z "$flag" ]]; then"#);
        w.line(2, r#"case "$node" in"#);
        for (id, numbered) in layout.nodes.iter().enumerate() {
            if numbered.value_flags.iter().all(Option::is_none) {
                continue;
            }

            w.line(3, format!("{})", id));
            w.line(4, r#"case "${words[count-1]}" in"#);
            for (flag, flag_id) in numbered.node.flags.iter().zip(&numbered.value_flags) {
                if let Some(flag_id) = flag_id {
                    let alternatives: Vec<String> = flag.tokens.iter().map(|t| patterns(t)).collect();
                    w.line(5, format!("{}) flag={} ;;", alternatives.join("|"), flag_id));
                }
            }
            w.line(4, "esac");
            w.line(4, ";;");
        }
        w.line(2, "esac");
        w.line(1, "fi");
        w.blank();
    }

    /// Fill `candidates` (and `exclusive`) for the flag value or node reached
    fn write_candidates(&self, w: &mut ScriptWriter, layout: &Layout<'_>) {
        let flag_arms: Vec<String> = layout
            .value_flags
            .iter()
            .enumerate()
            .filter(|(_, flag)| flag.has_value_candidates())
            .map(|(id, flag)| format!("{}) candidates=({}) ;;", id, words(&flag.value_candidates)))
            .collect();

        let node_arms: Vec<String> = layout
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, numbered)| !numbered.node.is_leaf())
            .map(|(id, numbered)| {
                let node = numbered.node;
                let candidates = node.candidates();
                let exclusive: Vec<&str> = candidates
                    .iter()
                    .copied()
                    .filter(|c| node.is_exclusive(c))
                    .collect();

                if exclusive.is_empty() {
                    format!("{}) candidates=({}) ;;", id, words(&candidates))
                } else {
                    format!(
                        "{}) candidates=({}); exclusive=({}) ;;",
                        id,
                        words(&candidates),
                        words(&exclusive)
                    )
                }
            })
            .collect();

        let write_case = |w: &mut ScriptWriter, depth: usize, variable: &str, arms: &[String]| {
            w.line(depth, format!(r#"case "${}" in"#, variable));
            for arm in arms {
                w.line(depth + 1, arm);
            }
            w.line(depth, "esac");
        };

        if layout.value_flags.is_empty() {
            if !node_arms.is_empty() {
                write_case(w, 1, "node", &node_arms);
            }
        } else if flag_arms.is_empty() {
            w.line(1, r#"if [[ -z "$flag" ]]; then"#);
            if node_arms.is_empty() {
                w.line(2, ":");
            } else {
                write_case(w, 2, "node", &node_arms);
            }
            w.line(1, "fi");
        } else {
            w.line(1, r#"if [[ -n "$flag" ]]; then"#);
            write_case(w, 2, "flag", &flag_arms);
            if !node_arms.is_empty() {
                w.line(1, "else");
                write_case(w, 2, "node", &node_arms);
            }
            w.line(1, "fi");
        }
        w.blank();
    }

    /// Drop typed exclusive candidates, prefix-filter and escape into COMPREPLY
    fn write_reply(&self, w: &mut ScriptWriter) {
        w.line(1, r#"local candidate item escaped bare="$cur" quoted="""#);
        w.line(1, r#"if [[ "$cur" == \"* || "$cur" == \'* ]]; then"#);
        w.line(2, r#"bare="${cur:1}""#);
        w.line(2, "quoted=1");
        w.line(1, "fi");
        w.blank();
        w.line(1, "COMPREPLY=()");
        w.line(1, r#"for candidate in "${candidates[@]}"; do"#);
        w.line(2, r#"for item in "${exclusive[@]}"; do"#);
        w.line(3, r#"if [[ "$item" == "$candidate" ]]; then"#);
        w.line(4, r#"for item in "${used[@]}"; do"#);
        w.line(5, r#"[[ "$item" == "$candidate" ]] && continue 3"#);
        w.line(4, "done");
        w.line(4, "break");
        w.line(3, "fi");
        w.line(2, "done");
        w.blank();
        w.line(2, r#"if [[ -n "$quoted" ]]; then"#);
        w.line(3, r#"[[ "$candidate" == "$bare"* ]] && COMPREPLY+=("$candidate")"#);
        w.line(2, "else");
        w.line(3, r#"printf -v escaped '%q' "$candidate""#);
        w.line(
            3,
            r#"[[ "$candidate" == "$cur"* || "$escaped" == "$cur"* ]] && COMPREPLY+=("$escaped")"#,
        );
        w.line(2, "fi");
        w.line(1, "done");
    }
}

/// `case` pattern matching every typed spelling of `text`
fn patterns(text: &str) -> String {
    word::typed_spellings(text)
        .iter()
        .map(|spelling| match spelling.as_str() {
            // an unquoted `esac` would close the enclosing case
            "esac" => "'esac'".to_string(),
            _ => word::quote(spelling),
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Space-separated quoted words for an array assignment
fn words<S: AsRef<str>>(list: &[S]) -> String {
    list.iter()
        .map(|w| word::quote(w.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use tabsmith_core::Resolver;

    fn tree(root: CompletionNode) -> CompletionTree {
        CompletionTree::new("prog", root)
    }

    fn generate_tree() -> CompletionTree {
        tree(
            CompletionNode::root()
                .with_child(CompletionNode::new("new"))
                .with_child(CompletionNode::new("preview"))
                .with_child(
                    CompletionNode::new("generate")
                        .with_child(CompletionNode::new("all"))
                        .with_flag(FlagSpec::with_value(["-f", "--function"], ["func_a", "func_b"]))
                        .with_flag(FlagSpec::with_value(["-o"], Vec::<String>::new()))
                        .with_flag(FlagSpec::switch(["--force"]).single_use()),
                )
                .with_child(CompletionNode::new("my command"))
                .with_flag(FlagSpec::switch(["-h", "--help"])),
        )
    }

    /// Run the generated function in bash and return COMPREPLY
    fn complete_in_bash(script: &CompiledScript, line: &[&str]) -> Option<Vec<String>> {
        let bash = which::which("bash").ok()?;
        let words = line.iter().map(|w| word::quote(w)).collect::<Vec<_>>().join(" ");
        let program = format!(
            "{}\nCOMP_WORDS=({})\nCOMP_CWORD={}\n{}\nprintf '%s\\n' \"${{COMPREPLY[@]}}\"\n",
            script.text,
            words,
            line.len() - 1,
            script.function_name
        );

        let output = Command::new(bash).arg("-c").arg(program).output().ok()?;
        assert!(
            output.status.success(),
            "bash failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        Some(
            String::from_utf8_lossy(&output.stdout)
                .lines()
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    #[test]
    fn test_emit_registers_function() {
        let script = BashEmitter::new().emit(&generate_tree()).unwrap();
        assert_eq!(script.function_name, "_prog_completions");
        assert_eq!(script.shell, Shell::Bash);
        assert!(script.text.contains("_prog_completions() {"));
        assert!(script.text.ends_with("complete -F _prog_completions prog\n"));
    }

    #[test]
    fn test_emit_is_deterministic() {
        let emitter = BashEmitter::new();
        let first = emitter.emit(&generate_tree()).unwrap();
        let second = emitter.emit(&generate_tree()).unwrap();
        assert_eq!(first.text, second.text);
    }

    #[test]
    fn test_emit_quotes_special_words() {
        let script = BashEmitter::new().emit(&generate_tree()).unwrap();
        assert!(script
            .text
            .contains(r#"'my command'|'my\ command'|'"my command"'|''\''my command'\''') used+=('my command'); node=5;"#));
        assert!(script
            .text
            .contains("0) candidates=(new preview generate 'my command' -h --help); exclusive=(new preview generate 'my command') ;;"));
    }

    #[test]
    fn test_emit_value_flags() {
        let script = BashEmitter::new().emit(&generate_tree()).unwrap();
        assert!(script
            .text
            .contains("-f) used+=(-f); (( index + 1 == count )) && flag=0; index=$((index + 2)); continue ;;"));
        assert!(script.text.contains("0) candidates=(func_a func_b) ;;"));
        assert!(script.text.contains("-f|--function) flag=0 ;;"));
        assert!(script.text.contains("-o) flag=1 ;;"));
        // free-text flag has no candidates arm
        assert!(!script.text.contains("1) candidates=() ;;"));
    }

    #[test]
    fn test_numbering_follows_preorder() {
        let tree = generate_tree();
        let layout = Layout::new(&tree.root);
        let preorder = tree.root.preorder();
        assert_eq!(layout.nodes.len(), preorder.len());
        for (numbered, node) in layout.nodes.iter().zip(preorder) {
            assert!(std::ptr::eq(numbered.node, node));
        }
        assert_eq!(layout.nodes[0].children, vec![1, 2, 3, 5]);
        assert_eq!(layout.value_flags.len(), 2);
    }

    #[test]
    fn test_patterns_cover_typed_spellings() {
        assert_eq!(patterns("-f"), "-f");
        assert_eq!(patterns("esac"), "'esac'");
        assert_eq!(patterns("a b"), r#"'a b'|'a\ b'|'"a b"'|''\''a b'\'''"#);
    }

    #[test]
    fn test_emit_leaf_root() {
        let script = BashEmitter::new().emit(&tree(CompletionNode::root())).unwrap();
        assert!(!script.text.contains(r#"case "$node" in"#));
        assert!(script.text.contains("complete -F _prog_completions prog"));
    }

    #[test]
    fn test_emit_rejects_invalid_function_name() {
        let tree = tree(CompletionNode::root()).with_function_name("not valid");
        let err = BashEmitter::new().emit(&tree).unwrap_err();
        assert!(matches!(err, TabsmithError::Emission(_)));
    }

    #[test]
    fn test_emit_rejects_nul() {
        let tree = tree(CompletionNode::root().with_child(CompletionNode::new("a\0b")));
        let err = BashEmitter::new().emit(&tree).unwrap_err();
        assert!(err.to_string().contains("cannot be written"));
    }

    #[test]
    fn test_bash_completes_root() {
        let script = BashEmitter::new().emit(&generate_tree()).unwrap();
        let Some(reply) = complete_in_bash(&script, &["prog", ""]) else {
            return;
        };
        assert_eq!(
            reply,
            vec!["new", "preview", "generate", r"my\ command", "-h", "--help"]
        );
    }

    #[test]
    fn test_bash_matches_resolver() {
        let tree = generate_tree();
        let script = BashEmitter::new().emit(&tree).unwrap();
        let resolver = Resolver::new(&tree.root);

        let lines: &[&[&str]] = &[
            &["prog", "gen"],
            &["prog", "gen", ""],
            &["prog", "generate", ""],
            &["prog", "generate", "-f", ""],
            &["prog", "generate", "--function", "func_"],
            &["prog", "generate", "-o", ""],
            &["prog", "generate", "-f", "all", ""],
            &["prog", "generate", "--force", "-"],
            &["prog", "generate", "typo", "-f", ""],
            &["prog", "-h", "-h", "ne"],
            &["prog", "new", ""],
            &["prog", "generate", "all", ""],
        ];

        for line in lines {
            let Some(reply) = complete_in_bash(&script, line) else {
                return;
            };
            let prior = &line[1..line.len() - 1];
            let prefix = line[line.len() - 1];
            assert_eq!(reply, resolver.resolve(prior, prefix), "line {:?}", line);
        }
    }

    #[test]
    fn test_bash_escapes_replies() {
        let script = BashEmitter::new().emit(&generate_tree()).unwrap();
        let Some(reply) = complete_in_bash(&script, &["prog", "my"]) else {
            return;
        };
        assert_eq!(reply, vec![r"my\ command"]);

        let reply = complete_in_bash(&script, &["prog", r"my\ c"]).unwrap_or_default();
        assert_eq!(reply, vec![r"my\ command"]);

        let reply = complete_in_bash(&script, &["prog", "\"my"]).unwrap_or_default();
        assert_eq!(reply, vec!["my command"]);
    }

    #[test]
    fn test_bash_walks_quoted_literal() {
        let tree = tree(
            CompletionNode::root().with_child(
                CompletionNode::new("my command").with_flag(FlagSpec::switch(["--deep"])),
            ),
        );
        let script = BashEmitter::new().emit(&tree).unwrap();

        for typed in ["my command", r"my\ command", "\"my command\"", "'my command'"] {
            let Some(reply) = complete_in_bash(&script, &["prog", typed, ""]) else {
                return;
            };
            assert_eq!(reply, vec!["--deep"], "typed {}", typed);
        }

        let tree = self::tree(
            CompletionNode::root()
                .with_child(CompletionNode::new("a,b").with_flag(FlagSpec::switch(["--deep"])))
                .with_child(CompletionNode::new("café menu").with_flag(FlagSpec::switch(["--deep"]))),
        );
        let script = BashEmitter::new().emit(&tree).unwrap();

        for typed in ["a,b", r"a\,b", "'a,b'", r"café\ menu", r"caf\é\ menu", "\"café menu\""] {
            let reply = complete_in_bash(&script, &["prog", typed, ""]).unwrap_or_default();
            assert_eq!(reply, vec!["--deep"], "typed {}", typed);
        }
    }

    #[test]
    fn test_bash_walks_inserted_replies() {
        for literal in ["a,b", "café menu", "my command", "#tag", "it's"] {
            let tree = tree(
                CompletionNode::root()
                    .with_child(CompletionNode::new(literal).with_flag(FlagSpec::switch(["--deep"]))),
            );
            let script = BashEmitter::new().emit(&tree).unwrap();

            let Some(reply) = complete_in_bash(&script, &["prog", ""]) else {
                return;
            };
            assert_eq!(reply.len(), 1, "literal {}", literal);
            assert_eq!(reply[0], word::percent_q_escape(literal));

            // the inserted text is what COMP_WORDS holds on the next completion
            let reply = complete_in_bash(&script, &["prog", reply[0].as_str(), ""]).unwrap_or_default();
            assert_eq!(reply, vec!["--deep"], "literal {}", literal);
        }
    }
}
