//! Shell identifier helpers

use once_cell::sync::Lazy;
use regex::Regex;

/// Regex pattern for a valid bash function/variable identifier
static IDENTIFIER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Characters that cannot appear in a derived function name
static INVALID_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());

/// Bash builtins and reserved words a completion function must not shadow
const RESERVED_NAMES: &[&str] = &[
    "alias", "bg", "bind", "break", "builtin", "caller", "case", "cd", "command", "compgen",
    "complete", "compopt", "continue", "coproc", "declare", "dirs", "disown", "do", "done",
    "echo", "elif", "else", "enable", "esac", "eval", "exec", "exit", "export", "false", "fc",
    "fg", "fi", "for", "function", "getopts", "hash", "help", "history", "if", "in", "jobs",
    "kill", "let", "local", "logout", "mapfile", "popd", "printf", "pushd", "pwd", "read",
    "readarray", "readonly", "return", "select", "set", "shift", "shopt", "source", "suspend",
    "test", "then", "time", "times", "trap", "true", "type", "typeset", "ulimit", "umask",
    "unalias", "unset", "until", "wait", "while",
];

/// Returns true if `name` is a syntactically valid bash identifier
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER_PATTERN.is_match(name)
}

/// Returns true if `name` is a bash builtin or reserved word
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Derive the default completion function name for a program,
/// e.g. `my-app` becomes `_my_app_completions`.
pub fn completion_function_name(program: &str) -> String {
    format!("_{}_completions", INVALID_CHARS.replace_all(program, "_"))
}

/// Check that `name` can be used as the name of the completion function
pub fn check_function_name(name: &str) -> Result<(), String> {
    if !is_valid_identifier(name) {
        return Err(format!(
            "'{}' is not a valid function name: use letters, digits and underscores, not starting with a digit",
            name
        ));
    }

    if is_reserved(name) {
        return Err(format!("'{}' is a bash builtin or reserved word", name));
    }

    Ok(())
}
