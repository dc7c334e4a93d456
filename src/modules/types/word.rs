//! Shell word quoting
//!
//! Literals, flag tokens and value candidates end up inside the generated
//! script as `case` patterns and array elements. Everything that is not a
//! plain word is wrapped in single quotes, which bash never interprets.

/// Returns true for characters that can appear unquoted in a bash word
fn is_plain(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ':' | '=' | ',' | '@' | '%' | '+')
}

/// Returns true if the word must be quoted to survive shell tokenization
pub fn needs_quoting(word: &str) -> bool {
    word.is_empty() || !word.chars().all(is_plain)
}

/// Returns true if the word can be written as a single-quoted bash word.
///
/// Single quotes can hold every byte except NUL.
pub fn is_representable(word: &str) -> bool {
    !word.contains('\0')
}

/// Returns true if the word contains a character from bash's default
/// `COMP_WORDBREAKS` that is left unquoted on the command line, so readline
/// splits the word across several `COMP_WORDS` entries.
pub fn has_word_breaks(word: &str) -> bool {
    word.contains([':', '='])
}

/// Returns true if the word contains control characters (newlines, tabs, ...)
pub fn has_control_chars(word: &str) -> bool {
    word.chars().any(char::is_control)
}

/// Quote a word so that bash reads it back as exactly `word`.
///
/// Plain words are returned unchanged; anything else is single-quoted with
/// embedded single quotes written as `'\''`.
pub fn quote(word: &str) -> String {
    if !needs_quoting(word) {
        return word.to_string();
    }

    format!("'{}'", word.replace('\'', r"'\''"))
}

/// Escape every non-plain character with a backslash, the way a user types
/// a word at the prompt without surrounding quotes.
pub fn backslash_escape(word: &str) -> String {
    let mut escaped = String::with_capacity(word.len() * 2);
    for c in word.chars() {
        if !is_plain(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Characters bash's `printf %q` escapes with a backslash anywhere in a word
fn is_percent_q_special(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t'
            | '\n'
            | '!'
            | '"'
            | '$'
            | '&'
            | '\''
            | '('
            | ')'
            | '*'
            | ','
            | ';'
            | '<'
            | '>'
            | '?'
            | '['
            | '\\'
            | ']'
            | '^'
            | '`'
            | '{'
            | '|'
            | '}'
    )
}

/// Escape a word the way bash's `printf %q` does, which is the text the
/// generated script inserts on the command line.
///
/// Non-ASCII characters stay bare; `#` is escaped only at the start and `~`
/// at the start or after `:` or `=`.
pub fn percent_q_escape(word: &str) -> String {
    let mut escaped = String::with_capacity(word.len() * 2);
    let mut previous = None;
    for (index, c) in word.chars().enumerate() {
        let special = is_percent_q_special(c)
            || (c == '#' && index == 0)
            || (c == '~' && matches!(previous, None | Some(':') | Some('=')));
        if special {
            escaped.push('\\');
        }
        escaped.push(c);
        previous = Some(c);
    }
    escaped
}

/// The spellings of `word` a user may have typed, as they appear in
/// `COMP_WORDS` (which keeps the original quoting).
///
/// Words that neither need quoting nor change under `printf %q` have a
/// single spelling. Others may also appear as inserted by a completion,
/// backslash-escaped, double-quoted or single-quoted.
pub fn typed_spellings(word: &str) -> Vec<String> {
    let mut spellings = vec![word.to_string()];
    let inserted = percent_q_escape(word);
    if !needs_quoting(word) && inserted == word {
        return spellings;
    }

    let mut push = |spelling: String| {
        if !spellings.contains(&spelling) {
            spellings.push(spelling);
        }
    };

    push(inserted);
    push(backslash_escape(word));

    if !word.contains(['"', '$', '`', '\\', '!']) {
        push(format!("\"{}\"", word));
    }

    if !word.contains('\'') {
        push(format!("'{}'", word));
    }

    spellings
}
