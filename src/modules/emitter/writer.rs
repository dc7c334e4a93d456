//! Indented line writer for generated scripts

/// Two spaces per indentation level, matching bash-completion's own scripts
const INDENT: &str = "  ";

/// Accumulates script text line by line
#[derive(Debug, Default)]
pub(crate) struct ScriptWriter {
    out: String,
}

impl ScriptWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Write one line at the given indentation depth
    pub(crate) fn line(&mut self, depth: usize, text: impl AsRef<str>) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    /// Write an empty line
    pub(crate) fn blank(&mut self) {
        self.out.push('\n');
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}
