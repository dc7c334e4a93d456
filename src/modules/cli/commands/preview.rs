//! Preview command implementation

use clap::Args;
use tabsmith_core::TabsmithError;

use super::CompileArgs;

/// Preview command arguments
#[derive(Args, Debug)]
pub struct PreviewCommand {
    #[command(flatten)]
    pub compile: CompileArgs,

    /// Print the validated completion tree as JSON instead of the script
    #[arg(long)]
    pub tree: bool,
}

impl PreviewCommand {
    /// Execute the preview command
    pub fn execute(&self) -> Result<(), TabsmithError> {
        print!("{}", self.render()?);
        Ok(())
    }

    fn render(&self) -> Result<String, TabsmithError> {
        if self.tree {
            let tree = self.compile.tree()?;
            Ok(format!("{}\n", serde_json::to_string_pretty(&tree)?))
        } else {
            Ok(self.compile.compile()?.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn command(file: &tempfile::NamedTempFile, tree: bool) -> PreviewCommand {
        PreviewCommand {
            compile: CompileArgs {
                config_path: file.path().to_path_buf(),
                function_name: None,
                single_use_flags: false,
            },
            tree,
        }
    }

    #[test]
    fn test_preview_script() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "prog: [a, b]").unwrap();

        let text = command(&file, false).render().unwrap();
        assert!(text.starts_with("# prog completion"));
        assert!(text.contains("complete -F _prog_completions prog"));
    }

    #[test]
    fn test_preview_tree() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "prog: [a, b]").unwrap();

        let text = command(&file, true).render().unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["program"], "prog");
        assert_eq!(json["function_name"], "_prog_completions");
        assert_eq!(json["root"]["children"][1]["literal"], "b");
    }
}
