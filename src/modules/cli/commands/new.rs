//! New command implementation

use clap::Args;
use std::fs;
use std::path::PathBuf;
use tabsmith_core::TabsmithError;
use tracing::info;

/// Sample document written by `tabsmith new`
pub(crate) const SAMPLE_DOCUMENT: &str = r#"# Tabsmith completion document
#
# The top-level key is the program being completed. Under it:
#   values: words offered at this position
#   flags:  flag spellings (separated by spaces or commas) mapped to
#           true (no value), a list of value candidates, [] (free text),
#           or { value, candidates, repeat }
#   <word>: what may follow one of the values

mygit:
  values: [init, status, commit, push]
  flags:
    -h --help: true
    --version: true
  commit:
    flags:
      -m --message: []
      -a --all: true
      --cleanup: [strip, whitespace, verbatim]
  push:
    values: [origin]
    flags:
      --force: { repeat: false }
"#;

/// New command arguments
#[derive(Args, Debug)]
pub struct NewCommand {
    /// Path of the document to create
    #[arg(env = "TABSMITH_CONFIG_PATH", default_value = "tabsmith.yaml")]
    pub config_path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl NewCommand {
    /// Execute the new command
    pub fn execute(&self) -> Result<(), TabsmithError> {
        if self.config_path.exists() && !self.force {
            return Err(TabsmithError::Config(format!(
                "File exists: {} (use --force to overwrite)",
                self.config_path.display()
            )));
        }

        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&self.config_path, SAMPLE_DOCUMENT)?;
        info!("Created: {}", self.config_path.display());

        println!("\nNext steps:");
        println!("  1. Edit {} to describe your program", self.config_path.display());
        println!("  2. Run: tabsmith preview {}", self.config_path.display());
        println!("  3. Run: tabsmith generate {}", self.config_path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabsmith_core::CompileOptions;

    #[test]
    fn test_sample_document_compiles() {
        let script = tabsmith_emitter::compile_with(SAMPLE_DOCUMENT, &CompileOptions::default()).unwrap();
        assert_eq!(script.program, "mygit");
        assert!(script.text.contains("candidates=(strip whitespace verbatim)"));
    }

    #[test]
    fn test_new_writes_sample() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("nested").join("tabsmith.yaml");
        let cmd = NewCommand {
            config_path: path.clone(),
            force: false,
        };

        cmd.execute().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE_DOCUMENT);

        let err = cmd.execute().unwrap_err();
        assert!(err.to_string().contains("File exists"));
    }

    #[test]
    fn test_new_force_overwrites() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("tabsmith.yaml");
        fs::write(&path, "old").unwrap();

        let cmd = NewCommand {
            config_path: path.clone(),
            force: true,
        };
        cmd.execute().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE_DOCUMENT);
    }
}
