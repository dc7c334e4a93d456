//! Completion script installer
//!
//! Copies a generated script into the first bash-completion directory that
//! exists on this machine, or removes it from all of them.

use std::path::{Component, Path, PathBuf};
use std::process::Command;
use tabsmith_core::TabsmithError;
use tabsmith_types::word;
use tracing::{debug, info};

/// System-wide completion directories, searched after the user's own
const SYSTEM_DIRECTORIES: [&str; 2] = [
    "/usr/share/bash-completion/completions",
    "/usr/local/etc/bash_completion.d",
];

/// Installs and removes completion scripts for one program
#[derive(Debug, Clone)]
pub struct Installer {
    program: String,
    script_path: PathBuf,
    home: Option<PathBuf>,
    target_directories: Vec<PathBuf>,
    root_user: bool,
}

impl Installer {
    /// Create an installer for `program` using the standard directories
    pub fn new(program: impl Into<String>, script_path: impl Into<PathBuf>) -> Self {
        let home = dirs::home_dir();
        let target_directories = default_target_directories(home.as_deref());

        Self {
            program: program.into(),
            script_path: script_path.into(),
            home,
            target_directories,
            root_user: is_root_user(),
        }
    }

    /// Replace the searched directories
    pub fn with_target_directories(mut self, directories: Vec<PathBuf>) -> Self {
        self.target_directories = directories;
        self
    }

    /// Replace the home directory; directories below it never need sudo
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Override root detection
    pub fn with_root_user(mut self, root_user: bool) -> Self {
        self.root_user = root_user;
        self
    }

    /// Directories searched for an install target, in priority order
    pub fn target_directories(&self) -> &[PathBuf] {
        &self.target_directories
    }

    /// First target directory that exists
    pub fn completions_dir(&self) -> Option<&Path> {
        self.target_directories
            .iter()
            .map(PathBuf::as_path)
            .find(|dir| dir.is_dir())
    }

    /// Where the script will be installed
    pub fn target_path(&self) -> Option<PathBuf> {
        self.check_program().ok()?;
        self.completions_dir().map(|dir| dir.join(&self.program))
    }

    /// The program must name a single file inside a completions directory
    fn check_program(&self) -> Result<(), TabsmithError> {
        let mut components = Path::new(&self.program).components();
        let single_file = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );

        if single_file && !self.program.contains(['/', '\\']) {
            Ok(())
        } else {
            Err(TabsmithError::Install(format!(
                "Invalid program name '{}': expected a plain file name",
                self.program
            )))
        }
    }

    /// Copy command for the install target
    pub fn install_command(&self) -> Result<Vec<String>, TabsmithError> {
        self.check_program()?;
        let dir = self.completions_dir().ok_or_else(|| {
            TabsmithError::Install("Cannot determine a bash completions directory".to_string())
        })?;
        let target = dir.join(&self.program);

        let mut command = self.privilege_prefix(Some(dir));
        command.push("cp".to_string());
        command.push(self.script_path.display().to_string());
        command.push(target.display().to_string());
        Ok(command)
    }

    /// Remove command covering every candidate target
    pub fn uninstall_command(&self) -> Result<Vec<String>, TabsmithError> {
        self.check_program()?;
        let mut command = self.privilege_prefix(None);
        command.push("rm".to_string());
        command.push("-f".to_string());
        command.extend(
            self.target_directories
                .iter()
                .map(|dir| dir.join(&self.program).display().to_string()),
        );
        Ok(command)
    }

    /// Install the script; refuses to replace an existing one unless `force`
    pub fn install(&self, force: bool) -> Result<(), TabsmithError> {
        self.check_program()?;
        let target = self.target_path().ok_or_else(|| {
            TabsmithError::Install("Cannot determine a bash completions directory".to_string())
        })?;

        if !self.script_path.is_file() {
            return Err(TabsmithError::Install(format!(
                "Cannot find script: {}",
                self.script_path.display()
            )));
        }

        if target.exists() && !force {
            return Err(TabsmithError::Install(format!(
                "File exists: {} (use --force to replace it)",
                target.display()
            )));
        }

        run(&self.install_command()?)?;
        info!("Installed: {}", target.display());
        Ok(())
    }

    /// Remove the script from every candidate directory
    pub fn uninstall(&self) -> Result<(), TabsmithError> {
        run(&self.uninstall_command()?)?;
        info!("Removed completions for {}", self.program);
        Ok(())
    }

    /// `sudo` unless running as root or writing under the home directory.
    /// Without a directory the command may touch any candidate.
    fn privilege_prefix(&self, dir: Option<&Path>) -> Vec<String> {
        let in_home = match (dir, &self.home) {
            (Some(dir), Some(home)) => dir.starts_with(home),
            _ => false,
        };

        if self.root_user || in_home {
            Vec::new()
        } else {
            vec!["sudo".to_string()]
        }
    }
}

/// Render a command the way it would be typed at the prompt
pub fn command_string(command: &[String]) -> String {
    command
        .iter()
        .map(|arg| word::quote(arg))
        .collect::<Vec<_>>()
        .join(" ")
}

fn default_target_directories(home: Option<&Path>) -> Vec<PathBuf> {
    let mut directories = Vec::new();
    if let Some(home) = home {
        directories.push(home.join(".local/share/bash-completion/completions"));
        directories.push(home.join(".bash_completion.d"));
    }
    directories.extend(SYSTEM_DIRECTORIES.iter().map(PathBuf::from));
    directories
}

fn run(command: &[String]) -> Result<(), TabsmithError> {
    let Some((program, args)) = command.split_first() else {
        return Err(TabsmithError::Install("Empty command".to_string()));
    };

    debug!("Running: {}", command_string(command));
    let status = Command::new(program).args(args).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(TabsmithError::Install(format!(
            "Command failed ({}): {}",
            status,
            command_string(command)
        )))
    }
}

#[cfg(unix)]
fn is_root_user() -> bool {
    nix::unistd::Uid::effective().is_root()
}

#[cfg(not(unix))]
fn is_root_user() -> bool {
    false
}
