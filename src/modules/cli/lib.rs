//! Tabsmith CLI
//!
//! This crate provides the command-line interface for Tabsmith including:
//! - new: Create a sample completion document
//! - preview: Print the generated script
//! - generate: Write the generated script to a file
//! - test: Show the completions for a command line
//! - install / uninstall: Manage installed completion scripts

pub mod commands;
pub mod installer;

pub use commands::{Cli, Commands};
pub use installer::Installer;
