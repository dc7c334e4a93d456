//! Type definitions for Tabsmith
//!
//! This crate contains the small shell-level types shared across the Tabsmith
//! codebase: the target shell, identifier normalization and word quoting.

pub mod identifier;
pub mod shell;
pub mod word;

pub use shell::Shell;
