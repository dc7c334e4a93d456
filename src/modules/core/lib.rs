//! Core domain logic for Tabsmith
//!
//! This crate contains the completion tree model, the in-memory completion
//! resolver and the error types shared by the compiler crates.

pub mod domain;
pub mod error;
pub mod resolver;

pub use domain::*;
pub use error::{Result, TabsmithError};
pub use resolver::Resolver;
