//! Quire Core: shared types, errors, and utilities.
//!
//! This crate provides the foundational types used across all Quire crates.
//! It has no internal Quire dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types, `Result` alias, and collected validation failures
//! - [`util`]: Content file discovery and ID utilities

#![doc = include_str!("../README.md")]

pub mod error;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result, ValidationError, Violation};

// Convenience re-exports from util
pub use util::files::{ContentFiles, DEFAULT_EXTENSIONS, find_content_files};
pub use util::ids::{id_from_path, path_id, slugify};
