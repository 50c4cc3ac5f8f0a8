//! # quire-cli
//!
//! The `quire` command: check, list, and inspect front-matter content.
//!
//! - `quire check [ROOT]`: validate every document, exit non-zero on failures
//! - `quire list [ROOT] [--json]`: list valid documents
//! - `quire show FILE [--outline]`: print one document as JSON
//! - `quire config path|show|init`: configuration file operations

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;

pub use cli::{Cli, Command, ConfigAction, ContentArgs};
pub use config::QuireConfig;
