//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::QuireConfig;

/// Quire: load and validate front-matter content
#[derive(Parser, Debug)]
#[command(name = "quire", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "QUIRE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate every document under the content root
    Check {
        /// Content root (overrides `content.root`)
        root: Option<PathBuf>,

        #[command(flatten)]
        content: ContentArgs,
    },

    /// List valid documents
    List {
        /// Content root (overrides `content.root`)
        root: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        content: ContentArgs,
    },

    /// Parse and validate a single file, printing it as JSON
    Show {
        /// Document to show
        file: PathBuf,

        /// Include the heading outline
        #[arg(long)]
        outline: bool,

        /// Require resource files to exist
        #[arg(long)]
        verify_resources: bool,
    },

    /// Configuration file operations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the configuration file in use
    Path,
    /// Print the resolved configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Where to write (default: ./quire.toml)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Flags shared by commands that walk the content root.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentArgs {
    /// Document extension (repeatable; overrides `content.extensions`)
    #[arg(short, long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Require resource files to exist next to their documents
    #[arg(long)]
    pub verify_resources: bool,
}

impl ContentArgs {
    /// Layer these flags (and an optional root) over file configuration.
    pub fn apply(&self, root: Option<PathBuf>, config: &mut QuireConfig) {
        if let Some(root) = root {
            config.content.root = root;
        }
        if !self.extensions.is_empty() {
            config.content.extensions = self.extensions.clone();
        }
        if self.verify_resources {
            config.content.verify_resources = true;
        }
    }
}
