//! Quire CLI
//!
//! Command-line interface for loading and validating front-matter content.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use quire_cli::commands;
use quire_cli::{Cli, Command, ConfigAction, QuireConfig, logging};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // `config init` must still work when the existing file is broken.
    let loaded = QuireConfig::load_with_source(cli.config.as_deref());
    let (mut config, source) = match (&cli.command, loaded) {
        (
            Command::Config {
                action: ConfigAction::Init { .. },
            },
            Err(_),
        ) => (QuireConfig::default(), None),
        (_, loaded) => loaded.context("Failed to load configuration")?,
    };
    logging::init(&config.log.level, cli.verbose);

    match &source {
        Some(path) => tracing::debug!(path = %path.display(), "Loaded configuration"),
        None => tracing::debug!("No configuration file found; using defaults"),
    }

    match cli.command {
        Command::Check { root, content } => {
            content.apply(root, &mut config);
            let outcome = commands::cmd_check(&config)?;
            print!("{}", outcome.report);
            if !outcome.clean {
                tracing::error!("Content check failed");
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::List {
            root,
            json,
            content,
        } => {
            content.apply(root, &mut config);
            print!("{}", commands::cmd_list(&config, json)?);
        }
        Command::Show {
            file,
            outline,
            verify_resources,
        } => {
            let mut options = config.pipeline_options();
            options.verify_resources |= verify_resources;
            print!("{}", commands::cmd_show(&file, outline, &options)?);
        }
        Command::Config { action } => match action {
            ConfigAction::Path => print!("{}", commands::cmd_config_path(cli.config.as_deref())),
            ConfigAction::Show => print!("{}", commands::cmd_config_show(&config)?),
            ConfigAction::Init { file, force } => {
                let path = commands::cmd_config_init(file.as_deref(), force)?;
                println!("Config file created at {}", path.display());
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}
