//! `quire.toml` configuration.
//!
//! Resolution order for the file:
//!
//! 1. `--config` / `QUIRE_CONFIG`
//! 2. `./quire.toml`
//! 3. `<user config dir>/quire/config.toml`
//!
//! If none exists, built-in defaults are used. Every key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use quire_content::{DocumentLoader, PipelineOptions};
use quire_core::{DEFAULT_EXTENSIONS, Error, Result};
use serde::{Deserialize, Serialize};

/// Project-local configuration file name.
pub const CONFIG_FILE_NAME: &str = "quire.toml";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "QUIRE_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuireConfig {
    pub content: ContentConfig,
    pub log: LogConfig,
}

/// `[content]`: where documents live and how they are checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Content root. Relative paths are taken from the config file's directory.
    pub root: PathBuf,
    /// File extensions treated as documents.
    pub extensions: Vec<String>,
    /// Require resource files to exist next to their documents.
    pub verify_resources: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("content"),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
            verify_resources: false,
        }
    }
}

/// `[log]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default level when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl QuireConfig {
    /// Find the configuration file to read, if any.
    ///
    /// An explicit path is returned as given, whether or not it exists.
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.is_file() {
            return Some(local);
        }

        user_config_path().filter(|path| path.is_file())
    }

    /// Load the resolved configuration, falling back to defaults.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if an explicit file does not exist, [`Error::Config`]
    /// if the file is not valid configuration.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_with_source(explicit).map(|(config, _)| config)
    }

    /// Like [`load`](Self::load), also returning the file that was read.
    ///
    /// Loading runs before the log subscriber exists, so callers report the
    /// source themselves once logging is up.
    pub fn load_with_source(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        match Self::resolve_path(explicit) {
            Some(path) => Ok((Self::from_file(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Read one configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::not_found(path));
        }
        let text = fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let mut config: Self = toml::from_str(&text).map_err(|e| {
            Error::config(format!("Invalid configuration in {}: {e}", path.display()))
        })?;

        if config.content.root.is_relative() {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                config.content.root = dir.join(&config.content.root);
            }
        }

        Ok(config)
    }

    /// Parse configuration text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::config(format!("Invalid configuration: {e}")))
    }

    /// Serialize as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Cannot serialize configuration: {e}")))
    }

    /// A loader for the configured content root and extensions.
    pub fn loader(&self) -> Result<DocumentLoader> {
        let loader = DocumentLoader::new(&self.content.root)?;
        Ok(loader.with_extensions(self.content.extensions.iter().cloned()))
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            verify_resources: self.content.verify_resources,
        }
    }
}

/// `<user config dir>/quire/config.toml`, where the platform has one.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("quire").join("config.toml"))
}
