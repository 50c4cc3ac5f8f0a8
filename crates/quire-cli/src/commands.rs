//! Command handlers.
//!
//! Each handler returns the text to print so the binary stays a thin
//! dispatcher and the output can be tested directly.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use quire_content::{
    Batch, Document, Heading, Pipeline, PipelineOptions, SourceFile, process_source,
};
use serde::Serialize;

use crate::config::{CONFIG_FILE_NAME, QuireConfig};

/// Output of `quire check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Text to print.
    pub report: String,
    /// Whether every document was valid.
    pub clean: bool,
}

/// Run the pipeline over the configured root and describe every failure.
pub fn cmd_check(config: &QuireConfig) -> Result<CheckOutcome> {
    let batch = run_pipeline(config)?;
    Ok(CheckOutcome {
        report: check_report(&batch),
        clean: batch.is_clean(),
    })
}

/// One line per failing document, then a summary.
pub fn check_report(batch: &Batch) -> String {
    let mut out: String = batch
        .failures()
        .map(|(path, err)| format!("FAIL {path} [{}]: {err}\n", err.kind()))
        .collect();
    out.push_str(&format!(
        "{} document(s) checked: {} valid, {} failed\n",
        batch.len(),
        batch.len() - batch.failure_count(),
        batch.failure_count()
    ));
    out
}

/// A validated document as listed by `quire list --json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry<'a> {
    pub path: &'a str,
    pub date: NaiveDate,
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub tags: Vec<&'a str>,
    pub hidden: bool,
}

impl<'a> From<&'a Document> for ListEntry<'a> {
    fn from(doc: &'a Document) -> Self {
        Self {
            path: doc.path(),
            date: doc.date(),
            title: doc.title(),
            slug: doc.slug(),
            tags: doc.tags().iter().map(String::as_str).collect(),
            hidden: doc.hidden(),
        }
    }
}

/// List the valid documents under the configured root.
pub fn cmd_list(config: &QuireConfig, json: bool) -> Result<String> {
    let batch = run_pipeline(config)?;
    let entries: Vec<ListEntry<'_>> = batch.documents().map(ListEntry::from).collect();

    if json {
        let mut text =
            serde_json::to_string_pretty(&entries).context("Failed to serialize document list")?;
        text.push('\n');
        return Ok(text);
    }

    Ok(entries
        .iter()
        .map(|entry| format!("{}  {}  {}\n", entry.date, entry.path, entry.title))
        .collect())
}

#[derive(Serialize)]
struct ShowOutput<'a> {
    #[serde(flatten)]
    document: &'a Document,
    #[serde(skip_serializing_if = "Option::is_none")]
    outline: Option<Vec<Heading>>,
}

/// Parse and validate one file, rendering it as JSON.
pub fn cmd_show(file: &Path, outline: bool, options: &PipelineOptions) -> Result<String> {
    let source = SourceFile::read(file)?;
    let document = process_source(&source, options)
        .with_context(|| format!("{} is not a valid document", file.display()))?;

    let output = ShowOutput {
        document: &document,
        outline: outline.then(|| document.outline()),
    };
    let mut text = serde_json::to_string_pretty(&output).context("Failed to serialize document")?;
    text.push('\n');
    Ok(text)
}

/// Describe which configuration file is in use.
pub fn cmd_config_path(explicit: Option<&Path>) -> String {
    match QuireConfig::resolve_path(explicit) {
        Some(path) if path.is_file() => format!("{}\n", path.display()),
        Some(path) => format!("{} (does not exist)\n", path.display()),
        None => format!(
            "No configuration file found; using defaults (run `quire config init` to create {CONFIG_FILE_NAME})\n"
        ),
    }
}

/// Render the resolved configuration as TOML.
pub fn cmd_config_show(config: &QuireConfig) -> Result<String> {
    Ok(config.to_toml_string()?)
}

/// Write the default configuration, returning where it went.
pub fn cmd_config_init(file: Option<&Path>, force: bool) -> Result<PathBuf> {
    let path = file.map_or_else(|| PathBuf::from(CONFIG_FILE_NAME), Path::to_path_buf);

    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let text = QuireConfig::default().to_toml_string()?;
    fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

fn run_pipeline(config: &QuireConfig) -> Result<Batch> {
    let loader = config.loader().with_context(|| {
        format!(
            "Cannot read content root {}",
            config.content.root.display()
        )
    })?;
    tracing::debug!(
        root = %loader.root().display(),
        extensions = ?loader.extensions(),
        "Running content pipeline"
    );
    Ok(Pipeline::new(loader)
        .with_options(config.pipeline_options())
        .run())
}

// ============================================================================
// Tests
// ============================================================================
