//! Batch processing: Loader → Parser → Validator.
//!
//! Each source file is processed on its own. Load and parse failures stop
//! that one document; validation collects every violation; nothing stops
//! the batch. The result is a [`Batch`] with one [`DocumentReport`] per
//! file, in walk order.
//!
//! # Example
//!
//! ```no_run
//! use quire_content::loader::DocumentLoader;
//! use quire_content::pipeline::Pipeline;
//!
//! let batch = Pipeline::new(DocumentLoader::new("content")?).run();
//! for (path, err) in batch.failures() {
//!     eprintln!("{path}: {err}");
//! }
//! println!("{} valid documents", batch.documents().count());
//! # Ok::<(), quire_content::Error>(())
//! ```

use quire_core::{Error, Result, ValidationError, Violation};

use crate::decode::parse_at;
use crate::document::Document;
use crate::loader::{DocumentLoader, SourceFile};
use crate::validate::{Validator, duplicate_paths, warn_duplicate_slugs};

/// Behaviour switches for a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Require every resource `src` to exist next to its document.
    pub verify_resources: bool,
}

/// Outcome for a single source file.
#[derive(Debug)]
pub struct DocumentReport {
    /// Source identifier.
    pub path: String,
    /// The validated document, or why it was rejected.
    pub outcome: Result<Document>,
}

impl DocumentReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Reports for every file in one run.
#[derive(Debug, Default)]
pub struct Batch {
    reports: Vec<DocumentReport>,
}

impl Batch {
    /// All reports, in walk order.
    pub fn reports(&self) -> &[DocumentReport] {
        &self.reports
    }

    /// Validated documents.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.reports.iter().filter_map(|r| r.outcome.as_ref().ok())
    }

    /// Rejected files and their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.reports
            .iter()
            .filter_map(|r| r.outcome.as_ref().err().map(|e| (r.path.as_str(), e)))
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.reports.iter().filter(|r| !r.is_ok()).count()
    }

    /// True when every file produced a valid document.
    pub fn is_clean(&self) -> bool {
        self.failure_count() == 0
    }

    /// Consume the batch, keeping only the validated documents.
    pub fn into_documents(self) -> Vec<Document> {
        self.reports
            .into_iter()
            .filter_map(|r| r.outcome.ok())
            .collect()
    }
}

/// Runs the full pipeline over a loader's tree.
#[derive(Debug, Clone)]
pub struct Pipeline {
    loader: DocumentLoader,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(loader: DocumentLoader) -> Self {
        Self {
            loader,
            options: PipelineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn loader(&self) -> &DocumentLoader {
        &self.loader
    }

    /// Walk the tree and process every document.
    pub fn run(&self) -> Batch {
        log::debug!("Processing content under {}", self.loader.root().display());
        process(self.loader.sources(), &self.options)
    }
}

/// Process one loaded file: parse, then validate.
pub fn process_source(source: &SourceFile, options: &PipelineOptions) -> Result<Document> {
    let parsed = parse_at(source.path.clone(), &source.text)?;

    let validator = if options.verify_resources {
        Validator::new().with_resource_dir(source.dir())
    } else {
        Validator::new()
    };
    Ok(validator.validate(parsed)?)
}

/// Process any sequence of loaded (or failed-to-load) sources.
///
/// After every file is processed, paths are checked for uniqueness across
/// the batch; a repeated path turns the later report into a validation
/// failure.
pub fn process<I>(sources: I, options: &PipelineOptions) -> Batch
where
    I: IntoIterator<Item = Result<SourceFile>>,
{
    let mut reports: Vec<DocumentReport> = sources
        .into_iter()
        .map(|source| match source {
            Ok(source) => DocumentReport {
                outcome: process_source(&source, options),
                path: source.path,
            },
            Err(e) => DocumentReport {
                path: error_path(&e),
                outcome: Err(e),
            },
        })
        .inspect(|report| {
            if let Err(e) = &report.outcome {
                log::warn!("{}: {e}", report.path);
            }
        })
        .collect();

    reject_duplicate_paths(&mut reports);
    warn_duplicate_slugs(reports.iter().filter_map(|r| r.outcome.as_ref().ok()));

    let batch = Batch { reports };
    log::info!(
        "Processed {} document(s): {} valid, {} failed",
        batch.len(),
        batch.len() - batch.failure_count(),
        batch.failure_count()
    );
    batch
}

fn reject_duplicate_paths(reports: &mut [DocumentReport]) {
    let ok_positions: Vec<usize> = reports
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_ok())
        .map(|(i, _)| i)
        .collect();

    let duplicates = duplicate_paths(ok_positions.iter().map(|&i| reports[i].path.as_str()));
    for (position, path) in duplicates {
        let report = &mut reports[ok_positions[position]];
        report.outcome = Err(Error::Validation(ValidationError::from(vec![
            Violation::DuplicatePath { path },
        ])));
    }
}

fn error_path(err: &Error) -> String {
    match err {
        Error::Io { path, .. } | Error::NotFound { path } => path.display().to_string(),
        _ => String::new(),
    }
}
