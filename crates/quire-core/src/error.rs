//! Error types for Quire.
//!
//! Loading, parsing, and validating a document can each fail. Loader and
//! parser failures stop at the first problem; validation collects every
//! violated invariant into a single [`ValidationError`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Result type alias for Quire operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, parsing, or validating content.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The content root (or a requested file) does not exist.
    #[error("Not found: {}", .path.display())]
    NotFound {
        /// Path that could not be found
        path: PathBuf,
    },

    /// The metadata block is structurally broken (missing or unbalanced
    /// fences, undecodable block, non-mapping top level).
    #[error("Malformed metadata: {message}")]
    MalformedMetadata {
        /// What is wrong with the block
        message: String,
    },

    /// A metadata field is present but cannot be coerced to its expected type.
    #[error("Type mismatch for `{field}`: expected {expected}, found {found}")]
    TypeMismatch {
        /// Field name, with an index for nested fields (`resources[1].src`)
        field: String,
        /// Expected shape
        expected: &'static str,
        /// Shape or value actually found
        found: String,
    },

    /// One or more semantic invariants were violated.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// I/O error while reading content.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Path being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },
}

impl Error {
    /// Creates a not-found error for a path.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Error::NotFound { path: path.into() }
    }

    /// Creates a malformed-metadata error.
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Error::MalformedMetadata {
            message: message.into(),
        }
    }

    /// Creates a type-mismatch error.
    pub fn type_mismatch<F, S>(field: F, expected: &'static str, found: S) -> Self
    where
        F: Into<String>,
        S: Into<String>,
    {
        Error::TypeMismatch {
            field: field.into(),
            expected,
            found: found.into(),
        }
    }

    /// Wraps an I/O error with the path that was being accessed.
    pub fn io_with_path(source: std::io::Error, path: &Path) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Short kebab-case name of the error kind, for reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "not-found",
            Error::MalformedMetadata { .. } => "malformed-metadata",
            Error::TypeMismatch { .. } => "type-mismatch",
            Error::Validation(_) => "validation",
            Error::Io { .. } => "io",
            Error::Config { .. } => "config",
        }
    }

    /// Returns whether this error belongs to a single document.
    ///
    /// Document errors are reported per file and never abort a batch.
    /// `NotFound` and `Config` errors concern the batch as a whole.
    pub fn is_document_error(&self) -> bool {
        match self {
            Error::MalformedMetadata { .. }
            | Error::TypeMismatch { .. }
            | Error::Validation(_)
            | Error::Io { .. } => true,
            Error::NotFound { .. } | Error::Config { .. } => false,
        }
    }

    /// Returns the validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(v) => Some(v),
            _ => None,
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

/// A single violated document invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
#[non_exhaustive]
pub enum Violation {
    /// No `title` in the metadata block.
    MissingTitle,
    /// `title` is present but blank.
    EmptyTitle,
    /// No `date` in the metadata block.
    MissingDate,
    /// Two or more resources share a name.
    DuplicateResourceName {
        /// The shared name
        name: String,
    },
    /// A resource has a blank `name`.
    EmptyResourceName {
        /// Position in `resources`
        index: usize,
    },
    /// A resource has a blank `src`.
    EmptyResourceSrc {
        /// Position in `resources`
        index: usize,
    },
    /// A resource `src` is absolute or escapes the document directory.
    NonRelativeResourceSrc {
        /// Resource name
        name: String,
        /// Offending source path
        src: String,
    },
    /// A resource `src` does not exist next to the document.
    MissingResourceFile {
        /// Resource name
        name: String,
        /// Missing source path
        src: String,
    },
    /// A tag is empty after trimming.
    BlankTag,
    /// Two documents in one collection share a path.
    DuplicatePath {
        /// The shared path identifier
        path: String,
    },
}

impl Violation {
    /// The document field this violation concerns.
    pub fn field(&self) -> &'static str {
        match self {
            Violation::MissingTitle | Violation::EmptyTitle => "title",
            Violation::MissingDate => "date",
            Violation::DuplicateResourceName { .. }
            | Violation::EmptyResourceName { .. }
            | Violation::EmptyResourceSrc { .. }
            | Violation::NonRelativeResourceSrc { .. }
            | Violation::MissingResourceFile { .. } => "resources",
            Violation::BlankTag => "tags",
            Violation::DuplicatePath { .. } => "path",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.field())?;
        match self {
            Violation::MissingTitle => write!(f, "missing"),
            Violation::EmptyTitle => write!(f, "must not be empty"),
            Violation::MissingDate => write!(f, "missing"),
            Violation::DuplicateResourceName { name } => {
                write!(f, "duplicate resource name `{name}`")
            }
            Violation::EmptyResourceName { index } => {
                write!(f, "resources[{index}].name must not be empty")
            }
            Violation::EmptyResourceSrc { index } => {
                write!(f, "resources[{index}].src must not be empty")
            }
            Violation::NonRelativeResourceSrc { name, src } => {
                write!(f, "resource `{name}` src `{src}` must be a relative path inside the document directory")
            }
            Violation::MissingResourceFile { name, src } => {
                write!(f, "resource `{name}` src `{src}` does not exist")
            }
            Violation::BlankTag => write!(f, "tags must not be blank"),
            Violation::DuplicatePath { path } => write!(f, "duplicate document path `{path}`"),
        }
    }
}

/// Every invariant a document violates, collected in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    /// Builds an error from a non-empty violation list.
    ///
    /// Returns `None` when there is nothing to report.
    pub fn from_violations(violations: Vec<Violation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self { violations })
        }
    }

    /// The violations, in the order they were found.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Whether any violation concerns `field`.
    pub fn mentions(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field() == field)
    }

    /// Appends violations found by a later check.
    pub fn extend(&mut self, more: impl IntoIterator<Item = Violation>) {
        self.violations.extend(more);
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.violations.len();
        write!(
            f,
            "Validation failed ({n} violation{})",
            if n == 1 { "" } else { "s" }
        )?;
        for v in &self.violations {
            write!(f, "\n  - {v}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<Vec<Violation>> for ValidationError {
    fn from(violations: Vec<Violation>) -> Self {
        Self { violations }
    }
}
