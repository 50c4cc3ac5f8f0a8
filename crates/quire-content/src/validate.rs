//! Document validation.
//!
//! [`validate`] checks a [`ParsedDocument`] against the document invariants
//! and either produces the immutable [`Document`] or a [`ValidationError`]
//! listing every violation found, not just the first.
//!
//! Checked invariants:
//!
//! - `title` is present and not blank
//! - `date` is present (its shape was checked during decoding)
//! - resource names are non-blank and unique within the document
//! - resource sources are non-blank relative paths that stay inside the
//!   document directory
//! - no tag is blank (duplicates already collapsed while decoding)
//!
//! A [`Validator`] given the document's directory also reports resources
//! whose files are missing. [`validate_collection`] checks the one
//! invariant that spans documents: unique paths.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

use quire_core::{ValidationError, Violation};

use crate::document::{Document, ParsedDocument};

/// Validate a document using only its own content.
///
/// # Example
///
/// ```rust
/// use quire_content::{parse, validate};
///
/// let parsed = parse("---\ndate: 2020-12-04\n---\nBody").unwrap();
/// let err = validate(parsed).unwrap_err();
/// assert!(err.mentions("title"));
/// ```
pub fn validate(parsed: ParsedDocument) -> Result<Document, ValidationError> {
    Validator::new().validate(parsed)
}

/// Configurable document validator.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    resource_dir: Option<PathBuf>,
}

impl Validator {
    /// A validator that checks content invariants only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also require every resource `src` to exist under `dir`.
    pub fn with_resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resource_dir = Some(dir.into());
        self
    }

    /// List every violated invariant, in field order.
    pub fn check(&self, doc: &ParsedDocument) -> Vec<Violation> {
        let mut violations = Vec::new();

        match doc.title.as_deref() {
            None => violations.push(Violation::MissingTitle),
            Some(title) if title.trim().is_empty() => violations.push(Violation::EmptyTitle),
            Some(_) => {}
        }

        if doc.date.is_none() {
            violations.push(Violation::MissingDate);
        }

        violations.extend(self.check_resources(doc));

        if doc.tags.iter().any(|tag| tag.trim().is_empty()) {
            violations.push(Violation::BlankTag);
        }

        violations
    }

    /// Validate, producing the immutable document on success.
    pub fn validate(&self, parsed: ParsedDocument) -> Result<Document, ValidationError> {
        let violations = self.check(&parsed);
        if let (true, Some(title), Some(date)) =
            (violations.is_empty(), parsed.title.clone(), parsed.date)
        {
            return Ok(Document::from_parsed(parsed, title, date));
        }

        let err = ValidationError::from(violations);
        log::debug!("{:?} failed validation: {err}", parsed.path);
        Err(err)
    }

    fn check_resources(&self, doc: &ParsedDocument) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut name_counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut name_order: Vec<&str> = Vec::new();

        for (index, resource) in doc.resources.iter().enumerate() {
            let name = resource.name();
            let src = resource.src();

            if name.trim().is_empty() {
                violations.push(Violation::EmptyResourceName { index });
            } else {
                let count = name_counts.entry(name).or_insert(0);
                if *count == 0 {
                    name_order.push(name);
                }
                *count += 1;
            }

            if src.trim().is_empty() {
                violations.push(Violation::EmptyResourceSrc { index });
                continue;
            }

            if !is_contained_relative(src) {
                violations.push(Violation::NonRelativeResourceSrc {
                    name: name.to_string(),
                    src: src.to_string(),
                });
            } else if let Some(dir) = &self.resource_dir {
                if !dir.join(src).exists() {
                    violations.push(Violation::MissingResourceFile {
                        name: name.to_string(),
                        src: src.to_string(),
                    });
                }
            }
        }

        violations.extend(
            name_order
                .into_iter()
                .filter(|name| name_counts.get(name).copied().unwrap_or(0) > 1)
                .map(|name| Violation::DuplicateResourceName {
                    name: name.to_string(),
                }),
        );

        violations
    }
}

/// Check that paths are unique across a collection of documents.
///
/// Each repeated path is reported once. Repeated slugs are legal but
/// likely to collide in rendered URLs, so they are logged as warnings.
pub fn validate_collection(docs: &[Document]) -> Result<(), ValidationError> {
    warn_duplicate_slugs(docs.iter());

    let repeated: BTreeSet<String> = duplicate_paths(docs.iter().map(Document::path))
        .into_iter()
        .map(|(_, path)| path)
        .collect();
    let violations = repeated
        .into_iter()
        .map(|path| Violation::DuplicatePath { path })
        .collect();

    match ValidationError::from_violations(violations) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Positions (and paths) of every path that repeats an earlier one.
pub(crate) fn duplicate_paths<'a>(paths: impl Iterator<Item = &'a str>) -> Vec<(usize, String)> {
    let mut seen = HashSet::new();
    paths
        .enumerate()
        .filter(|(_, path)| !seen.insert(*path))
        .map(|(index, path)| (index, path.to_string()))
        .collect()
}

pub(crate) fn warn_duplicate_slugs<'a>(docs: impl Iterator<Item = &'a Document>) {
    let mut by_slug: HashMap<String, Vec<&str>> = HashMap::new();
    for doc in docs {
        if let Some(slug) = doc.slug() {
            by_slug.entry(slug).or_default().push(doc.path());
        }
    }

    for (slug, paths) in by_slug.into_iter().filter(|(_, paths)| paths.len() > 1) {
        log::warn!("Slug `{slug}` is shared by {}", paths.join(", "));
    }
}

/// A relative path that does not climb out of its base directory.
fn is_contained_relative(src: &str) -> bool {
    if src.contains("://") || src.starts_with('/') || src.starts_with('\\') {
        return false;
    }
    Path::new(src)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

// ============================================================================
// Tests
// ============================================================================
