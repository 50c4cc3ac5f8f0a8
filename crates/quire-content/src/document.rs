//! Document model.
//!
//! A content file passes through two shapes:
//!
//! - [`ParsedDocument`]: what the metadata block literally says. Every
//!   field has been coerced to its type, but `title` and `date` may be
//!   absent and no invariant has been checked.
//! - [`Document`]: the validated record handed to a renderer. `title` and
//!   `date` are guaranteed, every invariant holds, and the value is
//!   immutable.
//!
//! Only [`crate::validate`] turns the first into the second.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::NaiveDate;
use quire_core::id_from_path;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::markdown::parser::{Heading, extract_first_paragraph, extract_headings};

/// Outline depth used when a document sets no `tocDepth`.
pub const DEFAULT_TOC_DEPTH: u8 = 3;

/// A named auxiliary asset (usually an image) attached to a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    name: String,
    src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Mapping::is_empty")]
    params: Mapping,
}

impl Resource {
    /// Create a resource with no title or params.
    pub fn new(name: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            src: src.into(),
            title: None,
            params: Mapping::new(),
        }
    }

    /// Set the display title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set extra per-resource parameters.
    pub fn with_params(mut self, params: Mapping) -> Self {
        self.params = params;
        self
    }

    /// Name the body refers to this resource by.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File path relative to the document's directory.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Display title, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Keys other than `name`, `src`, and `title`.
    pub fn params(&self) -> &Mapping {
        &self.params
    }
}

/// Decoded metadata plus body, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocument {
    /// Source identifier (relative path).
    pub path: String,
    /// `title`, if present.
    pub title: Option<String>,
    /// `date`, if present.
    pub date: Option<NaiveDate>,
    /// `author` entries, in order.
    pub authors: Vec<String>,
    /// `tags`, duplicates collapsed.
    pub tags: BTreeSet<String>,
    /// Outline depth flag.
    pub toc_depth: Option<u8>,
    /// Visibility flag.
    pub hidden: bool,
    /// Anchor-link flag.
    pub anchor_links: bool,
    /// Attached resources, in order.
    pub resources: Vec<Resource>,
    /// Unrecognized metadata keys, in source order.
    pub extra: Mapping,
    /// Everything after the metadata block.
    pub body: String,
}

impl ParsedDocument {
    /// Read an extensible boolean display flag from the unrecognized keys.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.extra.get(key).and_then(Value::as_bool)
    }
}

/// A validated, immutable document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    path: String,
    title: String,
    date: NaiveDate,
    authors: Vec<String>,
    tags: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    toc_depth: Option<u8>,
    hidden: bool,
    anchor_links: bool,
    resources: Vec<Resource>,
    #[serde(skip_serializing_if = "Mapping::is_empty")]
    extra: Mapping,
    body: String,
}

impl Document {
    /// Assemble a document once validation has established its title and date.
    pub(crate) fn from_parsed(parsed: ParsedDocument, title: String, date: NaiveDate) -> Self {
        Self {
            path: parsed.path,
            title,
            date,
            authors: parsed.authors,
            tags: parsed.tags,
            toc_depth: parsed.toc_depth,
            hidden: parsed.hidden,
            anchor_links: parsed.anchor_links,
            resources: parsed.resources,
            extra: parsed.extra,
            body: parsed.body,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn toc_depth(&self) -> Option<u8> {
        self.toc_depth
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    pub fn anchor_links(&self) -> bool {
        self.anchor_links
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Unrecognized metadata keys, preserved as written.
    pub fn extra(&self) -> &Mapping {
        &self.extra
    }

    /// Raw body text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Look up a resource by name.
    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Read an extensible boolean display flag from the unrecognized keys.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.extra.get(key).and_then(Value::as_bool)
    }

    /// URL-friendly identifier derived from the file name.
    pub fn slug(&self) -> Option<String> {
        id_from_path(Path::new(&self.path))
    }

    /// Body headings down to `tocDepth` (or [`DEFAULT_TOC_DEPTH`]).
    pub fn outline(&self) -> Vec<Heading> {
        extract_headings(&self.body, self.toc_depth.unwrap_or(DEFAULT_TOC_DEPTH))
    }

    /// First body paragraph as plain text, cut to `max_chars`.
    pub fn summary(&self, max_chars: usize) -> Option<String> {
        extract_first_paragraph(&self.body, max_chars)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut extra = Mapping::new();
        extra.insert(Value::from("showReadingTime"), Value::Bool(true));
        extra.insert(Value::from("series"), Value::from("tooling"));

        let parsed = ParsedDocument {
            path: "posts/code-fixers/index.md".to_string(),
            authors: vec!["Ada".to_string()],
            tags: ["fsharp".to_string()].into_iter().collect(),
            resources: vec![
                Resource::new("before", "before.png").with_title("Before"),
                Resource::new("after", "after.png"),
            ],
            extra,
            body: "Intro **text**.\n\n## Setup\n\n### Details\n\n#### Deep\n".to_string(),
            ..Default::default()
        };
        Document::from_parsed(
            parsed,
            "Code Fixers".to_string(),
            NaiveDate::from_ymd_opt(2020, 12, 4).unwrap(),
        )
    }

    #[test]
    fn test_accessors() {
        let doc = sample();
        assert_eq!(doc.title(), "Code Fixers");
        assert_eq!(doc.date().to_string(), "2020-12-04");
        assert_eq!(doc.authors(), ["Ada".to_string()]);
        assert!(doc.tags().contains("fsharp"));
        assert!(!doc.hidden());
        assert!(!doc.anchor_links());
        assert_eq!(doc.toc_depth(), None);
    }

    #[test]
    fn test_resource_lookup() {
        let doc = sample();
        assert_eq!(doc.resource("before").unwrap().title(), Some("Before"));
        assert_eq!(doc.resource("after").unwrap().src(), "after.png");
        assert!(doc.resource("missing").is_none());
    }

    #[test]
    fn test_extensible_flags() {
        let doc = sample();
        assert_eq!(doc.flag("showReadingTime"), Some(true));
        assert_eq!(doc.flag("series"), None);
        assert_eq!(doc.flag("absent"), None);
    }

    #[test]
    fn test_slug_from_bundle() {
        assert_eq!(sample().slug(), Some("code-fixers".to_string()));
    }

    #[test]
    fn test_outline_default_depth() {
        let texts: Vec<String> = sample().outline().into_iter().map(|h| h.text).collect();
        assert_eq!(texts, vec!["Setup", "Details"]);
    }

    #[test]
    fn test_outline_custom_depth() {
        let mut doc = sample();
        doc.toc_depth = Some(2);
        assert_eq!(doc.outline().len(), 1);
        doc.toc_depth = Some(4);
        assert_eq!(doc.outline().len(), 3);
    }

    #[test]
    fn test_summary() {
        assert_eq!(sample().summary(200), Some("Intro text.".to_string()));
    }

    #[test]
    fn test_serialize_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["date"], "2020-12-04");
        assert_eq!(json["anchorLinks"], false);
        assert_eq!(json["extra"]["showReadingTime"], true);
        assert_eq!(json["resources"][0]["title"], "Before");
        assert!(json["resources"][1].get("title").is_none());
        assert!(json.get("tocDepth").is_none());
    }
}
