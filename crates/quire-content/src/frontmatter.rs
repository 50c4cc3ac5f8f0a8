//! Front-matter fence splitting.
//!
//! Front-matter is metadata at the start of a content file, delimited by a
//! fence line. Two fences are recognized:
//!
//! ```markdown
//! ---
//! title: YAML metadata
//! tags: [fsharp, tooling]
//! ---
//!
//! Body text.
//! ```
//!
//! ```markdown
//! +++
//! title = "TOML metadata"
//! +++
//!
//! Body text.
//! ```
//!
//! Both decode to the same generic [`Mapping`], so field decoding does not
//! care which fence a file used.
//!
//! # Usage
//!
//! ```rust
//! use quire_content::frontmatter::{split_frontmatter, FenceKind};
//!
//! let content = "---\ntitle: Test\n---\n\nBody";
//! let fm = split_frontmatter(content).unwrap();
//!
//! assert_eq!(fm.kind(), FenceKind::Yaml);
//! assert_eq!(fm.block(), "title: Test\n");
//! assert_eq!(fm.body(), "Body");
//!
//! let metadata = fm.metadata().unwrap();
//! assert_eq!(metadata.get("title").and_then(|v| v.as_str()), Some("Test"));
//! ```

use quire_core::{Error, Result};
use serde_yaml::{Mapping, Value};

use crate::decode::value_kind;

/// The fence style that delimits a metadata block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    /// `---` fences around YAML.
    Yaml,
    /// `+++` fences around TOML.
    Toml,
}

impl FenceKind {
    /// The fence marker line for this kind.
    pub fn marker(self) -> &'static str {
        match self {
            FenceKind::Yaml => "---",
            FenceKind::Toml => "+++",
        }
    }

    /// Recognize a fence line. Trailing whitespace and line endings are ignored.
    fn from_line(line: &str) -> Option<Self> {
        match line.trim_end() {
            "---" => Some(FenceKind::Yaml),
            "+++" => Some(FenceKind::Toml),
            _ => None,
        }
    }

    fn closes(self, line: &str) -> bool {
        line.trim_end() == self.marker()
    }
}

/// A content file split at its fences.
///
/// Borrows from the original text; nothing is decoded until
/// [`Frontmatter::metadata`] is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frontmatter<'a> {
    kind: FenceKind,
    block: &'a str,
    body: &'a str,
}

impl<'a> Frontmatter<'a> {
    /// The fence style used.
    pub fn kind(&self) -> FenceKind {
        self.kind
    }

    /// Raw metadata text between the fences.
    pub fn block(&self) -> &'a str {
        self.block
    }

    /// Everything after the closing fence and its separator line.
    pub fn body(&self) -> &'a str {
        self.body
    }

    /// Decode the metadata block into a key/value mapping.
    ///
    /// An empty (or comment-only) block decodes to an empty mapping.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedMetadata`] if the block does not decode in its
    /// fence's format, or if its top level is not a mapping.
    pub fn metadata(&self) -> Result<Mapping> {
        match self.kind {
            FenceKind::Yaml => yaml_mapping(self.block),
            FenceKind::Toml => toml_mapping(self.block),
        }
    }
}

/// Split content into its metadata block and body.
///
/// The opening fence must be the first line (a UTF-8 byte-order mark is
/// ignored). The block ends at the first line holding only the same
/// marker. One blank line after the closing fence is treated as the
/// separator and dropped; the rest of the body is kept verbatim.
///
/// # Errors
///
/// [`Error::MalformedMetadata`] if the opening fence is missing or no
/// closing fence follows it.
///
/// # Example
///
/// ```rust
/// use quire_content::frontmatter::split_frontmatter;
///
/// let fm = split_frontmatter("---\ntitle: A\n---\nHello world.").unwrap();
/// assert_eq!(fm.body(), "Hello world.");
///
/// assert!(split_frontmatter("# Just Markdown").is_err());
/// assert!(split_frontmatter("---\ntitle: A\n\nno closing fence").is_err());
/// ```
pub fn split_frontmatter(content: &str) -> Result<Frontmatter<'_>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let kind = lines
        .next()
        .and_then(FenceKind::from_line)
        .ok_or_else(|| Error::malformed("missing opening fence (`---` or `+++`) on the first line"))?;

    let block_start = content.find('\n').map(|pos| pos + 1).unwrap_or(content.len());
    let mut offset = block_start;

    for line in lines {
        if kind.closes(line) {
            let block = &content[block_start..offset];
            let rest = &content[offset + line.len()..];
            return Ok(Frontmatter {
                kind,
                block,
                body: skip_separator(rest),
            });
        }
        offset += line.len();
    }

    Err(Error::malformed(format!(
        "unbalanced fence: opening `{}` has no closing `{}`",
        kind.marker(),
        kind.marker()
    )))
}

/// Strip front-matter from content, returning only the body.
///
/// Content without a well-formed metadata block is returned unchanged.
///
/// # Example
///
/// ```rust
/// use quire_content::frontmatter::strip_frontmatter;
///
/// assert_eq!(strip_frontmatter("---\ntitle: Test\n---\n\n# Heading"), "# Heading");
/// assert_eq!(strip_frontmatter("# Just content"), "# Just content");
/// ```
pub fn strip_frontmatter(content: &str) -> &str {
    split_frontmatter(content)
        .map(|fm| fm.body())
        .unwrap_or(content)
}

/// Drop a single blank separator line, if present.
fn skip_separator(rest: &str) -> &str {
    match rest.split_inclusive('\n').next() {
        Some(line) if line.trim().is_empty() => &rest[line.len()..],
        _ => rest,
    }
}

fn yaml_mapping(block: &str) -> Result<Mapping> {
    if block.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let value: Value = serde_yaml::from_str(block)
        .map_err(|e| Error::malformed(format!("invalid YAML metadata: {e}")))?;

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        other => Err(Error::malformed(format!(
            "metadata must be a key/value mapping, found {}",
            value_kind(&other)
        ))),
    }
}

fn toml_mapping(block: &str) -> Result<Mapping> {
    let table: toml::Table = toml::from_str(block)
        .map_err(|e| Error::malformed(format!("invalid TOML metadata: {e}")))?;

    Ok(table
        .into_iter()
        .map(|(key, value)| (Value::String(key), toml_to_yaml(value)))
        .collect())
}

/// Convert a TOML value into the YAML value tree used for decoding.
///
/// TOML datetimes have no YAML counterpart and become their RFC 3339 text.
fn toml_to_yaml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Value::Number(f.into()),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(toml_to_yaml).collect()),
        toml::Value::Table(table) => Value::Mapping(
            table
                .into_iter()
                .map(|(key, value)| (Value::String(key), toml_to_yaml(value)))
                .collect(),
        ),
    }
}

// ============================================================================
// Tests
// ============================================================================
