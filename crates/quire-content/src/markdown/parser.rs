//! Body structure extraction.
//!
//! The body of a document is opaque to validation, but two derived views
//! are useful to a renderer handoff: the heading outline (for a table of
//! contents) and a plain-text summary. Both are read with `pulldown-cmark`
//! and never render HTML.
//!
//! # Example
//!
//! ```rust
//! use quire_content::markdown::parser::{extract_headings, extract_first_paragraph};
//!
//! let content = "# My Title\n\nThis is the first paragraph.\n\n## Section";
//!
//! let headings = extract_headings(content, 2);
//! assert_eq!(headings.len(), 2);
//! assert_eq!(headings[1].text, "Section");
//!
//! let paragraph = extract_first_paragraph(content, 100).unwrap();
//! assert_eq!(paragraph, "This is the first paragraph.");
//! ```

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use quire_core::slugify;
use serde::Serialize;

/// One heading of a document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// Heading level, 1 through 6.
    pub level: u8,
    /// Heading text with inline formatting stripped.
    pub text: String,
    /// Anchor slug derived from the text.
    pub anchor: String,
}

/// Extract every heading up to `max_level`, in document order.
///
/// Inline formatting (bold, italic, links, code spans) is stripped from the
/// heading text. Headings inside code blocks are not headings and never
/// appear. A `max_level` of 0 yields nothing.
///
/// # Example
///
/// ```rust
/// use quire_content::markdown::parser::extract_headings;
///
/// let content = "# Top\n\n## Using `Result`\n\n### Too deep";
/// let headings = extract_headings(content, 2);
/// assert_eq!(headings.len(), 2);
/// assert_eq!(headings[1].text, "Using Result");
/// assert_eq!(headings[1].anchor, "using-result");
/// ```
pub fn extract_headings(content: &str, max_level: u8) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut current: Option<(u8, String)> = None;

    for event in Parser::new(content) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((level as u8, String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = current.take() {
                    let text = text.trim().to_string();
                    if level <= max_level && !text.is_empty() {
                        headings.push(Heading {
                            level,
                            anchor: slugify(&text),
                            text,
                        });
                    }
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push(' ');
                }
            }
            _ => {}
        }
    }

    headings
}

/// Extract the first paragraph from markdown content.
///
/// Skips headings and extracts the first actual paragraph content.
/// Inline formatting is stripped. Content longer than `max_chars`
/// characters is cut at a word boundary and ends with `...`.
///
/// # Example
///
/// ```rust
/// use quire_content::markdown::parser::extract_first_paragraph;
///
/// let content = "# Title\n\nThis is a **bold** introduction.\n\nMore content.";
/// let paragraph = extract_first_paragraph(content, 50).unwrap();
/// assert_eq!(paragraph, "This is a bold introduction.");
/// ```
pub fn extract_first_paragraph(content: &str, max_chars: usize) -> Option<String> {
    let mut in_paragraph = false;
    let mut paragraph_text = String::new();

    for event in Parser::new(content) {
        match event {
            Event::Start(Tag::Paragraph) => {
                in_paragraph = true;
                paragraph_text.clear();
            }
            Event::End(TagEnd::Paragraph) if in_paragraph => {
                let normalized = normalize_whitespace(&paragraph_text);
                if !normalized.is_empty() {
                    return Some(truncate_text(&normalized, max_chars));
                }
                in_paragraph = false;
            }
            Event::Text(text) | Event::Code(text) if in_paragraph => {
                paragraph_text.push_str(&text);
            }
            Event::SoftBreak | Event::HardBreak if in_paragraph => {
                paragraph_text.push(' ');
            }
            _ => {}
        }
    }

    None
}

/// Truncate text to at most `max_chars` characters, adding "..." if cut.
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut = text
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let head = &text[..cut];
    // Prefer a word boundary near the cut
    let head = head
        .rfind(char::is_whitespace)
        .map(|pos| &head[..pos])
        .unwrap_or(head);

    format!("{}...", head.trim_end())
}

/// Collapse runs of whitespace into single spaces.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Tests
// ============================================================================
