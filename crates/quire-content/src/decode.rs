//! Front-matter decoding.
//!
//! Turns the generic metadata mapping into a [`ParsedDocument`]. Recognized
//! keys are coerced to their field types; anything else is kept, in source
//! order, in [`ParsedDocument::extra`] so new display flags pass through
//! without a code change.
//!
//! | Key                                        | Field          | Accepts                                |
//! |--------------------------------------------|----------------|----------------------------------------|
//! | `title`                                    | `title`        | string (quote numbers and booleans)    |
//! | `date`                                     | `date`         | `YYYY-MM-DD`, RFC 3339, `YYYY-MM-DD HH:MM:SS` |
//! | `author`, `authors`                        | `authors`      | string or list of strings              |
//! | `tags`                                     | `tags`         | string or list of strings              |
//! | `resources`                                | `resources`    | list of `{name, src, title}` mappings  |
//! | `tocDepth`, `toc_depth`, `toc-depth`       | `toc_depth`    | integer 0–255                          |
//! | `hidden`                                   | `hidden`       | boolean                                |
//! | `anchorLinks`, `anchor_links`, `anchor-links` | `anchor_links` | boolean                            |
//!
//! A value of the wrong shape fails with [`Error::TypeMismatch`]. Missing
//! fields are not an error here; the validator decides what is required.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use quire_core::{Error, Result};
use serde_yaml::{Mapping, Value};

use crate::document::{ParsedDocument, Resource};
use crate::frontmatter::split_frontmatter;

/// Naive datetime layouts accepted for `date`, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A metadata key this decoder gives meaning to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Date,
    Authors,
    Tags,
    Resources,
    TocDepth,
    Hidden,
    AnchorLinks,
}

impl Field {
    fn recognize(key: &str) -> Option<Self> {
        match key {
            "title" => Some(Field::Title),
            "date" => Some(Field::Date),
            "author" | "authors" => Some(Field::Authors),
            "tags" => Some(Field::Tags),
            "resources" => Some(Field::Resources),
            "tocDepth" | "toc_depth" | "toc-depth" => Some(Field::TocDepth),
            "hidden" => Some(Field::Hidden),
            "anchorLinks" | "anchor_links" | "anchor-links" => Some(Field::AnchorLinks),
            _ => None,
        }
    }
}

/// Parse a content file with no path identifier.
///
/// # Example
///
/// ```rust
/// use quire_content::parse;
///
/// let parsed = parse("---\ntitle: Example Post\ndate: 2020-12-04\ntags: [fsharp, tooling]\n---\nHello world.").unwrap();
/// assert_eq!(parsed.title.as_deref(), Some("Example Post"));
/// assert_eq!(parsed.date.unwrap().to_string(), "2020-12-04");
/// assert_eq!(parsed.tags.len(), 2);
/// assert_eq!(parsed.body, "Hello world.");
/// ```
pub fn parse(text: &str) -> Result<ParsedDocument> {
    parse_at("", text)
}

/// Parse a content file, recording `path` as its identifier.
///
/// # Errors
///
/// - [`Error::MalformedMetadata`] for missing or unbalanced fences, or a
///   block that does not decode to a mapping
/// - [`Error::TypeMismatch`] for a recognized key whose value has the
///   wrong shape
pub fn parse_at(path: impl Into<String>, text: &str) -> Result<ParsedDocument> {
    let frontmatter = split_frontmatter(text)?;
    let metadata = frontmatter.metadata()?;

    let mut doc = ParsedDocument {
        path: path.into(),
        body: frontmatter.body().to_string(),
        ..Default::default()
    };
    decode_into(&mut doc, metadata)?;

    log::trace!(
        "Decoded {:?}: {} tag(s), {} resource(s), {} extra key(s)",
        doc.path,
        doc.tags.len(),
        doc.resources.len(),
        doc.extra.len()
    );
    Ok(doc)
}

fn decode_into(doc: &mut ParsedDocument, metadata: Mapping) -> Result<()> {
    for (key, value) in metadata {
        let field = key.as_str().and_then(Field::recognize);
        let Some(field) = field else {
            doc.extra.insert(key, value);
            continue;
        };
        // Recognized keys are always strings.
        let name = key.as_str().unwrap_or_default();

        match field {
            Field::Title => doc.title = scalar_string(name, &value)?,
            Field::Date => doc.date = date(name, &value)?,
            Field::Authors => {
                if !doc.authors.is_empty() {
                    log::warn!("{:?}: both `author` and `authors` set; using `{name}`", doc.path);
                }
                doc.authors = string_list(name, &value)?;
            }
            Field::Tags => {
                let tags = string_list(name, &value)?;
                let written = tags.len();
                doc.tags = tags.into_iter().collect();
                if doc.tags.len() < written {
                    log::debug!(
                        "{:?}: collapsed {} duplicate tag(s)",
                        doc.path,
                        written - doc.tags.len()
                    );
                }
            }
            Field::Resources => doc.resources = resources(&value)?,
            Field::TocDepth => doc.toc_depth = toc_depth(name, &value)?,
            Field::Hidden => doc.hidden = flag(name, &value)?,
            Field::AnchorLinks => doc.anchor_links = flag(name, &value)?,
        }
    }

    Ok(())
}

/// Parse the accepted `date` layouts, keeping only the calendar date.
///
/// # Example
///
/// ```rust
/// use quire_content::decode::parse_date;
///
/// assert_eq!(parse_date("2020-12-04").unwrap().to_string(), "2020-12-04");
/// assert_eq!(parse_date("2020-12-04T23:30:00+01:00").unwrap().to_string(), "2020-12-04");
/// assert!(parse_date("not-a-date").is_none());
/// assert!(parse_date("2021-02-30").is_none());
/// ```
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

/// Human-readable name of a YAML value's shape, for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Text fields take strings only. An unquoted `1.10` or `True` has already
/// been normalized by the YAML parser, so its written form is gone.
fn scalar_string(field: &str, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        other => Err(Error::type_mismatch(field, "string", value_kind(other))),
    }
}

fn date(field: &str, value: &Value) -> Result<Option<NaiveDate>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => parse_date(s)
            .map(Some)
            .ok_or_else(|| Error::type_mismatch(field, "calendar date (YYYY-MM-DD)", format!("`{s}`"))),
        other => Err(Error::type_mismatch(
            field,
            "calendar date (YYYY-MM-DD)",
            value_kind(other),
        )),
    }
}

fn string_list(field: &str, value: &Value) -> Result<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let name = format!("{field}[{i}]");
                scalar_string(&name, item)?
                    .ok_or_else(|| Error::type_mismatch(name, "string", "null"))
            })
            .collect(),
        scalar => Ok(scalar_string(field, scalar)
            .map_err(|_| Error::type_mismatch(field, "string or list of strings", value_kind(scalar)))?
            .into_iter()
            .collect()),
    }
}

fn toc_depth(field: &str, value: &Value) -> Result<Option<u8>> {
    const EXPECTED: &str = "integer between 0 and 255";

    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| Error::type_mismatch(field, EXPECTED, n.to_string())),
        Value::String(s) => s
            .trim()
            .parse::<u8>()
            .map(Some)
            .map_err(|_| Error::type_mismatch(field, EXPECTED, format!("`{s}`"))),
        other => Err(Error::type_mismatch(field, EXPECTED, value_kind(other))),
    }
}

fn flag(field: &str, value: &Value) -> Result<bool> {
    match value {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        Value::String(s) => Err(Error::type_mismatch(field, "boolean", format!("`{s}`"))),
        other => Err(Error::type_mismatch(field, "boolean", value_kind(other))),
    }
}

fn resources(value: &Value) -> Result<Vec<Resource>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| resource(i, item))
            .collect(),
        other => Err(Error::type_mismatch(
            "resources",
            "list of resource mappings",
            value_kind(other),
        )),
    }
}

fn resource(index: usize, value: &Value) -> Result<Resource> {
    let Value::Mapping(entry) = value else {
        return Err(Error::type_mismatch(
            format!("resources[{index}]"),
            "mapping with `name` and `src`",
            value_kind(value),
        ));
    };

    let mut name = String::new();
    let mut src = String::new();
    let mut title = None;
    let mut params = Mapping::new();

    for (key, value) in entry {
        match key.as_str() {
            Some("name") => {
                name = scalar_string(&format!("resources[{index}].name"), value)?.unwrap_or_default();
            }
            Some("src") => {
                src = scalar_string(&format!("resources[{index}].src"), value)?.unwrap_or_default();
            }
            Some("title") => {
                title = scalar_string(&format!("resources[{index}].title"), value)?;
            }
            Some("params") if value.is_mapping() => {
                if let Value::Mapping(nested) = value {
                    params.extend(nested.clone());
                }
            }
            _ => {
                params.insert(key.clone(), value.clone());
            }
        }
    }

    let resource = Resource::new(name, src).with_params(params);
    Ok(match title {
        Some(title) => resource.with_title(title),
        None => resource,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn mismatch_field(err: Error) -> String {
        match err {
            Error::TypeMismatch { field, .. } => field,
            other => unreachable!("Expected TypeMismatch, got {other:?}"),
        }
    }

    // ------------------------------------------------------------------------
    // Basic decoding
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_example_post() {
        let content = "---\ntitle: Example Post\ndate: 2020-12-04\ntags: [fsharp, tooling]\n---\nHello world.";
        let doc = parse(content).unwrap();

        assert_eq!(doc.title.as_deref(), Some("Example Post"));
        assert_eq!(doc.date, NaiveDate::from_ymd_opt(2020, 12, 4));
        let tags: Vec<&str> = doc.tags.iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["fsharp", "tooling"]);
        assert_eq!(doc.body, "Hello world.");
        assert!(doc.authors.is_empty());
        assert!(doc.resources.is_empty());
        assert!(doc.extra.is_empty());
    }

    #[test]
    fn test_parse_at_records_path() {
        let doc = parse_at("posts/a.md", "---\ntitle: A\n---\n").unwrap();
        assert_eq!(doc.path, "posts/a.md");
        assert_eq!(doc.body, "");
    }

    #[test]
    fn test_missing_fields_are_not_parse_errors() {
        let doc = parse("---\ntags: [x]\n---\nBody").unwrap();
        assert!(doc.title.is_none());
        assert!(doc.date.is_none());
    }

    #[test]
    fn test_malformed_propagates() {
        let err = parse("no fences at all").unwrap_err();
        assert!(matches!(err, Error::MalformedMetadata { .. }));
    }

    // ------------------------------------------------------------------------
    // title
    // ------------------------------------------------------------------------

    #[test]
    fn test_title_unquoted_number_is_mismatch() {
        let err = parse("---\ntitle: 1.10\n---\n").unwrap_err();
        assert!(err.to_string().contains("expected string, found number"));
        assert_eq!(mismatch_field(err), "title");
    }

    #[test]
    fn test_title_quoted_number_kept_verbatim() {
        let doc = parse("---\ntitle: '1.10'\n---\n").unwrap();
        assert_eq!(doc.title.as_deref(), Some("1.10"));
    }

    #[test]
    fn test_title_boolean_is_mismatch() {
        let err = parse("---\ntitle: true\n---\n").unwrap_err();
        assert!(err.to_string().contains("found boolean"));
    }

    #[test]
    fn test_title_list_is_mismatch() {
        let err = parse("---\ntitle: [a, b]\n---\n").unwrap_err();
        assert!(err.to_string().contains("expected string, found list"));
        assert_eq!(mismatch_field(err), "title");
    }

    // ------------------------------------------------------------------------
    // date
    // ------------------------------------------------------------------------

    #[test]
    fn test_date_not_a_date_is_mismatch() {
        let err = parse("---\ntitle: A\ndate: not-a-date\n---\n").unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        assert!(err.to_string().contains("not-a-date"));
    }

    #[test]
    fn test_date_invalid_calendar_day_is_mismatch() {
        let err = parse("---\ndate: 2021-02-30\n---\n").unwrap_err();
        assert_eq!(mismatch_field(err), "date");
    }

    #[test]
    fn test_date_number_is_mismatch() {
        let err = parse("---\ndate: 2020\n---\n").unwrap_err();
        assert!(err.to_string().contains("found number"));
    }

    #[test]
    fn test_date_with_time_and_offset() {
        let doc = parse("---\ndate: 2019-06-01T08:15:00-07:00\n---\n").unwrap();
        assert_eq!(doc.date, NaiveDate::from_ymd_opt(2019, 6, 1));
    }

    #[test]
    fn test_date_naive_datetime_layouts() {
        for raw in [
            "2019-06-01T08:15:00",
            "2019-06-01 08:15:00",
            "2019-06-01T08:15:00.250",
            "2019-06-01 08:15",
            "2019-06-01 08:15:00 +0200",
        ] {
            assert_eq!(parse_date(raw), NaiveDate::from_ymd_opt(2019, 6, 1), "{raw}");
        }
    }

    #[test]
    fn test_date_quoted() {
        let doc = parse("---\ndate: \"2020-12-04\"\n---\n").unwrap();
        assert_eq!(doc.date, NaiveDate::from_ymd_opt(2020, 12, 4));
    }

    // ------------------------------------------------------------------------
    // authors and tags
    // ------------------------------------------------------------------------

    #[test]
    fn test_author_single_string() {
        let doc = parse("---\nauthor: Ada Lovelace\n---\n").unwrap();
        assert_eq!(doc.authors, vec!["Ada Lovelace"]);
    }

    #[test]
    fn test_authors_keep_order() {
        let doc = parse("---\nauthor:\n  - Zed\n  - Ada\n  - Zed\n---\n").unwrap();
        assert_eq!(doc.authors, vec!["Zed", "Ada", "Zed"]);
    }

    #[test]
    fn test_authors_alias() {
        let doc = parse("---\nauthors: [Ada]\n---\n").unwrap();
        assert_eq!(doc.authors, vec!["Ada"]);
    }

    #[test]
    fn test_author_mapping_is_mismatch() {
        let err = parse("---\nauthor:\n  name: Ada\n---\n").unwrap_err();
        assert!(err.to_string().contains("string or list of strings"));
    }

    #[test]
    fn test_tags_collapse_duplicates() {
        let doc = parse("---\ntags: [tooling, fsharp, tooling]\n---\n").unwrap();
        assert_eq!(doc.tags.len(), 2);
    }

    #[test]
    fn test_tags_case_sensitive() {
        let doc = parse("---\ntags: [FSharp, fsharp]\n---\n").unwrap();
        assert_eq!(doc.tags.len(), 2);
    }

    #[test]
    fn test_tags_unquoted_numbers_are_mismatch() {
        let err = parse("---\ntags: [1.0, 1.00, 0x10, 16]\n---\n").unwrap_err();
        assert!(err.to_string().contains("found number"));
        assert_eq!(mismatch_field(err), "tags[0]");
    }

    #[test]
    fn test_tags_quoted_numbers_stay_distinct() {
        let doc = parse("---\ntags: ['1.0', '1.00', '0x10', '16']\n---\n").unwrap();
        let tags: Vec<&str> = doc.tags.iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["0x10", "1.0", "1.00", "16"]);
    }

    #[test]
    fn test_author_number_is_mismatch() {
        let err = parse("---\nauthor: 42\n---\n").unwrap_err();
        assert_eq!(mismatch_field(err), "author");
    }

    #[test]
    fn test_tags_null_item_is_mismatch() {
        let err = parse("---\ntags: [a, ~]\n---\n").unwrap_err();
        assert_eq!(mismatch_field(err), "tags[1]");
    }

    #[test]
    fn test_tags_nested_list_is_mismatch() {
        let err = parse("---\ntags: [a, [b]]\n---\n").unwrap_err();
        assert_eq!(mismatch_field(err), "tags[1]");
    }

    // ------------------------------------------------------------------------
    // Display flags
    // ------------------------------------------------------------------------

    #[test]
    fn test_flags_default_false() {
        let doc = parse("---\ntitle: A\n---\n").unwrap();
        assert!(!doc.hidden);
        assert!(!doc.anchor_links);
        assert_eq!(doc.toc_depth, None);
    }

    #[test]
    fn test_flags_set() {
        let doc = parse("---\ntocDepth: 2\nhidden: true\nanchorLinks: true\n---\n").unwrap();
        assert_eq!(doc.toc_depth, Some(2));
        assert!(doc.hidden);
        assert!(doc.anchor_links);
    }

    #[test]
    fn test_flag_aliases() {
        let doc = parse("---\ntoc_depth: 4\nanchor-links: \"TRUE\"\n---\n").unwrap();
        assert_eq!(doc.toc_depth, Some(4));
        assert!(doc.anchor_links);
    }

    #[test]
    fn test_toc_depth_not_integer_is_mismatch() {
        let err = parse("---\ntocDepth: deep\n---\n").unwrap_err();
        assert_eq!(mismatch_field(err), "tocDepth");

        let err = parse("---\ntocDepth: 2.5\n---\n").unwrap_err();
        assert!(err.to_string().contains("integer between 0 and 255"));
    }

    #[test]
    fn test_toc_depth_out_of_range_is_mismatch() {
        assert!(parse("---\ntocDepth: 300\n---\n").is_err());
        assert!(parse("---\ntocDepth: -1\n---\n").is_err());
    }

    #[test]
    fn test_hidden_not_boolean_is_mismatch() {
        let err = parse("---\nhidden: sometimes\n---\n").unwrap_err();
        assert_eq!(mismatch_field(err), "hidden");
    }

    // ------------------------------------------------------------------------
    // Resources
    // ------------------------------------------------------------------------

    #[test]
    fn test_resources_decoded_in_order() {
        let content = "---\nresources:\n  - name: before\n    src: before.png\n    title: Before formatting\n  - name: after\n    src: after.png\n---\n";
        let doc = parse(content).unwrap();

        assert_eq!(doc.resources.len(), 2);
        assert_eq!(doc.resources[0].name(), "before");
        assert_eq!(doc.resources[0].src(), "before.png");
        assert_eq!(doc.resources[0].title(), Some("Before formatting"));
        assert_eq!(doc.resources[1].title(), None);
    }

    #[test]
    fn test_resource_params_preserved() {
        let content = "---\nresources:\n  - name: chart\n    src: chart.svg\n    width: 600\n    params:\n      credit: me\n---\n";
        let doc = parse(content).unwrap();
        let params = doc.resources[0].params();

        assert_eq!(params.get("width").and_then(Value::as_u64), Some(600));
        assert_eq!(params.get("credit").and_then(Value::as_str), Some("me"));
    }

    #[test]
    fn test_resource_missing_src_decodes_empty() {
        let doc = parse("---\nresources:\n  - name: orphan\n---\n").unwrap();
        assert_eq!(doc.resources[0].src(), "");
    }

    #[test]
    fn test_resource_not_mapping_is_mismatch() {
        let err = parse("---\nresources:\n  - just-a-string\n---\n").unwrap_err();
        assert_eq!(mismatch_field(err), "resources[0]");
    }

    #[test]
    fn test_resource_src_list_is_mismatch() {
        let err = parse("---\nresources:\n  - name: a\n    src: a.png\n  - name: b\n    src: [b.png]\n---\n")
            .unwrap_err();
        assert_eq!(mismatch_field(err), "resources[1].src");
    }

    #[test]
    fn test_resource_numeric_name_is_mismatch() {
        let err = parse("---\nresources:\n  - name: 1.0\n    src: a.png\n---\n").unwrap_err();
        assert_eq!(mismatch_field(err), "resources[0].name");
    }

    #[test]
    fn test_resources_scalar_is_mismatch() {
        let err = parse("---\nresources: cover.png\n---\n").unwrap_err();
        assert_eq!(mismatch_field(err), "resources");
    }

    // ------------------------------------------------------------------------
    // Unknown keys
    // ------------------------------------------------------------------------

    #[test]
    fn test_unknown_keys_preserved_in_order() {
        let content = "---\ntitle: A\nzeta: 1\nshowReadingTime: true\nalpha: [x]\n---\n";
        let doc = parse(content).unwrap();

        let keys: Vec<&str> = doc.extra.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["zeta", "showReadingTime", "alpha"]);
        assert_eq!(doc.flag("showReadingTime"), Some(true));
    }

    #[test]
    fn test_toml_unknown_keys_preserved_in_order() {
        let content = "+++\ntitle = \"A\"\nzeta = 1\nshowReadingTime = true\nalpha = [\"x\"]\n+++\n";
        let doc = parse(content).unwrap();

        let keys: Vec<&str> = doc.extra.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["zeta", "showReadingTime", "alpha"]);
        assert_eq!(doc.flag("showReadingTime"), Some(true));
    }

    #[test]
    fn test_non_string_keys_preserved() {
        let doc = parse("---\n2020: retro\n---\n").unwrap();
        assert_eq!(doc.extra.len(), 1);
    }

    // ------------------------------------------------------------------------
    // TOML fences
    // ------------------------------------------------------------------------

    #[test]
    fn test_toml_document() {
        let content = "+++\ntitle = \"Governance\"\ndate = 2021-01-15T09:00:00Z\nauthor = [\"Ada\"]\nanchorLinks = true\n+++\n\nBody";
        let doc = parse(content).unwrap();

        assert_eq!(doc.title.as_deref(), Some("Governance"));
        assert_eq!(doc.date, NaiveDate::from_ymd_opt(2021, 1, 15));
        assert_eq!(doc.authors, vec!["Ada"]);
        assert!(doc.anchor_links);
        assert_eq!(doc.body, "Body");
    }
}
