//! Slug and path-identifier utilities.
//!
//! Documents are identified two ways: by their path relative to the content
//! root (unique across a collection) and by a URL-friendly slug derived from
//! the file name.

use std::path::{Component, Path};

/// Bundle entry-point stems; the slug comes from the enclosing directory.
const BUNDLE_STEMS: &[&str] = &["index", "_index"];

/// Normalize text to a lowercase kebab-case slug.
///
/// Every run of characters that are not alphanumeric becomes a single
/// hyphen; leading and trailing hyphens are dropped.
///
/// # Examples
///
/// ```
/// use quire_core::util::ids::slugify;
///
/// assert_eq!(slugify("Example Post"), "example-post");
/// assert_eq!(slugify("non_chord_tone"), "non-chord-tone");
/// assert_eq!(slugify("  Fantomas v4.0!  "), "fantomas-v4-0");
/// assert_eq!(slugify("---"), "");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Compute a slug from a file path.
///
/// Uses the file stem, except for bundle entry points (`index.md`,
/// `_index.md`) where the parent directory names the document.
/// Returns `None` if no usable name exists.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use quire_core::util::ids::id_from_path;
///
/// assert_eq!(
///     id_from_path(Path::new("posts/2020-12-04 Code_Fixers.md")),
///     Some("2020-12-04-code-fixers".to_string())
/// );
/// assert_eq!(
///     id_from_path(Path::new("posts/benchmarking/index.md")),
///     Some("benchmarking".to_string())
/// );
/// assert_eq!(id_from_path(Path::new("/")), None);
/// ```
pub fn id_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let name = if BUNDLE_STEMS.contains(&stem) {
        path.parent()?.file_name()?.to_str()?
    } else {
        stem
    };

    let slug = slugify(name);
    (!slug.is_empty()).then_some(slug)
}

/// Compute the collection identifier of `path` relative to `root`.
///
/// The identifier uses `/` separators on every platform so it is stable
/// across machines. Returns `None` if `path` is not under `root`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use quire_core::util::ids::path_id;
///
/// assert_eq!(
///     path_id(Path::new("/site/content"), Path::new("/site/content/posts/a.md")),
///     Some("posts/a.md".to_string())
/// );
/// assert_eq!(path_id(Path::new("/site/content"), Path::new("/elsewhere/a.md")), None);
/// ```
pub fn path_id(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    (!parts.is_empty()).then(|| parts.join("/"))
}
