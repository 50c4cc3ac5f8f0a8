//! Content file discovery.
//!
//! [`find_content_files`] walks a content root recursively and yields the
//! files whose extension marks them as documents. The walk is lazy: nothing
//! is read from disk until the iterator is advanced. Calling it again on an
//! unchanged tree yields the same paths in the same order.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use quire_core::util::files::{find_content_files, DEFAULT_EXTENSIONS};
//!
//! for path in find_content_files(Path::new("content"), DEFAULT_EXTENSIONS)? {
//!     println!("{}", path?.display());
//! }
//! # Ok::<(), quire_core::Error>(())
//! ```

use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Paths};

use crate::{Error, Result};

/// Extensions treated as documents when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Lazy iterator over content files under a root.
///
/// Yields `Err` for entries that could not be inspected; iteration
/// continues past them.
pub struct ContentFiles {
    root: PathBuf,
    extensions: Vec<String>,
    paths: Paths,
}

impl std::fmt::Debug for ContentFiles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentFiles")
            .field("root", &self.root)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

impl ContentFiles {
    /// The root this walk started from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn accepts(&self, path: &Path) -> bool {
        if !path.is_file() {
            return false;
        }

        // Hidden files and anything inside hidden directories are skipped.
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let hidden = relative.components().any(|c| match c {
            Component::Normal(part) => part.to_string_lossy().starts_with('.'),
            _ => false,
        });
        if hidden {
            return false;
        }

        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

impl Iterator for ContentFiles {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.paths.next()? {
                Ok(path) => {
                    if self.accepts(&path) {
                        return Some(Ok(path));
                    }
                    log::trace!("Skipping non-document entry {}", path.display());
                }
                Err(e) => {
                    let path = e.path().to_path_buf();
                    log::warn!("Cannot inspect {}: {}", path.display(), e.error());
                    return Some(Err(Error::io_with_path(e.into_error(), &path)));
                }
            }
        }
    }
}

/// Start a lazy walk over the document files under `root`.
///
/// # Errors
///
/// - [`Error::NotFound`] if `root` does not exist or is not a directory
/// - [`Error::Config`] if `root` cannot be expressed as a search pattern
///   (non UTF-8 path)
pub fn find_content_files<S: AsRef<str>>(root: &Path, extensions: &[S]) -> Result<ContentFiles> {
    if !root.is_dir() {
        return Err(Error::not_found(root));
    }

    let root_str = root
        .to_str()
        .ok_or_else(|| Error::config(format!("Content root is not valid UTF-8: {}", root.display())))?;
    let pattern = format!("{}/**/*", glob::Pattern::escape(root_str.trim_end_matches('/')));

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };
    let paths = glob::glob_with(&pattern, options)
        .map_err(|e| Error::config(format!("Invalid content pattern `{pattern}`: {e}")))?;

    log::debug!("Scanning {} for content files", root.display());

    Ok(ContentFiles {
        root: root.to_path_buf(),
        extensions: extensions
            .iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_string())
            .collect(),
        paths,
    })
}
