//! Document loading.
//!
//! [`DocumentLoader`] enumerates the content files under a root and reads
//! each one lazily, pairing its text with a stable path identifier. The
//! sequence is finite and restartable: every call to
//! [`DocumentLoader::sources`] walks the tree again.
//!
//! # Example
//!
//! ```no_run
//! use quire_content::loader::DocumentLoader;
//!
//! let loader = DocumentLoader::new("content")?;
//! for source in loader.sources() {
//!     match source {
//!         Ok(file) => println!("{} ({} bytes)", file.path, file.text.len()),
//!         Err(e) => eprintln!("{e}"),
//!     }
//! }
//! # Ok::<(), quire_content::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use quire_core::{ContentFiles, DEFAULT_EXTENSIONS, Error, Result, find_content_files, path_id};

/// Raw text of one content file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Identifier relative to the content root, `/`-separated.
    pub path: String,
    /// Location on disk.
    pub full_path: PathBuf,
    /// File contents.
    pub text: String,
}

impl SourceFile {
    /// Read a single file, identified by its path as given.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the file does not exist, [`Error::Io`] if it
    /// cannot be read as UTF-8 text.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::not_found(path));
        }
        Self::read_as(path.to_string_lossy().replace('\\', "/"), path)
    }

    fn read_as(id: String, full_path: &Path) -> Result<Self> {
        let text = fs::read_to_string(full_path).map_err(|e| Error::io_with_path(e, full_path))?;
        Ok(Self {
            path: id,
            full_path: full_path.to_path_buf(),
            text,
        })
    }

    /// Directory that resource paths are relative to.
    pub fn dir(&self) -> &Path {
        self.full_path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Enumerates and reads content files under a root directory.
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DocumentLoader {
    /// Create a loader for `root`, accepting the default extensions.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if `root` does not exist or is not a directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::not_found(root));
        }
        Ok(Self {
            root,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
        })
    }

    /// Replace the set of extensions treated as documents.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// The content root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Extensions treated as documents.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Start a fresh, lazy walk over the content files.
    ///
    /// Files are read one at a time as the iterator advances. Unreadable
    /// files appear as `Err` items; iteration continues past them. If the
    /// root has disappeared since the loader was created, the walk yields
    /// a single [`Error::NotFound`].
    pub fn sources(&self) -> Sources {
        let state = match find_content_files(&self.root, &self.extensions) {
            Ok(files) => State::Walking(files),
            Err(e) => State::Failed(Some(e)),
        };
        Sources {
            root: self.root.clone(),
            state,
        }
    }
}

#[derive(Debug)]
enum State {
    Walking(ContentFiles),
    Failed(Option<Error>),
}

/// Lazy sequence of [`SourceFile`]s from one walk.
#[derive(Debug)]
pub struct Sources {
    root: PathBuf,
    state: State,
}

impl Iterator for Sources {
    type Item = Result<SourceFile>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.state {
            State::Failed(err) => err.take().map(Err),
            State::Walking(files) => {
                let full_path = match files.next()? {
                    Ok(path) => path,
                    Err(e) => return Some(Err(e)),
                };
                let id = path_id(&self.root, &full_path)
                    .unwrap_or_else(|| full_path.to_string_lossy().into_owned());
                log::trace!("Reading {id}");
                Some(SourceFile::read_as(id, &full_path))
            }
        }
    }
}
