//! Front-matter parsing, document model, validation, and loading.
//!
//! Content flows through three stages, each usable on its own:
//!
//! - [`loader`]: enumerate and read content files under a root
//! - [`decode`]: split the metadata block from the body and decode it into a
//!   [`ParsedDocument`] (built on [`frontmatter`])
//! - [`validate`](mod@validate): check invariants and produce a [`Document`]
//!
//! [`pipeline`] chains the three over a whole tree and returns one report per
//! file.
//!
//! # Example
//!
//! ```rust
//! use quire_content::{parse, validate};
//!
//! let text = "---\ntitle: Example Post\ndate: 2020-12-04\ntags: [fsharp, tooling]\n---\nHello world.";
//! let doc = validate(parse(text)?)?;
//! assert_eq!(doc.title(), "Example Post");
//! assert!(doc.tags().contains("tooling"));
//! assert_eq!(doc.body(), "Hello world.");
//! # Ok::<(), quire_content::Error>(())
//! ```

pub mod decode;
pub mod document;
pub mod frontmatter;
pub mod loader;
pub mod markdown;
pub mod pipeline;
pub mod validate;

mod proptests;

pub use decode::{parse, parse_at, parse_date};
pub use document::{DEFAULT_TOC_DEPTH, Document, ParsedDocument, Resource};
pub use frontmatter::{FenceKind, Frontmatter, split_frontmatter, strip_frontmatter};
pub use loader::{DocumentLoader, SourceFile, Sources};
pub use markdown::Heading;
pub use pipeline::{Batch, DocumentReport, Pipeline, PipelineOptions, process, process_source};
pub use validate::{Validator, validate, validate_collection};

pub use quire_core::{Error, Result, ValidationError, Violation};
