//! Markdown body utilities.
//!
//! - [`parser`]: Heading outline and first-paragraph summary extraction

pub mod parser;

pub use parser::{Heading, extract_first_paragraph, extract_headings};
