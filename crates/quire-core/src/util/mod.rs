//! Utility modules for content file discovery and ID computation.
//!
//! # Modules
//!
//! - [`files`]: Lazy content file discovery under a root directory
//! - [`ids`]: Slug normalization and path identifiers

pub mod files;
pub mod ids;
