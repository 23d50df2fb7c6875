//! Source maps for line-spliced output
//!
//! This crate builds version 3 source maps for text that was assembled by
//! concatenating whole lines from several files. It provides the pieces the
//! splicer threads through its traversal, and the means to read a map back.
//!
//! # Overview
//!
//! The core types are:
//! - [`SourceTable`]: Ordered list of visited files, one [`SourceId`] per visit
//! - [`MappingsBuilder`]: Delta-encodes segments against a running [`Cursor`]
//! - [`SourceMap`]: The finished JSON envelope, with generated-line lookup
//!
//! # Example
//!
//! ```rust
//! use splice_source_map::*;
//!
//! let mut sources = SourceTable::new();
//! let mut mappings = MappingsBuilder::new();
//!
//! let root = sources.add("main.js");
//! mappings.emit_segment(0, root, 0, 0);
//! mappings.end_line();
//!
//! let map = SourceMap::new(sources, mappings);
//! assert_eq!(map.mappings, "AAAA;");
//! assert_eq!(map.original_location(0).unwrap().unwrap().source, "main.js");
//! ```

pub mod mappings;
pub mod source_map;
pub mod sources;
pub mod types;
pub mod vlq;

// Re-export main types
pub use mappings::{Cursor, MappingsBuilder, MappingsError, decode_mappings};
pub use source_map::{LinkStyle, SourceMap};
pub use sources::SourceTable;
pub use types::{OriginalLocation, Segment, SourceId};
pub use vlq::VlqError;
