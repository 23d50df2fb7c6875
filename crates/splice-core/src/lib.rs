/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Line-oriented include splicing with source maps.
//!
//! This crate concatenates a tree of text files joined by include
//! directives and records, for every generated line, the file and line it
//! came from:
//!
//! ```text
//! one
//! //@include[b.txt]
//! two
//! ```
//!
//! The directive line is replaced by the processed contents of `b.txt`.
//! Nothing else about the files is interpreted.
//!
//! # Architecture
//!
//! - [`directive`]: recognizes `//@include[name]` lines
//! - [`resolver`]: opens files ([`FileSystemResolver`], [`MemoryResolver`])
//! - [`engine`]: the depth-first traversal ([`Splicer`])
//! - [`deps`]: dependency list and Makefile-style rule
//! - [`job`]: one complete run that writes output, map and dependency files
//!
//! # Example
//!
//! ```
//! use splice_core::{MemoryResolver, Splicer};
//!
//! let resolver = MemoryResolver::with_files([
//!     ("a.txt", "one\n//@include[b.txt]\ntwo\n"),
//!     ("b.txt", "mid\n"),
//! ]);
//!
//! let mut out = Vec::new();
//! let output = Splicer::new(&resolver).splice("a.txt", &mut out).unwrap();
//!
//! assert_eq!(out, b"one\nmid\ntwo\n");
//! assert_eq!(output.source_map.sources, ["a.txt", "b.txt"]);
//! assert_eq!(output.source_map.mappings, "AAAA;ACAA;ADEA;");
//! ```

pub mod deps;
pub mod directive;
pub mod engine;
pub mod error;
pub mod job;
pub mod resolver;

// Re-export main types at crate root
pub use deps::{DependencyList, format_depfile};
pub use engine::{SpliceOutput, SpliceState, Splicer, SplicerOptions};
pub use error::{SpliceError, SpliceResult};
pub use job::{JobReport, SpliceJob, default_map_path};
pub use resolver::{FileSystemResolver, IncludeResolver, MemoryResolver};
pub use splice_source_map::{LinkStyle, SourceMap};
