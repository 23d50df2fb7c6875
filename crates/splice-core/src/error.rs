/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for splicing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while splicing a file tree.
#[derive(Debug, Error)]
pub enum SpliceError {
    /// The root or an included file could not be opened.
    #[error("Failed to open '{path}'. {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading an opened file failed part way through.
    #[error("Failed to read '{path}'. {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An output artifact could not be written.
    #[error("Failed to write '{}'. {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file includes itself, directly or through other files.
    #[error("Cyclic include of '{path}' (include chain: {})", .chain.join(" -> "))]
    CyclicInclude { path: String, chain: Vec<String> },

    /// Source map serialization failed.
    #[error("Failed to serialize source map: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing spliced text to the caller's stream failed.
    #[error("Failed to write spliced output to stream. {source}")]
    Stream {
        #[source]
        source: std::io::Error,
    },
}

/// Result type for splice operations.
pub type SpliceResult<T> = Result<T, SpliceError>;
