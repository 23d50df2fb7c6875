/*
 * resolver.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Include resolution.
//!
//! This module provides the trait the splicer uses to open the root file and
//! every included file, with a filesystem implementation and an in-memory
//! one.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

/// Trait for opening files named by the root path or an include directive.
///
/// The returned reader is owned by the caller and dropped when the file has
/// been fully consumed, or as soon as processing of that file fails.
pub trait IncludeResolver {
    /// Open `path` for line-by-line reading.
    fn open(&self, path: &str) -> io::Result<Box<dyn BufRead + '_>>;
}

/// Resolver that opens files from the filesystem.
///
/// Paths are used exactly as written, so relative paths resolve against the
/// process working directory unless a root directory is set.
#[derive(Debug, Clone, Default)]
pub struct FileSystemResolver {
    root: Option<PathBuf>,
}

impl FileSystemResolver {
    /// Resolve relative paths against the working directory.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Resolve relative paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => Path::new(path).to_path_buf(),
        }
    }
}

impl IncludeResolver for FileSystemResolver {
    fn open(&self, path: &str) -> io::Result<Box<dyn BufRead + '_>> {
        let file = File::open(self.resolve(path))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Resolver that serves files from an in-memory map.
///
/// Useful for testing and for embedding the splicer where the inputs are
/// not on disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryResolver {
    /// Create a new empty memory resolver.
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
        }
    }

    /// Add a file to the resolver.
    pub fn add(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> &mut Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Create a resolver with the given files.
    pub fn with_files(
        files: impl IntoIterator<Item = (impl Into<String>, impl Into<Vec<u8>>)>,
    ) -> Self {
        let mut resolver = Self::new();
        for (path, content) in files {
            resolver.add(path, content);
        }
        resolver
    }
}

impl IncludeResolver for MemoryResolver {
    fn open(&self, path: &str) -> io::Result<Box<dyn BufRead + '_>> {
        match self.files.get(path) {
            Some(content) => Ok(Box::new(Cursor::new(content.as_slice()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                "No such file or directory",
            )),
        }
    }
}
