//! The ordered table of visited source files

use crate::types::SourceId;

/// Ordered list of source paths, indexed by [`SourceId`]
///
/// Paths are appended in the order files are opened. Duplicates are kept:
/// every `add` allocates a fresh id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTable {
    paths: Vec<String>,
}

impl SourceTable {
    /// Create a new empty source table
    pub fn new() -> Self {
        SourceTable { paths: Vec::new() }
    }

    /// Register a path and return its id
    pub fn add(&mut self, path: impl Into<String>) -> SourceId {
        let id = SourceId(self.paths.len());
        self.paths.push(path.into());
        id
    }

    /// Look up the path registered under `id`
    pub fn get(&self, id: SourceId) -> Option<&str> {
        self.paths.get(id.0).map(String::as_str)
    }

    /// Id the next `add` will return
    pub fn next_id(&self) -> SourceId {
        SourceId(self.paths.len())
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SourceId, &str)> {
        self.paths
            .iter()
            .enumerate()
            .map(|(idx, path)| (SourceId(idx), path.as_str()))
    }

    /// Consume the table, yielding the paths in id order
    pub fn finish(self) -> Vec<String> {
        self.paths
    }
}
