//! Core types for source mapping

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a file in the source table
///
/// Indices are handed out in first-visit order and are never reused within
/// one run, so the same path included twice owns two ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(pub usize);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One decoded mapping segment with absolute (not delta) values
///
/// All fields are 0-indexed. Segments written by this crate always carry
/// four fields; the optional name index is not modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Column in the generated line
    pub generated_column: u32,
    /// Source table index
    pub source: SourceId,
    /// Line in the original source
    pub source_line: u32,
    /// Column in the original source
    pub source_column: u32,
}

/// Result of mapping a generated line back to its original file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalLocation<'a> {
    /// Path as recorded in the source table
    pub source: &'a str,
    /// Line in the original file (0-indexed)
    pub line: u32,
    /// Column in the original file (0-indexed)
    pub column: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_id_ordering() {
        assert!(SourceId(0) < SourceId(1));
        assert_eq!(SourceId(3), SourceId(3));
    }

    #[test]
    fn test_source_id_display() {
        assert_eq!(SourceId(7).to_string(), "#7");
    }

    #[test]
    fn test_source_id_serializes_as_number() {
        let json = serde_json::to_string(&SourceId(42)).unwrap();
        assert_eq!(json, "42");
        let back: SourceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SourceId(42));
    }
}
