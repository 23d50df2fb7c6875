//! Building and reading the `mappings` field
//!
//! [`MappingsBuilder`] owns the growing mappings text and the position
//! cursor that every segment is delta-encoded against. The cursor is never
//! reset between files: one builder spans a whole splice run, so a segment
//! that jumps from an included file back to its parent encodes the
//! difference against whatever segment came last, regardless of file.

use crate::types::{Segment, SourceId};
use crate::vlq::{self, VlqError};
use thiserror::Error;

/// Reference point for the next segment's deltas
///
/// Holds the absolute source position written by the most recent segment.
/// Starts at all zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub last_source_index: u32,
    pub last_source_line: u32,
    pub last_source_column: u32,
}

/// Signed difference between two positions
///
/// Two's-complement subtraction; exact as long as positions stay below 2^31.
fn delta(current: u32, previous: u32) -> i32 {
    current.wrapping_sub(previous) as i32
}

/// Incremental writer for the `mappings` field
#[derive(Debug, Clone, Default)]
pub struct MappingsBuilder {
    mappings: String,
    cursor: Cursor,
    lines: usize,
    segments_on_line: usize,
    last_generated_column: u32,
}

impl MappingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one four-field segment for the current generated line
    ///
    /// The generated column is relative to the previous segment on the same
    /// line (or to column 0 for the first one). Source index, line and column
    /// are relative to the cursor, which is then moved to the absolute
    /// position just written.
    pub fn emit_segment(
        &mut self,
        generated_column: u32,
        source: SourceId,
        source_line: u32,
        source_column: u32,
    ) {
        if self.segments_on_line > 0 {
            self.mappings.push(',');
        }

        let source_index = source.0 as u32;
        vlq::encode(
            delta(generated_column, self.last_generated_column),
            &mut self.mappings,
        );
        vlq::encode(
            delta(source_index, self.cursor.last_source_index),
            &mut self.mappings,
        );
        vlq::encode(
            delta(source_line, self.cursor.last_source_line),
            &mut self.mappings,
        );
        vlq::encode(
            delta(source_column, self.cursor.last_source_column),
            &mut self.mappings,
        );

        self.cursor = Cursor {
            last_source_index: source_index,
            last_source_line: source_line,
            last_source_column: source_column,
        };
        self.last_generated_column = generated_column;
        self.segments_on_line += 1;
    }

    /// Close the current generated line
    ///
    /// Must be called exactly once per line written to the output.
    pub fn end_line(&mut self) {
        self.mappings.push(';');
        self.lines += 1;
        self.segments_on_line = 0;
        self.last_generated_column = 0;
    }

    /// Number of generated lines closed so far
    pub fn line_count(&self) -> usize {
        self.lines
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The encoded text written so far
    pub fn as_str(&self) -> &str {
        &self.mappings
    }

    /// Consume the builder, yielding the finished mappings text
    pub fn finish(self) -> String {
        self.mappings
    }
}

/// Errors produced while decoding a mappings string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingsError {
    #[error("generated line {line}: {source}")]
    Vlq { line: usize, source: VlqError },

    #[error("generated line {line}: segment has {len} fields, expected 1, 4 or 5")]
    InvalidSegmentLength { line: usize, len: usize },

    #[error("generated line {line}: segment resolves to a negative position")]
    NegativePosition { line: usize },
}

fn resolve(base: &mut i64, delta: i32, line: usize) -> Result<u32, MappingsError> {
    *base += i64::from(delta);
    u32::try_from(*base).map_err(|_| MappingsError::NegativePosition { line })
}

/// Decode a mappings string into absolute segments, one vector per
/// generated line
///
/// Single-field segments (a generated column with no source) are skipped.
/// The optional fifth field (name index) is read and discarded.
pub fn decode_mappings(mappings: &str) -> Result<Vec<Vec<Segment>>, MappingsError> {
    let mut lines = Vec::new();
    let mut source_index = 0i64;
    let mut source_line = 0i64;
    let mut source_column = 0i64;

    for (line, text) in mappings.split(';').enumerate() {
        let mut segments = Vec::new();
        let mut generated_column = 0i64;

        for raw in text.split(',').filter(|raw| !raw.is_empty()) {
            let fields = vlq::decode(raw).map_err(|source| MappingsError::Vlq { line, source })?;
            match fields.len() {
                1 => {
                    generated_column += i64::from(fields[0]);
                }
                4 | 5 => {
                    segments.push(Segment {
                        generated_column: resolve(&mut generated_column, fields[0], line)?,
                        source: SourceId(resolve(&mut source_index, fields[1], line)? as usize),
                        source_line: resolve(&mut source_line, fields[2], line)?,
                        source_column: resolve(&mut source_column, fields[3], line)?,
                    });
                }
                len => return Err(MappingsError::InvalidSegmentLength { line, len }),
            }
        }

        lines.push(segments);
    }

    Ok(lines)
}
