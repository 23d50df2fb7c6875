/*
 * engine.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The inclusion engine.
//!
//! The engine walks the include graph depth-first. Every file it opens gets
//! the next source index; every line that is not an include directive is
//! copied to the output and gets exactly one mapping segment pointing back
//! at `(file, line)`. Directive lines are replaced by the processed content
//! of the file they name and produce no output line of their own.
//!
//! All frames of the recursion share one [`SpliceState`], so source indices,
//! the mapping cursor and the output stream run continuously across file
//! boundaries.

use std::io::{BufRead, Write};

use splice_source_map::{MappingsBuilder, SourceId, SourceMap, SourceTable};

use crate::deps::DependencyList;
use crate::directive::parse_include;
use crate::error::{SpliceError, SpliceResult};
use crate::resolver::IncludeResolver;

/// Options for a splice run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplicerOptions {
    /// Collect every included path into [`SpliceOutput::dependencies`].
    pub track_dependencies: bool,
}

/// Everything a completed splice run produced besides the output text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpliceOutput {
    pub source_map: SourceMap,
    /// Included paths in first-seen order; empty unless tracking was enabled.
    pub dependencies: Vec<String>,
    /// Number of lines written to the output stream.
    pub lines_written: usize,
}

/// Mutable state shared by every frame of one traversal.
#[derive(Debug, Default)]
pub struct SpliceState {
    sources: SourceTable,
    mappings: MappingsBuilder,
    dependencies: Option<DependencyList>,
    include_chain: Vec<String>,
}

impl SpliceState {
    pub fn new(track_dependencies: bool) -> Self {
        Self {
            sources: SourceTable::new(),
            mappings: MappingsBuilder::new(),
            dependencies: track_dependencies.then(DependencyList::new),
            include_chain: Vec::new(),
        }
    }

    pub fn sources(&self) -> &SourceTable {
        &self.sources
    }

    pub fn mappings(&self) -> &MappingsBuilder {
        &self.mappings
    }

    /// Files currently being processed, outermost first.
    pub fn include_chain(&self) -> &[String] {
        &self.include_chain
    }

    pub fn finish(self) -> SpliceOutput {
        let lines_written = self.mappings.line_count();
        SpliceOutput {
            source_map: SourceMap::new(self.sources, self.mappings),
            dependencies: self
                .dependencies
                .map(DependencyList::into_paths)
                .unwrap_or_default(),
            lines_written,
        }
    }
}

/// Splices a root file and everything it includes into one stream.
pub struct Splicer<'r, R: IncludeResolver + ?Sized> {
    resolver: &'r R,
    options: SplicerOptions,
}

impl<'r, R: IncludeResolver + ?Sized> Splicer<'r, R> {
    pub fn new(resolver: &'r R) -> Self {
        Self::with_options(resolver, SplicerOptions::default())
    }

    pub fn with_options(resolver: &'r R, options: SplicerOptions) -> Self {
        Self { resolver, options }
    }

    /// Process `root` with fresh state, writing the spliced text to `out`.
    ///
    /// On error, `out` holds whatever was written before the failure and no
    /// source map is returned.
    pub fn splice<W: Write + ?Sized>(&self, root: &str, out: &mut W) -> SpliceResult<SpliceOutput> {
        let mut state = SpliceState::new(self.options.track_dependencies);
        self.process(root, &mut state, out)?;
        out.flush().map_err(|source| SpliceError::Stream { source })?;
        Ok(state.finish())
    }

    /// Process one file within an existing traversal.
    pub fn process<W: Write + ?Sized>(
        &self,
        path: &str,
        state: &mut SpliceState,
        out: &mut W,
    ) -> SpliceResult<()> {
        if state.include_chain.iter().any(|active| active == path) {
            let mut chain = state.include_chain.clone();
            chain.push(path.to_string());
            return Err(SpliceError::CyclicInclude {
                path: path.to_string(),
                chain,
            });
        }

        let source = state.sources.add(path);
        let mut reader = self.resolver.open(path).map_err(|source| SpliceError::Open {
            path: path.to_string(),
            source,
        })?;

        tracing::debug!(
            path,
            source = source.0,
            depth = state.include_chain.len(),
            "Entering file"
        );
        state.include_chain.push(path.to_string());
        let result = self.process_lines(path, source, &mut reader, state, out);
        // Popped on failure too, so the state can be reused after an error
        state.include_chain.pop();
        tracing::debug!(path, ok = result.is_ok(), "Leaving file");

        result
    }

    fn process_lines<W: Write + ?Sized>(
        &self,
        path: &str,
        source: SourceId,
        reader: &mut dyn BufRead,
        state: &mut SpliceState,
        out: &mut W,
    ) -> SpliceResult<()> {
        let is_root = state.include_chain.len() == 1;
        let mut line = Vec::new();
        let mut input_line: u32 = 0;
        let mut unterminated = false;

        loop {
            line.clear();
            let read = reader
                .read_until(b'\n', &mut line)
                .map_err(|source| SpliceError::Read {
                    path: path.to_string(),
                    source,
                })?;
            if read == 0 {
                break;
            }

            if let Some(name) = parse_include(&line) {
                tracing::trace!(from = path, line = input_line, include = name, "Include directive");
                if let Some(deps) = state.dependencies.as_mut() {
                    deps.record(name);
                }
                self.process(name, state, out)?;
                unterminated = false;
            } else {
                out.write_all(&line)
                    .map_err(|source| SpliceError::Stream { source })?;
                state.mappings.emit_segment(0, source, input_line, 0);
                state.mappings.end_line();
                unterminated = line.last() != Some(&b'\n');
            }

            input_line += 1;
        }

        // Keep the parent's next line on a generated line of its own
        if unterminated && !is_root {
            out.write_all(b"\n")
                .map_err(|source| SpliceError::Stream { source })?;
        }

        Ok(())
    }
}
