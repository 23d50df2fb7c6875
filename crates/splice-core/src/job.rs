/*
 * job.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! One complete splice run: traverse, then write the artifacts.
//!
//! The generated text is buffered until the traversal has succeeded. The
//! output, the map file and the dependency file are then each written to a
//! temp file beside their destination, and renamed into place only once all
//! of them were written. A run that fails before that point leaves none of
//! them behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use splice_source_map::LinkStyle;
use tempfile::NamedTempFile;

use crate::deps::format_depfile;
use crate::engine::{Splicer, SplicerOptions};
use crate::error::{SpliceError, SpliceResult};
use crate::resolver::IncludeResolver;

/// Description of a single run over one root file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpliceJob {
    /// Root file, as handed to the resolver.
    pub input: String,
    /// Output file; `None` writes to the caller's stream.
    pub output: Option<PathBuf>,
    /// Map file path.
    pub map: PathBuf,
    /// Dependency file path, if one should be written.
    pub depfile: Option<PathBuf>,
    pub link_style: LinkStyle,
}

/// What a successful run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub lines_written: usize,
    pub sources: usize,
    pub dependencies: Vec<String>,
    pub map_url: String,
}

impl SpliceJob {
    /// A job writing to the caller's stream with the map next to the input.
    pub fn new(input: impl Into<String>) -> Self {
        let input = input.into();
        let map = default_map_path(&input, None);
        Self {
            input,
            output: None,
            map,
            depfile: None,
            link_style: LinkStyle::Script,
        }
    }

    /// Write to `output`; the map path follows unless set explicitly later.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        let output = output.into();
        self.map = default_map_path(&self.input, Some(output.as_path()));
        self.output = Some(output);
        self
    }

    pub fn with_map(mut self, map: impl Into<PathBuf>) -> Self {
        self.map = map.into();
        self
    }

    pub fn with_depfile(mut self, depfile: impl Into<PathBuf>) -> Self {
        self.depfile = Some(depfile.into());
        self
    }

    pub fn with_link_style(mut self, link_style: LinkStyle) -> Self {
        self.link_style = link_style;
        self
    }

    /// The URL placed in the `sourceMappingURL` comment.
    ///
    /// When the map lives under the output file's directory the URL is
    /// relative to it; otherwise the map path is used as given.
    pub fn map_url(&self) -> String {
        let relative = self
            .output
            .as_deref()
            .and_then(Path::parent)
            .filter(|dir| !dir.as_os_str().is_empty())
            .and_then(|dir| self.map.strip_prefix(dir).ok());
        relative
            .unwrap_or(self.map.as_path())
            .to_string_lossy()
            .replace('\\', "/")
    }

    /// Run the job, sending generated text to `stream` when no output file
    /// is configured.
    pub fn run<R, W>(&self, resolver: &R, stream: &mut W) -> SpliceResult<JobReport>
    where
        R: IncludeResolver + ?Sized,
        W: Write + ?Sized,
    {
        let options = SplicerOptions {
            track_dependencies: self.depfile.is_some(),
        };

        let mut generated = Vec::new();
        let output = Splicer::with_options(resolver, options).splice(&self.input, &mut generated)?;

        let map_url = self.map_url();
        if !generated.is_empty() && !generated.ends_with(b"\n") {
            generated.push(b'\n');
        }
        generated.extend_from_slice(self.link_style.comment(&map_url).as_bytes());
        generated.push(b'\n');

        let map_json = output.source_map.to_json()?;
        let depfile = self.depfile.as_deref().map(|path| {
            let target = match &self.output {
                Some(out) => out.to_string_lossy().into_owned(),
                None => self.input.clone(),
            };
            (path, format_depfile(&target, &output.dependencies))
        });

        let mut staged = Vec::with_capacity(3);
        if let Some(path) = &self.output {
            staged.push(stage_file(path, &generated)?);
        }
        staged.push(stage_file(&self.map, map_json.as_bytes())?);
        if let Some((path, contents)) = &depfile {
            staged.push(stage_file(path, contents.as_bytes())?);
        }

        if self.output.is_none() {
            stream
                .write_all(&generated)
                .and_then(|()| stream.flush())
                .map_err(|source| SpliceError::Write {
                    path: PathBuf::from(STREAM_NAME),
                    source,
                })?;
        }

        for file in staged {
            file.persist()?;
        }

        if let Some(path) = &self.output {
            tracing::info!(path = %path.display(), lines = output.lines_written, "Wrote output");
        }
        tracing::info!(path = %self.map.display(), sources = output.source_map.sources.len(), "Wrote source map");
        if let Some((path, _)) = &depfile {
            tracing::info!(path = %path.display(), count = output.dependencies.len(), "Wrote dependency file");
        }

        Ok(JobReport {
            lines_written: output.lines_written,
            sources: output.source_map.sources.len(),
            dependencies: output.dependencies,
            map_url,
        })
    }
}

/// `<output>.map` when writing to a file, `<input>.map` otherwise.
pub fn default_map_path(input: &str, output: Option<&Path>) -> PathBuf {
    let base = output.map_or_else(|| PathBuf::from(input), Path::to_path_buf);
    let mut name = base.into_os_string();
    name.push(".map");
    PathBuf::from(name)
}

/// Destination shown in errors for the caller's stream.
const STREAM_NAME: &str = "<stdout>";

/// Contents written to a temp file in the destination's directory.
struct StagedFile<'a> {
    path: &'a Path,
    temp: NamedTempFile,
}

impl StagedFile<'_> {
    fn persist(self) -> SpliceResult<()> {
        let path = self.path;
        self.temp
            .persist(path)
            .map(|_| ())
            .map_err(|err| SpliceError::Write {
                path: path.to_path_buf(),
                source: err.error,
            })
    }
}

fn stage_file<'a>(path: &'a Path, contents: &[u8]) -> SpliceResult<StagedFile<'a>> {
    let write_error = |source: std::io::Error| SpliceError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".splice-");
    // Temp files default to owner-only; artifacts get the usual file mode
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }

    let mut temp = builder.tempfile_in(dir).map_err(write_error)?;
    temp.write_all(contents).map_err(write_error)?;
    Ok(StagedFile { path, temp })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::MemoryResolver;
    use std::fs;
    use tempfile::TempDir;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_stream_write_failure_names_stdout() {
        let temp = TempDir::new().unwrap();
        let map = temp.path().join("a.js.map");
        let resolver = MemoryResolver::with_files([("a.js", "a();\n")]);

        let err = SpliceJob::new("a.js")
            .with_map(&map)
            .run(&resolver, &mut ClosedPipe)
            .unwrap_err();

        assert!(matches!(err, SpliceError::Write { ref path, .. } if path == Path::new("<stdout>")));
        assert!(err.to_string().starts_with("Failed to write '<stdout>'."));
        assert!(!map.exists());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_default_map_path() {
        assert_eq!(default_map_path("a.js", None), PathBuf::from("a.js.map"));
        assert_eq!(
            default_map_path("a.js", Some(Path::new("out/bundle.js"))),
            PathBuf::from("out/bundle.js.map")
        );
    }

    #[test]
    fn test_builder_defaults() {
        let job = SpliceJob::new("src/main.js");
        assert_eq!(job.map, PathBuf::from("src/main.js.map"));
        assert_eq!(job.output, None);
        assert_eq!(job.link_style, LinkStyle::Script);

        let job = job.with_output("dist/app.js");
        assert_eq!(job.map, PathBuf::from("dist/app.js.map"));

        let job = job.with_map("maps/app.map");
        assert_eq!(job.map, PathBuf::from("maps/app.map"));
    }

    #[test]
    fn test_map_url_relative_to_output_dir() {
        let job = SpliceJob::new("main.js").with_output("dist/app.js");
        assert_eq!(job.map_url(), "app.js.map");

        let job = SpliceJob::new("main.js").with_output("app.js");
        assert_eq!(job.map_url(), "app.js.map");

        let job = SpliceJob::new("main.js")
            .with_output("dist/app.js")
            .with_map("maps/app.js.map");
        assert_eq!(job.map_url(), "maps/app.js.map");

        let job = SpliceJob::new("src/main.js");
        assert_eq!(job.map_url(), "src/main.js.map");
    }
}
