/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Command-line entry point for splice
 */

use anyhow::{Context, Result};
use clap::Parser;
use splice_core::{FileSystemResolver, LinkStyle, SpliceJob};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "splice")]
#[command(version)]
#[command(about = "Concatenate files joined by //@include[...] directives and write a source map")]
struct Args {
    /// Root file(s) to process
    #[arg(value_name = "INPUT", required = true)]
    inputs: Vec<String>,

    /// Write output to FILE instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write the source map to FILE (defaults to <output>.map, or <input>.map)
    #[arg(short = 'm', long, value_name = "FILE")]
    map: Option<PathBuf>,

    /// Write a Makefile dependency rule for the output to FILE
    #[arg(short = 'd', long, value_name = "FILE", requires = "output")]
    deps: Option<PathBuf>,

    /// Emit a stylesheet-style link comment (/*# sourceMappingURL=... */)
    #[arg(short = 'c', long)]
    css: bool,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Args {
    fn link_style(&self) -> LinkStyle {
        if self.css {
            LinkStyle::Stylesheet
        } else {
            LinkStyle::Script
        }
    }

    fn jobs(&self) -> Result<Vec<SpliceJob>> {
        let per_input_paths = self.output.is_some() || self.map.is_some() || self.deps.is_some();
        if per_input_paths && self.inputs.len() > 1 {
            anyhow::bail!("--output, --map and --deps can only be used with a single input");
        }

        let jobs = self
            .inputs
            .iter()
            .map(|input| {
                let mut job = SpliceJob::new(input.as_str()).with_link_style(self.link_style());
                if let Some(output) = &self.output {
                    job = job.with_output(output);
                }
                if let Some(map) = &self.map {
                    job = job.with_map(map);
                }
                if let Some(deps) = &self.deps {
                    job = job.with_depfile(deps);
                }
                job
            })
            .collect();
        Ok(jobs)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; stderr keeps it out of the generated stream
    let default_filter = if args.verbose {
        "splice=debug,splice_core=debug,splice_source_map=debug"
    } else {
        "splice=warn,splice_core=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let resolver = FileSystemResolver::new();
    let stdout = std::io::stdout();

    for job in args.jobs()? {
        let report = job
            .run(&resolver, &mut stdout.lock())
            .with_context(|| format!("Failed to process '{}'", job.input))?;
        tracing::debug!(
            input = %job.input,
            lines = report.lines_written,
            sources = report.sources,
            "Finished"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_input_with_all_paths() {
        let args = Args::try_parse_from([
            "splice", "-o", "out.css", "-m", "maps/out.map", "-d", "out.d", "-c", "main.css",
        ])
        .unwrap();
        let jobs = args.jobs().unwrap();

        assert_eq!(jobs.len(), 1);
        let job = &jobs[0];
        assert_eq!(job.input, "main.css");
        assert_eq!(job.output, Some(PathBuf::from("out.css")));
        assert_eq!(job.map, PathBuf::from("maps/out.map"));
        assert_eq!(job.depfile, Some(PathBuf::from("out.d")));
        assert_eq!(job.link_style, LinkStyle::Stylesheet);
    }

    #[test]
    fn test_multiple_inputs_use_default_maps() {
        let args = Args::try_parse_from(["splice", "a.js", "b.js"]).unwrap();
        let jobs = args.jobs().unwrap();

        let maps: Vec<_> = jobs.iter().map(|job| job.map.clone()).collect();
        assert_eq!(maps, vec![PathBuf::from("a.js.map"), PathBuf::from("b.js.map")]);
        assert!(jobs.iter().all(|job| job.output.is_none()));
    }

    #[test]
    fn test_output_rejected_with_multiple_inputs() {
        let args = Args::try_parse_from(["splice", "-o", "out.js", "a.js", "b.js"]).unwrap();
        assert!(args.jobs().is_err());
    }

    #[test]
    fn test_deps_requires_output() {
        assert!(Args::try_parse_from(["splice", "-d", "out.d", "a.js"]).is_err());
    }

    #[test]
    fn test_missing_input_is_an_error() {
        assert!(Args::try_parse_from(["splice"]).is_err());
        assert!(Args::try_parse_from(["splice", "--bogus", "a.js"]).is_err());
    }
}
