/*
 * deps.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Dependency tracking and Makefile-style dependency files.

/// Ordered list of files reached through include directives.
///
/// The root file is never recorded. A path included more than once is
/// listed at its first occurrence only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyList {
    paths: Vec<String>,
}

impl DependencyList {
    pub fn new() -> Self {
        Self { paths: Vec::new() }
    }

    /// Record an included path. Returns false if it was already listed.
    pub fn record(&mut self, path: &str) -> bool {
        if self.paths.iter().any(|p| p == path) {
            return false;
        }
        self.paths.push(path.to_string());
        true
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn into_paths(self) -> Vec<String> {
        self.paths
    }
}

/// Escape a path for use in a Make rule.
fn escape_make_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for ch in path.chars() {
        match ch {
            ' ' | '#' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            '$' => escaped.push_str("$$"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Render a single dependency rule: `target: dep1 dep2 ...` plus a newline.
pub fn format_depfile(target: &str, dependencies: &[String]) -> String {
    let mut rule = escape_make_path(target);
    rule.push(':');
    for dep in dependencies {
        rule.push(' ');
        rule.push_str(&escape_make_path(dep));
    }
    rule.push('\n');
    rule
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_first_occurrence() {
        let mut deps = DependencyList::new();
        assert!(deps.is_empty());
        assert!(deps.record("b.txt"));
        assert!(deps.record("c.txt"));
        assert!(!deps.record("b.txt"));
        assert_eq!(deps.paths(), ["b.txt", "c.txt"]);
    }

    #[test]
    fn test_format_single_dependency() {
        assert_eq!(format_depfile("out.js", &["b.txt".to_string()]), "out.js: b.txt\n");
    }

    #[test]
    fn test_format_several_dependencies() {
        let deps = vec!["b.js".to_string(), "c.js".to_string(), "d.js".to_string()];
        assert_eq!(format_depfile("bundle.js", &deps), "bundle.js: b.js c.js d.js\n");
    }

    #[test]
    fn test_format_without_dependencies() {
        assert_eq!(format_depfile("out.js", &[]), "out.js:\n");
    }

    #[test]
    fn test_target_is_escaped() {
        assert_eq!(
            format_depfile("build dir/out$1.js", &[]),
            "build\\ dir/out$$1.js:\n"
        );
    }
}
