//! The version 3 source map envelope

use crate::mappings::{MappingsBuilder, MappingsError, decode_mappings};
use crate::sources::SourceTable;
use crate::types::OriginalLocation;
use serde::{Deserialize, Serialize};

/// A finished source map
///
/// Field order matches the serialized JSON object. `sourcesContent` and
/// `names` are always empty for maps produced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u32,
    pub sources: Vec<String>,
    #[serde(default)]
    pub sources_content: Vec<Option<String>>,
    #[serde(default)]
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMap {
    pub const VERSION: u32 = 3;

    /// Assemble a map from a finished source table and mappings builder
    pub fn new(sources: SourceTable, mappings: MappingsBuilder) -> Self {
        SourceMap {
            version: Self::VERSION,
            sources: sources.finish(),
            sources_content: Vec::new(),
            names: Vec::new(),
            mappings: mappings.finish(),
        }
    }

    /// Render as pretty-printed JSON with a trailing newline
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Number of generated lines the mappings describe
    pub fn generated_line_count(&self) -> usize {
        self.mappings.matches(';').count()
    }

    /// Find the original position of the first segment on a generated line
    ///
    /// `Ok(None)` means the line exists in the mappings but carries no
    /// segment, or lies past the end of the mappings.
    pub fn original_location(
        &self,
        generated_line: usize,
    ) -> Result<Option<OriginalLocation<'_>>, MappingsError> {
        let lines = decode_mappings(&self.mappings)?;
        let Some(segment) = lines.get(generated_line).and_then(|line| line.first()) else {
            return Ok(None);
        };

        Ok(self
            .sources
            .get(segment.source.0)
            .map(|source| OriginalLocation {
                source,
                line: segment.source_line,
                column: segment.source_column,
            }))
    }
}

/// Comment syntax for the trailing `sourceMappingURL` link
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkStyle {
    /// `//# sourceMappingURL=...`
    #[default]
    Script,
    /// `/*# sourceMappingURL=... */`
    Stylesheet,
}

impl LinkStyle {
    /// Render the link comment for `url`, without a line terminator
    pub fn comment(self, url: &str) -> String {
        match self {
            LinkStyle::Script => format!("//# sourceMappingURL={}", url),
            LinkStyle::Stylesheet => format!("/*# sourceMappingURL={} */", url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceId;
    use pretty_assertions::assert_eq;

    fn sample_map() -> SourceMap {
        let mut sources = SourceTable::new();
        let a = sources.add("a.txt");
        let b = sources.add("b.txt");

        let mut mappings = MappingsBuilder::new();
        mappings.emit_segment(0, a, 0, 0);
        mappings.end_line();
        mappings.emit_segment(0, b, 0, 0);
        mappings.end_line();
        mappings.emit_segment(0, a, 2, 0);
        mappings.end_line();

        SourceMap::new(sources, mappings)
    }

    #[test]
    fn test_json_field_order() {
        let json = sample_map().to_json().unwrap();
        let expected = r#"{
  "version": 3,
  "sources": [
    "a.txt",
    "b.txt"
  ],
  "sourcesContent": [],
  "names": [],
  "mappings": "AAAA;ACAA;ADEA;"
}
"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_json_escapes_paths() {
        let mut sources = SourceTable::new();
        sources.add("dir\\with \"quotes\".js");
        let map = SourceMap::new(sources, MappingsBuilder::new());

        let json = map.to_json().unwrap();
        assert!(json.contains(r#""dir\\with \"quotes\".js""#));
        assert_eq!(SourceMap::from_json(&json).unwrap(), map);
    }

    #[test]
    fn test_from_json_tolerates_missing_optional_fields() {
        let map = SourceMap::from_json(r#"{"version":3,"sources":["x"],"mappings":"AAAA;"}"#)
            .unwrap();
        assert!(map.names.is_empty());
        assert!(map.sources_content.is_empty());
        assert_eq!(map.generated_line_count(), 1);
    }

    #[test]
    fn test_original_location() {
        let map = sample_map();
        assert_eq!(map.generated_line_count(), 3);

        let second = map.original_location(1).unwrap().unwrap();
        assert_eq!(second.source, "b.txt");
        assert_eq!(second.line, 0);

        let third = map.original_location(2).unwrap().unwrap();
        assert_eq!(third.source, "a.txt");
        assert_eq!(third.line, 2);

        assert_eq!(map.original_location(3).unwrap(), None);
        assert_eq!(map.original_location(10).unwrap(), None);
    }

    #[test]
    fn test_original_location_with_unknown_source() {
        let mut mappings = MappingsBuilder::new();
        mappings.emit_segment(0, SourceId(4), 0, 0);
        mappings.end_line();
        let map = SourceMap::new(SourceTable::new(), mappings);
        assert_eq!(map.original_location(0).unwrap(), None);
    }

    #[test]
    fn test_link_comments() {
        assert_eq!(
            LinkStyle::Script.comment("out.js.map"),
            "//# sourceMappingURL=out.js.map"
        );
        assert_eq!(
            LinkStyle::Stylesheet.comment("out.css.map"),
            "/*# sourceMappingURL=out.css.map */"
        );
        assert_eq!(LinkStyle::default(), LinkStyle::Script);
    }
}
