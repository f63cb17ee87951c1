//! Builder for new source maps

use std::collections::HashMap;

use crate::map::SourceMap;
use crate::vlq;

#[derive(Debug, Clone, Copy)]
struct Mapping {
    generated_line: usize,
    generated_column: usize,
    source: usize,
    original_line: usize,
    original_column: usize,
}

/// Collects mappings and encodes them into a [`SourceMap`].
///
/// Sources are deduplicated and keep the order in which they were first
/// seen. All coordinates are 0-indexed.
#[derive(Debug, Default)]
pub struct SourceMapBuilder {
    sources: Vec<String>,
    source_indices: HashMap<String, usize>,
    mappings: Vec<Mapping>,
}

impl SourceMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source, returning its index
    pub fn add_source(&mut self, source: &str) -> usize {
        if let Some(&index) = self.source_indices.get(source) {
            return index;
        }
        let index = self.sources.len();
        self.sources.push(source.to_string());
        self.source_indices.insert(source.to_string(), index);
        index
    }

    /// Record that a generated position came from an original position
    pub fn add_mapping(
        &mut self,
        generated_line: usize,
        generated_column: usize,
        source: &str,
        original_line: usize,
        original_column: usize,
    ) {
        let source = self.add_source(source);
        self.mappings.push(Mapping {
            generated_line,
            generated_column,
            source,
            original_line,
            original_column,
        });
    }

    /// Build the source map for the generated file `file`
    pub fn build(mut self, file: &str) -> SourceMap {
        self.mappings
            .sort_by_key(|m| (m.generated_line, m.generated_column));

        SourceMap {
            version: 3,
            file: Some(file.to_string()),
            source_root: None,
            sources: self.sources,
            sources_content: None,
            names: Vec::new(),
            mappings: encode_mappings(&self.mappings),
        }
    }
}

fn encode_mappings(mappings: &[Mapping]) -> String {
    let mut result = String::new();
    let mut line = 0usize;
    let mut first_on_line = true;
    let mut prev_column = 0i64;
    let mut prev_source = 0i64;
    let mut prev_original_line = 0i64;
    let mut prev_original_column = 0i64;

    for mapping in mappings {
        while line < mapping.generated_line {
            result.push(';');
            line += 1;
            prev_column = 0;
            first_on_line = true;
        }
        if !first_on_line {
            result.push(',');
        }
        first_on_line = false;

        vlq::encode_into(mapping.generated_column as i64 - prev_column, &mut result);
        vlq::encode_into(mapping.source as i64 - prev_source, &mut result);
        vlq::encode_into(mapping.original_line as i64 - prev_original_line, &mut result);
        vlq::encode_into(mapping.original_column as i64 - prev_original_column, &mut result);

        prev_column = mapping.generated_column as i64;
        prev_source = mapping.source as i64;
        prev_original_line = mapping.original_line as i64;
        prev_original_column = mapping.original_column as i64;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumer::SourceMapConsumer;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_one_mapping_per_line() {
        let mut builder = SourceMapBuilder::new();
        builder.add_mapping(0, 0, "a.js", 0, 0);
        builder.add_mapping(1, 0, "a.js", 1, 0);
        builder.add_mapping(2, 0, "b.js", 0, 0);

        let map = builder.build("out.js");
        assert_eq!(map.mappings, "AAAA;AACA;ACDA");
        assert_eq!(map.sources, vec!["a.js".to_string(), "b.js".to_string()]);
        assert_eq!(map.file.as_deref(), Some("out.js"));
    }

    #[test]
    fn test_skipped_lines_are_left_empty() {
        let mut builder = SourceMapBuilder::new();
        builder.add_mapping(2, 0, "a.js", 7, 3);
        let map = builder.build("out.js");
        assert_eq!(map.mappings, ";;AAOG");
    }

    #[test]
    fn test_sources_are_deduplicated_in_first_seen_order() {
        let mut builder = SourceMapBuilder::new();
        assert_eq!(builder.add_source("z.js"), 0);
        assert_eq!(builder.add_source("a.js"), 1);
        assert_eq!(builder.add_source("z.js"), 0);
        let map = builder.build("out.js");
        assert_eq!(map.sources, vec!["z.js", "a.js"]);
        assert_eq!(map.mappings, "");
    }

    #[test]
    fn test_built_map_decodes_back_to_recorded_positions() {
        let mut builder = SourceMapBuilder::new();
        builder.add_mapping(3, 0, "lib/x.js", 10, 4);
        builder.add_mapping(0, 0, "main.js", 0, 0);
        builder.add_mapping(3, 6, "main.js", 2, 1);
        let map = builder.build("out.js");

        let consumer = SourceMapConsumer::new(&map).unwrap();
        let m = consumer.mapping_at(3, 0).unwrap();
        assert_eq!(consumer.source(m.source), Some("lib/x.js"));
        assert_eq!((m.original_line, m.original_column), (10, 4));

        let m = consumer.mapping_at(3, 6).unwrap();
        assert_eq!(consumer.source(m.source), Some("main.js"));
        assert_eq!((m.original_line, m.original_column), (2, 1));
    }
}
