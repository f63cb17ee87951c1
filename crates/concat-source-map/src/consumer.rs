//! Decoded lookup table for one source map

use crate::error::SourceMapError;
use crate::map::SourceMap;
use crate::vlq;

/// One decoded mapping segment (all coordinates 0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedMapping {
    /// Column in the generated file
    pub generated_column: usize,
    /// Index into the map's `sources`
    pub source: usize,
    /// Line in the original source
    pub original_line: usize,
    /// Column in the original source
    pub original_column: usize,
    /// Index into the map's `names`, if the segment has one
    pub name: Option<usize>,
}

/// A decoded source map ready for position lookups.
///
/// Construction decodes the whole `mappings` string into a per-line table.
/// The table is owned by the consumer and released when it is dropped, so
/// holding one for the duration of a scope ties the decoded data to that
/// scope.
#[derive(Debug)]
pub struct SourceMapConsumer {
    sources: Vec<String>,
    source_root: Option<String>,
    /// Mappings by generated line, each line sorted by generated column
    lines: Vec<Vec<DecodedMapping>>,
}

impl SourceMapConsumer {
    /// Decode a map's mappings.
    pub fn new(map: &SourceMap) -> Result<Self, SourceMapError> {
        let mut lines = Vec::new();

        // Source, original line/column and name are relative across the whole map;
        // only the generated column resets on each line.
        let mut source = 0i64;
        let mut original_line = 0i64;
        let mut original_column = 0i64;
        let mut name = 0i64;

        for (line_index, line) in map.mappings.split(';').enumerate() {
            let mut generated_column = 0i64;
            let mut decoded_line = Vec::new();

            for segment in line.split(',') {
                if segment.is_empty() {
                    continue;
                }
                let invalid = || SourceMapError::InvalidSegment {
                    segment: segment.to_string(),
                    line: line_index,
                };
                let fields = vlq::decode_segment(segment).map_err(|_| invalid())?;
                let advance = |state: &mut i64, delta: i64| -> Result<(), SourceMapError> {
                    *state = state.checked_add(delta).ok_or_else(invalid)?;
                    Ok(())
                };

                match fields.len() {
                    1 => {
                        // Generated column only: advances state, maps to nothing
                        advance(&mut generated_column, fields[0])?;
                        continue;
                    }
                    4 | 5 => {}
                    _ => return Err(invalid()),
                }

                advance(&mut generated_column, fields[0])?;
                advance(&mut source, fields[1])?;
                advance(&mut original_line, fields[2])?;
                advance(&mut original_column, fields[3])?;
                let name_index = if fields.len() == 5 {
                    advance(&mut name, fields[4])?;
                    Some(name)
                } else {
                    None
                };

                if source < 0 || source as usize >= map.sources.len() {
                    return Err(SourceMapError::SourceOutOfRange {
                        index: source,
                        len: map.sources.len(),
                    });
                }
                if generated_column < 0 || original_line < 0 || original_column < 0 {
                    return Err(invalid());
                }

                decoded_line.push(DecodedMapping {
                    generated_column: generated_column as usize,
                    source: source as usize,
                    original_line: original_line as usize,
                    original_column: original_column as usize,
                    name: name_index.and_then(|n| usize::try_from(n).ok()),
                });
            }

            // Stable sort keeps segment order for equal columns
            decoded_line.sort_by_key(|m| m.generated_column);
            lines.push(decoded_line);
        }

        Ok(Self {
            sources: map.sources.clone(),
            source_root: map.source_root.clone().filter(|root| !root.is_empty()),
            lines,
        })
    }

    /// Look up the mapping recorded exactly at a generated position.
    ///
    /// `line` and `column` are 0-indexed. When several segments share the
    /// column, the first one in the map wins.
    pub fn mapping_at(&self, line: usize, column: usize) -> Option<&DecodedMapping> {
        let mappings = self.lines.get(line)?;
        let first = mappings.partition_point(|m| m.generated_column < column);
        mappings
            .get(first)
            .filter(|m| m.generated_column == column)
    }

    /// The raw `sources` entry at `index`
    pub fn source(&self, index: usize) -> Option<&str> {
        self.sources.get(index).map(String::as_str)
    }

    /// The `sources` entry at `index` with `sourceRoot` applied.
    ///
    /// The result is still relative to the map's own location unless the
    /// source (or root) is absolute.
    pub fn resolved_source(&self, index: usize) -> Option<String> {
        let source = self.source(index)?;
        match &self.source_root {
            Some(root) if !is_absolute(source) => {
                if root.ends_with('/') {
                    Some(format!("{}{}", root, source))
                } else {
                    Some(format!("{}/{}", root, source))
                }
            }
            _ => Some(source.to_string()),
        }
    }
}

fn is_absolute(source: &str) -> bool {
    source.starts_with('/') || source.contains("://") || std::path::Path::new(source).is_absolute()
}
