/*
 * join.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Joins flattened units into the final code and, in map mode, a composed
 * source map.
 *
 * Each retained output line is traced back to where it really came from.
 * When a unit carries its own map (because it was itself produced by an
 * earlier build step), the line is looked up in that map and its source is
 * resolved from the unit's directory, so chained builds still point at the
 * original files.
 */

use std::path::{Path, PathBuf};

use concat_source_map::{SourceMap, SourceMapBuilder, SourceMapConsumer};
use concat_util::{normalize_path, relative_path, to_slash};

use crate::directive::{is_directive_line, is_map_reference_line};
use crate::error::{CompileError, ErrorKind, Result};
use crate::tree::SourceUnit;

/// The true origin of one output line. `line` and `column` are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPosition {
    pub line: usize,
    pub column: usize,
    pub source_path: PathBuf,
}

#[derive(Debug, Clone, Copy)]
pub struct JoinOptions<'a> {
    pub emit_map: bool,
    /// Where the output will be written
    pub output: &'a Path,
}

#[derive(Debug)]
pub struct JoinedOutput {
    pub code: String,
    pub map: Option<SourceMap>,
}

/// Join units in emission order.
pub fn join(units: &[SourceUnit], options: &JoinOptions<'_>) -> Result<JoinedOutput> {
    if options.emit_map {
        join_with_map(units, options.output)
    } else {
        Ok(JoinedOutput {
            code: join_plain(units),
            map: None,
        })
    }
}

/// Lines kept in the output, with their 0-based index in the unit's text.
pub fn retained_lines(code: &str) -> impl Iterator<Item = (usize, &str)> {
    code.split('\n')
        .enumerate()
        .filter(|(_, line)| !is_directive_line(line) && !is_map_reference_line(line))
}

fn join_plain(units: &[SourceUnit]) -> String {
    units
        .iter()
        .map(|unit| {
            retained_lines(&unit.code)
                .map(|(_, line)| line)
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_with_map(units: &[SourceUnit], output: &Path) -> Result<JoinedOutput> {
    let output_dir = output.parent().unwrap_or_else(|| Path::new(""));
    let output_name = output
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut code = String::new();
    let mut builder = SourceMapBuilder::new();
    let mut generated_line = 0;

    for unit in units {
        // Dropped at the end of each unit, whichever way the unit is left
        let consumer = match &unit.input_map {
            Some(map) => Some(SourceMapConsumer::new(map).map_err(|source| {
                CompileError::from(ErrorKind::MapParseFailure {
                    path: to_slash(&unit.path),
                    source,
                })
                .at(&unit.path, 1)
            })?),
            None => None,
        };

        for (index, line) in retained_lines(&unit.code) {
            let origin = origin_of(unit, consumer.as_ref(), index, line);
            let source = to_slash(&relative_path(output_dir, &origin.source_path));
            builder.add_mapping(
                generated_line,
                0,
                &source,
                origin.line - 1,
                origin.column - 1,
            );
            code.push_str(line);
            code.push('\n');
            generated_line += 1;
        }
    }

    code.push_str(&format!("//# sourceMappingURL={}.map", output_name));
    tracing::debug!(lines = generated_line, sources = units.len(), "Composed source map");

    Ok(JoinedOutput {
        code,
        map: Some(builder.build(&output_name)),
    })
}

/// Find where a line of a unit came from.
///
/// Columns are probed left to right in UTF-16 code units, the unit source
/// maps count in; the first one with a mapping in the unit's own map decides. Without a map, or without any mapped column, the
/// line is its own origin.
pub fn origin_of(
    unit: &SourceUnit,
    consumer: Option<&SourceMapConsumer>,
    index: usize,
    line: &str,
) -> OutputPosition {
    let mapped = consumer.and_then(|consumer| {
        (0..line.encode_utf16().count()).find_map(|column| {
            let mapping = consumer.mapping_at(index, column)?;
            let source = consumer.resolved_source(mapping.source)?;
            Some((mapping, source))
        })
    });

    match mapped {
        Some((mapping, source)) => {
            let unit_dir = unit.path.parent().unwrap_or_else(|| Path::new(""));
            OutputPosition {
                line: mapping.original_line + 1,
                column: mapping.original_column + 1,
                source_path: normalize_path(&unit_dir.join(source)),
            }
        }
        None => OutputPosition {
            line: index + 1,
            column: 1,
            source_path: unit.path.clone(),
        },
    }
}
