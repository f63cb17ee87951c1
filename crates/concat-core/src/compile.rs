/*
 * compile.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Entry points: resolve the inclusion tree of a root file and join it.
 */

use std::path::Path;

use concat_source_map::{SourceMap, SourceMapConsumer};
use concat_system_runtime::{NativeRuntime, SystemRuntime};
use concat_util::{absolutize, to_slash};

use crate::error::{CompileError, ErrorKind, Result};
use crate::join::{JoinOptions, join};
use crate::options::{CompileOptions, InputSourceMap};
use crate::tree::TreeBuilder;

/// Result of a compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    pub code: String,
    /// Source map JSON, present only in map mode
    pub map: Option<String>,
}

/// Compile `code` (the content of `options.file`) against the local filesystem.
pub async fn compile(code: &str, options: &CompileOptions) -> Result<CompileOutput> {
    let runtime = NativeRuntime::new();
    compile_with_runtime(code, options, &runtime).await
}

/// Compile `code` with all file access going through `runtime`.
pub async fn compile_with_runtime(
    code: &str,
    options: &CompileOptions,
    runtime: &dyn SystemRuntime,
) -> Result<CompileOutput> {
    let file = options
        .file
        .as_deref()
        .ok_or(ErrorKind::MissingRequiredOption("file"))?;
    let output = options
        .output
        .as_deref()
        .ok_or(ErrorKind::MissingRequiredOption("output"))?;

    let cwd = runtime.cwd().map_err(ErrorKind::Runtime)?;
    let file = absolutize(file, &cwd);
    let output = absolutize(output, &cwd);
    let root_dir = match &options.root_dir {
        Some(dir) => absolutize(dir, &cwd),
        None => file.parent().map(Path::to_path_buf).unwrap_or(cwd),
    };

    // The root's own map only matters when a map is being produced
    let input_map = match &options.input_source_map {
        Some(map) if options.source_map => Some(root_input_map(map, &file)?),
        _ => None,
    };

    let builder = TreeBuilder::new(
        runtime,
        root_dir,
        options.extension.clone(),
        options.source_map,
    );
    let tree = builder
        .build(file.clone(), code.to_string(), input_map, Vec::new())
        .await?;
    let units = tree.flatten();
    tracing::debug!(file = %file.display(), units = units.len(), "Resolved includes");

    let joined = join(
        &units,
        &JoinOptions {
            emit_map: options.source_map,
            output: &output,
        },
    )?;
    let map = joined
        .map
        .map(|map| map.to_json())
        .transpose()
        .map_err(ErrorKind::MapSerialize)?;

    Ok(CompileOutput {
        code: joined.code,
        map,
    })
}

fn root_input_map(map: &InputSourceMap, file: &Path) -> Result<SourceMap> {
    let parse_failure = |source| {
        CompileError::from(ErrorKind::MapParseFailure {
            path: to_slash(file),
            source,
        })
        .at(file, 1)
    };

    match map {
        InputSourceMap::Json(json) => SourceMap::from_json(json).map_err(parse_failure),
        InputSourceMap::Parsed(map) => {
            SourceMapConsumer::new(map).map_err(parse_failure)?;
            Ok(map.clone())
        }
    }
}
