/*
 * compile.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Compile command implementation
 */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use concat_core::tree::adjacent_map_path;
use concat_core::{CompileError, CompileOptions, InputSourceMap, compile_with_runtime};
use concat_system_runtime::{NativeRuntime, SystemRuntime};

/// Arguments for the compile command
#[derive(Debug)]
pub struct CompileArgs {
    /// Root source file
    pub input: PathBuf,
    /// Output file path
    pub output: PathBuf,
    /// Write `<output>.map` too
    pub source_map: bool,
    /// Base for paths in error messages
    pub root_dir: Option<PathBuf>,
    /// Map belonging to the input file
    pub input_source_map: Option<PathBuf>,
    /// Extension of includable files
    pub extension: String,
    /// Suppress console output
    pub quiet: bool,
}

/// Execute the compile command
pub fn execute(args: CompileArgs) -> Result<()> {
    let runtime = NativeRuntime::new();

    let written = match run(&args, &runtime) {
        Ok(written) => written,
        Err(e) => {
            if let Some(compile_error) = e.downcast_ref::<CompileError>() {
                // Located errors read as `file:line:column: message`
                eprintln!("{}", compile_error.render());
                std::process::exit(1);
            }
            return Err(e);
        }
    };

    if !args.quiet {
        for path in written {
            info!("Output: {}", path.display());
        }
    }
    Ok(())
}

/// Compile and write the results, returning the paths written.
fn run(args: &CompileArgs, runtime: &dyn SystemRuntime) -> Result<Vec<PathBuf>> {
    let code = read(runtime, &args.input)
        .with_context(|| format!("Failed to read input file {}", args.input.display()))?;

    let mut options = CompileOptions::new(&args.input, &args.output)
        .with_source_map(args.source_map)
        .with_extension(args.extension.clone());
    if let Some(root_dir) = &args.root_dir {
        options = options.with_root_dir(root_dir);
    }
    if let Some(map_path) = &args.input_source_map {
        let json = read(runtime, map_path)
            .with_context(|| format!("Failed to read input source map {}", map_path.display()))?;
        options = options.with_input_source_map(InputSourceMap::Json(json));
    }

    debug!(input = %args.input.display(), source_map = args.source_map, "Compiling");
    let output = pollster::block_on(compile_with_runtime(&code, &options, runtime))?;

    let mut written = vec![args.output.clone()];
    write(runtime, &args.output, &output.code)?;
    if let Some(map) = &output.map {
        let map_path = adjacent_map_path(&args.output);
        write(runtime, &map_path, map)?;
        written.push(map_path);
    }
    Ok(written)
}

fn read(runtime: &dyn SystemRuntime, path: &Path) -> Result<String> {
    Ok(pollster::block_on(runtime.file_read_string(path))?)
}

fn write(runtime: &dyn SystemRuntime, path: &Path, contents: &str) -> Result<()> {
    pollster::block_on(runtime.file_write(path, contents.as_bytes()))
        .with_context(|| format!("Failed to write output file {}", path.display()))
}
