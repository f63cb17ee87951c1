//! concat CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "concat")]
#[command(version = concat_util::cli_version())]
#[command(about = "Concatenate scripts following their //@prepend and //@append directives", long_about = None)]
struct Cli {
    /// Root source file
    input: PathBuf,

    /// Write the concatenated output to FILE
    #[arg(short = 'o', long, value_name = "FILE")]
    output: PathBuf,

    /// Also write a source map to <FILE>.map
    #[arg(short = 's', long)]
    source_map: bool,

    /// Directory error messages are relative to (defaults to the input's directory)
    #[arg(long, value_name = "DIR")]
    root_dir: Option<PathBuf>,

    /// Existing source map for the input file
    #[arg(long, value_name = "FILE")]
    input_source_map: Option<PathBuf>,

    /// Extension of includable files
    #[arg(long, default_value = concat_core::DEFAULT_EXTENSION)]
    extension: String,

    /// Suppress console output
    #[arg(short = 'q', long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "concat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    commands::compile::execute(commands::compile::CompileArgs {
        input: cli.input,
        output: cli.output,
        source_map: cli.source_map,
        root_dir: cli.root_dir,
        input_source_map: cli.input_source_map,
        extension: cli.extension,
        quiet: cli.quiet,
    })
}
