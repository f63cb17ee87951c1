//! Compilation options

use std::path::PathBuf;

use concat_source_map::SourceMap;

/// Extension accepted for includes when none is configured
pub const DEFAULT_EXTENSION: &str = "js";

/// Appended to a file name to find its adjacent source map
pub const MAP_SUFFIX: &str = ".map";

/// A source map belonging to the root file, supplied by the caller
#[derive(Debug, Clone)]
pub enum InputSourceMap {
    /// Raw map JSON, parsed when the compilation starts
    Json(String),
    /// An already parsed map
    Parsed(SourceMap),
}

/// Options for a single compilation.
///
/// `file` and `output` are required. Relative paths are resolved against the
/// runtime's working directory.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Path of the root source; includes are resolved from its directory
    pub file: Option<PathBuf>,
    /// Path the result will be written to. Map sources are made relative to
    /// its directory and the trailing map reference uses its file name.
    pub output: Option<PathBuf>,
    /// Base for the paths shown in error messages. Defaults to the
    /// directory of `file`.
    pub root_dir: Option<PathBuf>,
    /// Emit a composed source map alongside the code
    pub source_map: bool,
    /// Map for the root file's own content. Only used when `source_map` is on.
    pub input_source_map: Option<InputSourceMap>,
    /// Extension (without the dot) of includable files
    pub extension: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            file: None,
            output: None,
            root_dir: None,
            source_map: false,
            input_source_map: None,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl CompileOptions {
    pub fn new(file: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(file.into()),
            output: Some(output.into()),
            ..Self::default()
        }
    }

    pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(root_dir.into());
        self
    }

    pub fn with_source_map(mut self, enabled: bool) -> Self {
        self.source_map = enabled;
        self
    }

    pub fn with_input_source_map(mut self, map: InputSourceMap) -> Self {
        self.input_source_map = Some(map);
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }
}
