//! Error types for concat-core

use std::path::{Path, PathBuf};

use concat_source_map::SourceMapError;
use concat_system_runtime::RuntimeError;
use thiserror::Error;

/// What went wrong during a compilation
#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("`{0}` is required")]
    MissingRequiredOption(&'static str),

    #[error("Unable to find the included file `{spec}`")]
    FileNotFound { spec: String },

    #[error("Unable to find any files matching the pattern `{pattern}`")]
    GlobNoMatch { pattern: String },

    /// Checked before the target is read
    #[error("`{file}` can not be appended/prepended to itself")]
    SelfInclusion { file: String },

    /// `parent` is already on the ancestor chain of `file`
    #[error("`{file}` can not append/prepend the parent file `{parent}`")]
    CyclicInclusion { file: String, parent: String },

    #[error("Invalid pattern `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: RuntimeError,
    },

    #[error("Unable to read included file `{path}`")]
    ReadFailure {
        path: String,
        #[source]
        source: RuntimeError,
    },

    #[error("Unable to parse the source map of `{path}`")]
    MapParseFailure {
        path: String,
        #[source]
        source: SourceMapError,
    },

    #[error("Unable to serialize the output source map")]
    MapSerialize(#[source] SourceMapError),

    #[error("Runtime error: {0}")]
    Runtime(#[source] RuntimeError),
}

/// Where an error was raised: the file holding the directive and its line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLocation {
    pub file: PathBuf,
    /// 1-based
    pub line: usize,
    /// Always 1; directives are reported per line
    pub column: usize,
}

/// A compilation failure with an optional location.
///
/// The location is attached once, at the innermost frame that knows it, and
/// is never replaced while the error travels up through the frames of the
/// files that included it.
#[derive(Debug)]
pub struct CompileError {
    kind: ErrorKind,
    location: Option<ErrorLocation>,
}

impl CompileError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }

    /// Attach a location unless one is already set.
    pub fn at(mut self, file: &Path, line: usize) -> Self {
        if self.location.is_none() {
            self.location = Some(ErrorLocation {
                file: file.to_path_buf(),
                line,
                column: 1,
            });
        }
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn location(&self) -> Option<&ErrorLocation> {
        self.location.as_ref()
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// `file:line:column: message`, or just the message when unlocated.
    pub fn render(&self) -> String {
        match &self.location {
            Some(location) => format!(
                "{}:{}:{}: {}",
                location.file.display(),
                location.line,
                location.column,
                self.kind
            ),
            None => self.kind.to_string(),
        }
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

impl From<ErrorKind> for CompileError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;
