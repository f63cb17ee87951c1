/*
 * traits.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Defines the SystemRuntime trait and supporting types for the runtime abstraction layer.
 *
 * This abstraction allows the compiler to run against different file sources:
 * - NativeRuntime: the real filesystem via std
 * - InMemoryRuntime: a virtual file tree held in memory
 */

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur during runtime operations
#[derive(Debug)]
pub enum RuntimeError {
    /// Standard I/O error
    Io(io::Error),

    /// A wildcard pattern could not be parsed
    InvalidPattern {
        /// The pattern as given
        pattern: String,
        /// Why it was rejected
        message: String,
    },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::Io(e) => write!(f, "I/O error: {}", e),
            RuntimeError::InvalidPattern { pattern, message } => {
                write!(f, "Invalid pattern `{}`: {}", pattern, message)
            }
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuntimeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RuntimeError {
    fn from(e: io::Error) -> Self {
        RuntimeError::Io(e)
    }
}

impl RuntimeError {
    /// Whether this error means the path simply does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, RuntimeError::Io(e) if e.kind() == io::ErrorKind::NotFound)
    }
}

/// Type of filesystem path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Regular file
    File,
    /// Directory
    Directory,
}

/// Trait defining the filesystem operations the compiler needs.
///
/// Every method that may block on the filesystem is `async`; these are the
/// only suspension points of a compilation. Implementations must not
/// reorder or cache results in ways that change what a later call observes.
#[async_trait]
pub trait SystemRuntime: Send + Sync {
    // ═══════════════════════════════════════════════════════════════════════
    // FILE OPERATIONS
    // ═══════════════════════════════════════════════════════════════════════

    /// Read entire file contents as bytes.
    async fn file_read(&self, path: &Path) -> RuntimeResult<Vec<u8>>;

    /// Read file as string with UTF-8 encoding.
    ///
    /// Default implementation reads bytes and converts to string.
    async fn file_read_string(&self, path: &Path) -> RuntimeResult<String> {
        let bytes = self.file_read(path).await?;
        String::from_utf8(bytes).map_err(|e| {
            RuntimeError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid UTF-8 in file: {}", e),
            ))
        })
    }

    /// Write bytes to a file, creating or truncating it.
    async fn file_write(&self, path: &Path, contents: &[u8]) -> RuntimeResult<()>;

    /// Check whether a path exists, optionally requiring a specific kind.
    async fn path_exists(&self, path: &Path, kind: Option<PathKind>) -> RuntimeResult<bool>;

    /// Check if path is a regular file.
    async fn is_file(&self, path: &Path) -> RuntimeResult<bool> {
        self.path_exists(path, Some(PathKind::File)).await
    }

    // ═══════════════════════════════════════════════════════════════════════
    // DIRECTORY OPERATIONS
    // ═══════════════════════════════════════════════════════════════════════

    /// Expand a wildcard pattern relative to `base` into the paths that match it.
    ///
    /// `base` is taken literally; only `pattern` may contain wildcards. The
    /// result order is whatever the implementation's directory listing
    /// yields; callers must not assume any particular sorting.
    async fn glob(&self, base: &Path, pattern: &str) -> RuntimeResult<Vec<PathBuf>>;

    /// Get the current working directory.
    fn cwd(&self) -> RuntimeResult<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_error_display() {
        let err = RuntimeError::InvalidPattern {
            pattern: "a[".to_string(),
            message: "invalid range pattern".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid pattern `a[`: invalid range pattern");
    }

    #[test]
    fn test_not_found_detection() {
        let err = RuntimeError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(err.is_not_found());
        assert!(std::error::Error::source(&err).is_some());

        let err = RuntimeError::from(io::Error::new(io::ErrorKind::PermissionDenied, "no"));
        assert!(!err.is_not_found());
    }
}
