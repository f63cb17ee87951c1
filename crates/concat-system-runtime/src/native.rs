/*
 * native.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * NativeRuntime implementation backed by std::fs.
 */

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::traits::{PathKind, RuntimeError, RuntimeResult, SystemRuntime};

/// Runtime with direct access to the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct NativeRuntime;

impl NativeRuntime {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SystemRuntime for NativeRuntime {
    async fn file_read(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        Ok(std::fs::read(path)?)
    }

    async fn file_write(&self, path: &Path, contents: &[u8]) -> RuntimeResult<()> {
        Ok(std::fs::write(path, contents)?)
    }

    async fn path_exists(&self, path: &Path, kind: Option<PathKind>) -> RuntimeResult<bool> {
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        Ok(match kind {
            None => true,
            Some(PathKind::File) => metadata.is_file(),
            Some(PathKind::Directory) => metadata.is_dir(),
        })
    }

    async fn glob(&self, base: &Path, pattern: &str) -> RuntimeResult<Vec<PathBuf>> {
        // Absolute patterns ignore the base, like `Path::join`
        let full = if Path::new(pattern).is_absolute() {
            pattern.to_string()
        } else {
            format!("{}/{}", glob::Pattern::escape(&base.to_string_lossy()), pattern)
        };
        let paths = glob::glob(&full).map_err(|e| RuntimeError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.msg.to_string(),
        })?;

        let mut matches = Vec::new();
        for entry in paths {
            match entry {
                Ok(path) => matches.push(path),
                // Unreadable directories are skipped, like a shell would
                Err(e) => tracing::debug!(path = %e.path().display(), error = %e.error(), "Skipping unreadable glob entry"),
            }
        }
        Ok(matches)
    }

    fn cwd(&self) -> RuntimeResult<PathBuf> {
        Ok(std::env::current_dir()?)
    }
}
