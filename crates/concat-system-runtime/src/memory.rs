/*
 * memory.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * InMemoryRuntime: a virtual file tree for embedders and tests.
 *
 * Files live in a map keyed by normalized absolute path. Directories are
 * implied by the files beneath them. Every read is recorded so callers can
 * check which files a compilation touched.
 */

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, RwLock};

use crate::traits::{PathKind, RuntimeError, RuntimeResult, SystemRuntime};

/// Runtime over an in-memory file tree.
#[derive(Debug)]
pub struct InMemoryRuntime {
    cwd: PathBuf,
    files: RwLock<BTreeMap<PathBuf, Vec<u8>>>,
    reads: Mutex<Vec<PathBuf>>,
}

impl InMemoryRuntime {
    /// Create an empty file tree whose working directory is `/`.
    pub fn new() -> Self {
        Self::with_cwd("/")
    }

    /// Create an empty file tree with the given working directory.
    pub fn with_cwd(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            files: RwLock::new(BTreeMap::new()),
            reads: Mutex::new(Vec::new()),
        }
    }

    /// Add (or replace) a file. Relative paths are taken from the working directory.
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let path = self.normalize(path.as_ref());
        if let Ok(mut files) = self.files.write() {
            files.insert(path, contents.into());
        }
    }

    /// Builder-style variant of [`InMemoryRuntime::add_file`].
    pub fn with_file(self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        self.add_file(path, contents);
        self
    }

    /// Paths passed to `file_read`, in call order.
    pub fn reads(&self) -> Vec<PathBuf> {
        self.reads.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn normalize(&self, path: &Path) -> PathBuf {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        };
        let mut normalized = PathBuf::new();
        for component in absolute.components() {
            match component {
                Component::ParentDir => {
                    normalized.pop();
                }
                Component::CurDir => {}
                other => normalized.push(other),
            }
        }
        normalized
    }

    fn poisoned() -> RuntimeError {
        RuntimeError::Io(io::Error::other("in-memory file tree lock poisoned"))
    }
}

impl Default for InMemoryRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SystemRuntime for InMemoryRuntime {
    async fn file_read(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        let path = self.normalize(path);
        if let Ok(mut reads) = self.reads.lock() {
            reads.push(path.clone());
        }
        let files = self.files.read().map_err(|_| Self::poisoned())?;
        files.get(&path).cloned().ok_or_else(|| {
            RuntimeError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("No such file: {}", path.display()),
            ))
        })
    }

    async fn file_write(&self, path: &Path, contents: &[u8]) -> RuntimeResult<()> {
        let path = self.normalize(path);
        let mut files = self.files.write().map_err(|_| Self::poisoned())?;
        files.insert(path, contents.to_vec());
        Ok(())
    }

    async fn path_exists(&self, path: &Path, kind: Option<PathKind>) -> RuntimeResult<bool> {
        let path = self.normalize(path);
        let files = self.files.read().map_err(|_| Self::poisoned())?;
        let is_file = files.contains_key(&path);
        let is_dir = || files.keys().any(|f| f != &path && f.starts_with(&path));
        Ok(match kind {
            None => is_file || is_dir(),
            Some(PathKind::File) => is_file,
            Some(PathKind::Directory) => !is_file && is_dir(),
        })
    }

    async fn glob(&self, base: &Path, pattern: &str) -> RuntimeResult<Vec<PathBuf>> {
        let (mut base, mut rest) = if Path::new(pattern).is_absolute() {
            (PathBuf::from("/"), pattern.trim_start_matches('/'))
        } else {
            (self.normalize(base), pattern)
        };
        // Fold leading `./` and `../` into the literal base
        loop {
            if let Some(stripped) = rest.strip_prefix("../") {
                base.pop();
                rest = stripped;
            } else if let Some(stripped) = rest.strip_prefix("./") {
                rest = stripped;
            } else {
                break;
            }
        }
        let full = format!(
            "{}/{}",
            glob::Pattern::escape(&base.to_string_lossy()).trim_end_matches('/'),
            rest
        );
        let compiled = glob::Pattern::new(&full).map_err(|e| RuntimeError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.msg.to_string(),
        })?;
        let options = glob::MatchOptions {
            require_literal_separator: true,
            ..glob::MatchOptions::new()
        };

        let files = self.files.read().map_err(|_| Self::poisoned())?;
        Ok(files
            .keys()
            .filter(|path| compiled.matches_path_with(path, options))
            .cloned()
            .collect())
    }

    fn cwd(&self) -> RuntimeResult<PathBuf> {
        Ok(self.cwd.clone())
    }
}
