/*
 * resolver.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Turns an include spec into concrete file paths.
 *
 * Literal specs are looked up through a short list of candidate names
 * (`name`, `name.js`, `_name`, `_name.js`); specs containing `*` are
 * expanded by the runtime. Every resolved path is checked against the
 * including file and its ancestors before anything is read, so a cycle is
 * reported instead of recursed into.
 */

use std::path::{Path, PathBuf};

use concat_system_runtime::{RuntimeError, SystemRuntime};
use concat_util::{normalize_path, relative_path, to_slash};

use crate::error::{CompileError, ErrorKind, Result};

/// Resolves the include specs found in one file
pub struct Resolver<'a> {
    runtime: &'a dyn SystemRuntime,
    /// The including file
    file: &'a Path,
    base_dir: PathBuf,
    root_dir: &'a Path,
    ancestors: &'a [PathBuf],
    extension: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(
        runtime: &'a dyn SystemRuntime,
        file: &'a Path,
        root_dir: &'a Path,
        ancestors: &'a [PathBuf],
        extension: &'a str,
    ) -> Self {
        let base_dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
        Self {
            runtime,
            file,
            base_dir,
            root_dir,
            ancestors,
            extension,
        }
    }

    /// Resolve the spec of the directive on `line`.
    ///
    /// Errors are located at this file and line.
    pub async fn resolve(&self, spec: &str, line: usize) -> Result<Vec<PathBuf>> {
        self.resolve_paths(spec)
            .await
            .map_err(|e| e.at(self.file, line))
    }

    async fn resolve_paths(&self, spec: &str) -> Result<Vec<PathBuf>> {
        let paths = if is_glob(spec) {
            self.expand_glob(spec).await?
        } else {
            vec![self.find_candidate(spec).await?]
        };
        self.check_inclusion(&paths)?;
        Ok(paths)
    }

    async fn expand_glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let matches = self
            .runtime
            .glob(&self.base_dir, pattern)
            .await
            .map_err(|source| match source {
                RuntimeError::InvalidPattern { .. } => ErrorKind::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                },
                other => ErrorKind::Runtime(other),
            })?;

        // Listing order is kept as the runtime returned it
        let paths: Vec<PathBuf> = matches
            .into_iter()
            .filter(|path| path.extension().is_some_and(|ext| ext == self.extension))
            .map(|path| normalize_path(&path))
            .collect();

        if paths.is_empty() {
            return Err(ErrorKind::GlobNoMatch {
                pattern: pattern.to_string(),
            }
            .into());
        }
        tracing::debug!(pattern, count = paths.len(), "Expanded include pattern");
        Ok(paths)
    }

    async fn find_candidate(&self, spec: &str) -> Result<PathBuf> {
        for candidate in candidate_paths(&self.base_dir, spec, self.extension) {
            if self
                .runtime
                .is_file(&candidate)
                .await
                .map_err(ErrorKind::Runtime)?
            {
                tracing::debug!(spec, path = %candidate.display(), "Resolved include");
                return Ok(candidate);
            }
        }
        Err(ErrorKind::FileNotFound {
            spec: spec.to_string(),
        }
        .into())
    }

    fn check_inclusion(&self, paths: &[PathBuf]) -> Result<()> {
        if let Some(path) = paths.iter().find(|path| path.as_path() == self.file) {
            return Err(CompileError::from(ErrorKind::SelfInclusion {
                file: self.display(path),
            }));
        }
        if let Some(path) = paths.iter().find(|path| self.ancestors.contains(path)) {
            return Err(CompileError::from(ErrorKind::CyclicInclusion {
                file: self.display(self.file),
                parent: self.display(path),
            }));
        }
        Ok(())
    }

    fn display(&self, path: &Path) -> String {
        to_slash(&relative_path(self.root_dir, path))
    }
}

/// Whether a spec is a wildcard pattern rather than a file name.
///
/// Only `*` makes a pattern; `?` and `[` are ordinary file name characters
/// here.
pub fn is_glob(spec: &str) -> bool {
    spec.contains('*')
}

/// Candidate paths for a literal spec, in lookup order, without duplicates.
pub fn candidate_paths(base_dir: &Path, spec: &str, extension: &str) -> Vec<PathBuf> {
    let spec_path = Path::new(spec);
    let Some(name) = spec_path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return vec![normalize_path(&base_dir.join(spec_path))];
    };
    let dir = base_dir.join(spec_path.parent().unwrap_or_else(|| Path::new("")));

    let suffix = format!(".{}", extension);
    let with_extension = |name: &str| {
        if name.ends_with(&suffix) {
            name.to_string()
        } else {
            format!("{}{}", name, suffix)
        }
    };
    let partial = format!("_{}", name);

    let mut candidates: Vec<PathBuf> = Vec::with_capacity(4);
    for candidate in [
        name.clone(),
        with_extension(&name),
        partial.clone(),
        with_extension(&partial),
    ] {
        let path = normalize_path(&dir.join(candidate));
        if !candidates.contains(&path) {
            candidates.push(path);
        }
    }
    candidates
}
