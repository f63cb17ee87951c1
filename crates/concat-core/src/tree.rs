/*
 * tree.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Builds the inclusion tree for a root file.
 */

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use concat_source_map::SourceMap;
use concat_system_runtime::SystemRuntime;
use concat_util::{relative_path, to_slash};

use crate::directive::{DirectiveKind, scan_directives};
use crate::error::{CompileError, ErrorKind, Result};
use crate::options::MAP_SUFFIX;
use crate::resolver::Resolver;

/// One loaded file, immutable once built
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// Absolute, normalized
    pub path: PathBuf,
    pub code: String,
    pub input_map: Option<SourceMap>,
    /// Files that transitively included this one, outermost first
    pub ancestors: Vec<PathBuf>,
}

/// A unit with the subtrees its directives pulled in
#[derive(Debug, Clone)]
pub struct IncludeNode {
    pub unit: SourceUnit,
    /// In directive order
    pub prepends: Vec<IncludeNode>,
    /// In directive order
    pub appends: Vec<IncludeNode>,
}

impl IncludeNode {
    /// Emission order: prepended subtrees, this unit, appended subtrees.
    pub fn flatten(self) -> Vec<SourceUnit> {
        let mut units = Vec::new();
        self.flatten_into(&mut units);
        units
    }

    fn flatten_into(self, units: &mut Vec<SourceUnit>) {
        for child in self.prepends {
            child.flatten_into(units);
        }
        units.push(self.unit);
        for child in self.appends {
            child.flatten_into(units);
        }
    }
}

type NodeFuture<'b> = Pin<Box<dyn Future<Output = Result<IncludeNode>> + Send + 'b>>;

/// Loads included files through a runtime and assembles the tree
pub struct TreeBuilder<'a> {
    runtime: &'a dyn SystemRuntime,
    root_dir: PathBuf,
    extension: String,
    read_maps: bool,
}

impl<'a> TreeBuilder<'a> {
    /// `read_maps` controls whether `<file>.map` is loaded for included files.
    pub fn new(
        runtime: &'a dyn SystemRuntime,
        root_dir: PathBuf,
        extension: String,
        read_maps: bool,
    ) -> Self {
        Self {
            runtime,
            root_dir,
            extension,
            read_maps,
        }
    }

    /// Build the tree below a unit whose content is already loaded.
    ///
    /// For the compilation root `ancestors` is empty and `input_map` is
    /// whatever the caller supplied.
    pub async fn build(
        &self,
        path: PathBuf,
        code: String,
        input_map: Option<SourceMap>,
        ancestors: Vec<PathBuf>,
    ) -> Result<IncludeNode> {
        self.build_node(SourceUnit {
            path,
            code,
            input_map,
            ancestors,
        })
        .await
    }

    fn build_node<'b>(&'b self, unit: SourceUnit) -> NodeFuture<'b> {
        Box::pin(async move {
            let directives = scan_directives(&unit.code);

            let mut prepend_targets = Vec::new();
            let mut append_targets = Vec::new();
            {
                let resolver = Resolver::new(
                    self.runtime,
                    &unit.path,
                    &self.root_dir,
                    &unit.ancestors,
                    &self.extension,
                );
                for kind in [DirectiveKind::Prepend, DirectiveKind::Append] {
                    for directive in directives.iter().filter(|d| d.kind == kind) {
                        let paths = resolver.resolve(&directive.target, directive.line).await?;
                        let targets = match kind {
                            DirectiveKind::Prepend => &mut prepend_targets,
                            DirectiveKind::Append => &mut append_targets,
                        };
                        targets.extend(paths.into_iter().map(|path| (path, directive.line)));
                    }
                }
            }

            let mut child_ancestors = unit.ancestors.clone();
            child_ancestors.push(unit.path.clone());

            let mut prepends = Vec::with_capacity(prepend_targets.len());
            for (path, line) in prepend_targets {
                let child = self
                    .load_unit(&unit.path, path, line, child_ancestors.clone())
                    .await?;
                prepends.push(self.build_node(child).await?);
            }

            let mut appends = Vec::with_capacity(append_targets.len());
            for (path, line) in append_targets {
                let child = self
                    .load_unit(&unit.path, path, line, child_ancestors.clone())
                    .await?;
                appends.push(self.build_node(child).await?);
            }

            Ok(IncludeNode {
                unit,
                prepends,
                appends,
            })
        })
    }

    async fn load_unit(
        &self,
        includer: &Path,
        path: PathBuf,
        line: usize,
        ancestors: Vec<PathBuf>,
    ) -> Result<SourceUnit> {
        let code = self
            .runtime
            .file_read_string(&path)
            .await
            .map_err(|source| {
                CompileError::from(ErrorKind::ReadFailure {
                    path: to_slash(&relative_path(&self.root_dir, &path)),
                    source,
                })
                .at(includer, line)
            })?;

        let input_map = if self.read_maps {
            self.load_adjacent_map(&path).await
        } else {
            None
        };

        Ok(SourceUnit {
            path,
            code,
            input_map,
            ancestors,
        })
    }

    /// A missing or unreadable map means "no map"; so does a broken one.
    async fn load_adjacent_map(&self, path: &Path) -> Option<SourceMap> {
        let map_path = adjacent_map_path(path);
        let json = match self.runtime.file_read_string(&map_path).await {
            Ok(json) => json,
            Err(e) => {
                if !e.is_not_found() {
                    tracing::debug!(path = %map_path.display(), error = %e, "Skipping unreadable source map");
                }
                return None;
            }
        };

        match SourceMap::from_json(&json) {
            Ok(map) => {
                tracing::debug!(path = %map_path.display(), "Loaded adjacent source map");
                Some(map)
            }
            Err(e) => {
                tracing::warn!(path = %map_path.display(), error = %e, "Ignoring invalid source map");
                None
            }
        }
    }
}

/// `lib.js` -> `lib.js.map`
pub fn adjacent_map_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(MAP_SUFFIX);
    PathBuf::from(name)
}
