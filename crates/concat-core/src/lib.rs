//! Directive-driven source concatenation
//!
//! Scripts name other files in `//@prepend` and `//@append` comments. This
//! crate resolves those directives recursively, inlines the referenced files
//! around the file that names them, and optionally composes a source map
//! that traces every output line back to its original file, through any maps
//! the included files already carry.
//!
//! # Architecture
//!
//! - [`directive`] - scans source text for directives
//! - [`resolver`] - turns an include spec into files; rejects self and cyclic inclusion
//! - [`tree`] - loads included files (and their adjacent `.map`) into an [`IncludeNode`] tree
//! - [`join`] - flattens units into code and a composed map
//!
//! All file access goes through [`concat_system_runtime::SystemRuntime`].
//!
//! # Example
//!
//! ```
//! use concat_core::{CompileOptions, compile_with_runtime};
//! use concat_system_runtime::InMemoryRuntime;
//!
//! let runtime = InMemoryRuntime::with_cwd("/project")
//!     .with_file("/project/a.js", "console.log(0);")
//!     .with_file("/project/b.js", "console.log(2);");
//!
//! let main = "//@prepend a.js\nconsole.log(1);\n//@append b.js";
//! let options = CompileOptions::new("main.js", "dist/main.js");
//! let output = pollster::block_on(compile_with_runtime(main, &options, &runtime)).unwrap();
//!
//! assert_eq!(output.code, "console.log(0);\nconsole.log(1);\nconsole.log(2);");
//! assert!(output.map.is_none());
//! ```

pub mod compile;
pub mod directive;
pub mod error;
pub mod join;
pub mod options;
pub mod resolver;
pub mod tree;

pub use compile::{CompileOutput, compile, compile_with_runtime};
pub use directive::{Directive, DirectiveKind, scan_directives};
pub use error::{CompileError, ErrorKind, ErrorLocation, Result};
pub use join::{JoinOptions, JoinedOutput, OutputPosition};
pub use options::{CompileOptions, DEFAULT_EXTENSION, InputSourceMap, MAP_SUFFIX};
pub use resolver::Resolver;
pub use tree::{IncludeNode, SourceUnit, TreeBuilder};
