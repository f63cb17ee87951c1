//! Position maps for concat
//!
//! This crate implements the Source Map v3 wire format used to relate
//! concatenated output back to the files it was assembled from. The
//! compiler in `concat-core` only calls into it; it never touches the
//! encoded `mappings` string directly.
//!
//! # Overview
//!
//! The core types are:
//! - [`SourceMap`]: The serialized map, as read from and written to `.map` files
//! - [`SourceMapConsumer`]: A decoded lookup table for one map
//! - [`SourceMapBuilder`]: Collects mappings and produces a new [`SourceMap`]
//!
//! # Example
//!
//! ```rust
//! use concat_source_map::*;
//!
//! let mut builder = SourceMapBuilder::new();
//! builder.add_mapping(0, 0, "src/a.js", 4, 2);
//! let map = builder.build("bundle.js");
//!
//! let consumer = SourceMapConsumer::new(&map).unwrap();
//! let mapping = consumer.mapping_at(0, 0).unwrap();
//! assert_eq!(consumer.source(mapping.source), Some("src/a.js"));
//! assert_eq!(mapping.original_line, 4);
//! ```

pub mod builder;
pub mod consumer;
pub mod error;
pub mod map;
pub mod vlq;

pub use builder::SourceMapBuilder;
pub use consumer::{DecodedMapping, SourceMapConsumer};
pub use error::SourceMapError;
pub use map::SourceMap;
