//! Command implementations for the concat CLI
//!
//! The CLI only maps flags onto options and writes files; everything else
//! is delegated to concat-core.

pub mod compile;
