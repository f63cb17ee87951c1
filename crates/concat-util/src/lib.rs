//! Shared utilities for concat

pub mod paths;
pub mod version;

pub use paths::{absolutize, normalize_path, relative_path, to_slash};
pub use version::cli_version;
