//! Version handling for concat
//!
//! Builds without an explicit release version report themselves as
//! development builds.

/// Get the version string that should be reported by the CLI
///
/// Release builds set `CONCAT_CLI_VERSION` at compile time; everything else
/// reports the crate version with a `-dev` suffix.
pub fn cli_version() -> &'static str {
    match option_env!("CONCAT_CLI_VERSION") {
        Some(version) => version,
        None => concat!(env!("CARGO_PKG_VERSION"), "-dev"),
    }
}
