/*
 * concat-system-runtime
 * Copyright (c) 2025 Posit, PBC
 *
 * Runtime abstraction layer for concat filesystem operations.
 *
 * The compiler never touches std::fs directly. All existence checks,
 * reads and wildcard expansion go through the SystemRuntime trait, so the
 * same resolution logic runs against:
 *
 * - NativeRuntime: the local filesystem (default)
 * - InMemoryRuntime: a virtual file tree (tests, embedders holding sources in memory)
 */

mod memory;
mod native;
mod traits;

// Re-export core types (API surface)
pub use traits::{PathKind, RuntimeError, RuntimeResult, SystemRuntime};

// Re-export runtime implementations
pub use memory::InMemoryRuntime;
pub use native::NativeRuntime;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_runtime_has_absolute_cwd() {
        let rt = NativeRuntime::new();
        let cwd = rt.cwd().unwrap();
        assert!(cwd.is_absolute());
    }
}
