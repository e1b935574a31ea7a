//! Test utilities for docweave
//!
//! This crate provides shared testing utilities used across the docweave workspace.

pub mod fixtures;
pub mod mock;

pub use fixtures::*;
pub use mock::{get_shared_mock_server, shared_mock_url, SHARED_MOCK_SERVER};

use tempfile::TempDir;

/// Creates a temporary directory within `.tmp/` at the project root
///
/// All test artifacts land in a single gitignored location that is easy to
/// clean up by hand.
///
/// # Panics
///
/// Panics if the current directory cannot be determined or `.tmp/` cannot be
/// created.
///
/// # Examples
///
/// ```rust
/// use docweave_testkit::temp_dir_in_workspace;
///
/// let temp = temp_dir_in_workspace();
/// let file_path = temp.path().join("letter.docx.json");
/// std::fs::write(&file_path, "{}").unwrap();
/// // Cleanup happens automatically when temp is dropped
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Alternative with Result for non-test code
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let workspace_root = std::env::current_dir()?;
    let tmp_base = workspace_root.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}
