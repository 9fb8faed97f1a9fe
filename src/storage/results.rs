//! Storage result types
//!
//! Defines result structures returned by storage operations.

use std::path::PathBuf;

/// A receipt persisted under its generated name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Full destination path inside the upload directory
    pub path: PathBuf,
    /// Generated `<32 hex>.<ext>` name
    pub file_name: String,
}
