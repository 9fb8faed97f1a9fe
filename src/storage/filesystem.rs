//! File system operations
//!
//! Directory checks and the move that hands a temporary upload over to
//! permanent storage.

use log::warn;
use std::fs;
use std::io::{self, Result};
use std::path::{Path, PathBuf};

/// Create a directory
pub fn create_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
}

/// Check if file exists
pub fn file_exists(path: &Path) -> bool {
    path.exists() && path.is_file()
}

/// Check if directory exists
pub fn directory_exists(path: &Path) -> bool {
    path.exists() && path.is_dir()
}

/// Move `source` to `destination`, consuming the source.
///
/// Tries a rename first. When that fails (e.g. the paths sit on different
/// filesystems) the content is copied into place via a staging file, so
/// `destination` never holds a partial copy.
pub fn move_file(source: &Path, destination: &Path) -> Result<()> {
    if !file_exists(source) {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("source is not a regular file: {}", source.display()),
        ));
    }

    let rename_error = match fs::rename(source, destination) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };
    warn!(
        "Rename of {} to {} failed, falling back to copy: {}",
        source.display(),
        destination.display(),
        rename_error
    );

    copy_into_place(source, destination).map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("rename failed ({rename_error}), copy failed ({e})"),
        )
    })
}

/// Staging name beside `destination`, in the same directory
fn staging_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    destination.with_file_name(format!(".{name}.partial"))
}

/// Copy `source` to a staging file, rename it onto `destination`, then
/// remove `source`. Nothing is left behind on failure.
fn copy_into_place(source: &Path, destination: &Path) -> Result<()> {
    let staging = staging_path(destination);

    if let Err(e) = fs::copy(source, &staging).and_then(|_| fs::rename(&staging, destination)) {
        let _ = fs::remove_file(&staging);
        return Err(e);
    }

    if let Err(e) = fs::remove_file(source) {
        let _ = fs::remove_file(destination);
        return Err(e);
    }

    Ok(())
}
