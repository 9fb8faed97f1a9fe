//! Directory permissions
//!
//! Writability is checked by creating and removing a scratch file.

use std::fs::{self, OpenOptions};
use std::path::Path;

/// Check if a directory accepts new files
pub fn is_writable(dir: &Path) -> bool {
    let scratch = dir.join(format!(".write-check-{}", hex::encode(rand::random::<[u8; 8]>())));

    match OpenOptions::new().write(true).create_new(true).open(&scratch) {
        Ok(file) => {
            drop(file);
            let _ = fs::remove_file(&scratch);
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_directory_is_writable_and_scratch_removed() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_writable(dir.path()));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_directory_is_not_writable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_writable(&dir.path().join("nope")));
    }
}
