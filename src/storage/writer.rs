//! Storage writer
//!
//! Moves validated receipts into the upload directory under random names.

use log::Level;
use rand::Rng;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ValidationError;
use crate::storage::filesystem::{directory_exists, move_file};
use crate::storage::permissions::is_writable;
use crate::storage::results::StoredFile;
use crate::storage::submission::Submission;
use crate::utils::DiagnosticSink;

pub const MSG_DIRECTORY_MISSING: &str = "Upload directory is missing";
pub const MSG_DIRECTORY_NOT_WRITABLE: &str = "Upload directory is not writable";
pub const MSG_MOVE_FAILED: &str = "Failed to upload file";

/// Random bytes behind each stored name (hex-encoded to 32 chars)
const RANDOM_NAME_BYTES: usize = 16;

/// Build `<32 hex>.<extension>` from a fresh CSPRNG draw.
///
/// The dot is always present, so an extensionless name yields `<hex>.`.
pub fn generate_filename(extension: &str) -> String {
    let mut bytes = [0u8; RANDOM_NAME_BYTES];
    rand::rng().fill(&mut bytes);
    format!("{}.{}", hex::encode(bytes), extension)
}

/// Persists submissions into a single flat upload directory.
#[derive(Clone)]
pub struct StorageWriter {
    upload_directory: PathBuf,
    diagnostics: Arc<dyn DiagnosticSink>,
    writable: fn(&Path) -> bool,
}

impl StorageWriter {
    pub fn new(upload_directory: impl Into<PathBuf>, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            upload_directory: upload_directory.into(),
            diagnostics,
            writable: is_writable,
        }
    }

    /// Replace the writability check, for directories whose permissions a
    /// privileged test process would ignore.
    #[cfg(test)]
    fn with_writable_check(mut self, check: fn(&Path) -> bool) -> Self {
        self.writable = check;
        self
    }

    /// Move the submission's temporary content into the upload directory.
    ///
    /// The declared name only contributes its extension; the stored name is
    /// random. Each call draws a new name, so storing twice never overwrites.
    pub fn store(&self, submission: &Submission) -> Result<StoredFile, ValidationError> {
        let file_name = generate_filename(submission.extension());
        let destination = self.upload_directory.join(&file_name);

        if !directory_exists(&self.upload_directory) {
            self.diagnostics.record(
                Level::Error,
                &format!(
                    "Upload directory does not exist: {}",
                    self.upload_directory.display()
                ),
            );
            return Err(ValidationError::receipt(MSG_DIRECTORY_MISSING));
        }

        if !(self.writable)(&self.upload_directory) {
            self.diagnostics.record(
                Level::Error,
                &format!(
                    "Upload directory is not writable: {}",
                    self.upload_directory.display()
                ),
            );
            return Err(ValidationError::receipt(MSG_DIRECTORY_NOT_WRITABLE));
        }

        if let Err(e) = move_file(&submission.temporary_location, &destination) {
            self.diagnostics.record(
                Level::Error,
                &format!(
                    "Failed to move uploaded file. Temp file: {} ({})",
                    submission.temporary_location.display(),
                    e
                ),
            );
            self.diagnostics.record(
                Level::Error,
                &format!("Destination path: {}", destination.display()),
            );
            return Err(ValidationError::receipt(MSG_MOVE_FAILED));
        }

        self.diagnostics.record(
            Level::Info,
            &format!("File successfully uploaded to: {}", destination.display()),
        );

        Ok(StoredFile {
            path: destination,
            file_name,
        })
    }
}
