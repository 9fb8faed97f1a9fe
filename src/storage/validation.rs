//! Receipt intake validation
//!
//! Checks a submission's transfer status, size, name and declared type.
//! The first failing check wins.

use log::Level;
use regex::Regex;
use std::sync::LazyLock;

use crate::error::ValidationError;
use crate::storage::submission::Submission;
use crate::utils::DiagnosticSink;

/// Byte ceiling for a receipt, 3 * 1024 * 1024.
pub const MAX_RECEIPT_BYTES: u64 = 3 * 1024 * 1024;

/// Declared content types accepted for receipts (exact, case-sensitive)
pub const ALLOWED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "application/pdf"];

pub const MSG_UPLOAD_FAILED: &str = "Failed to upload file";
pub const MSG_TOO_LARGE: &str = "File upload is too large";
pub const MSG_INVALID_FILENAME: &str = "Invalid filename";
pub const MSG_INVALID_TYPE: &str = "Invalid file type";

static FILENAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9 ._-]+$").expect("invalid receipt filename pattern")
});

/// Whether `name` consists only of ASCII letters, digits, space, `.`, `_`, `-`
pub fn is_valid_filename(name: &str) -> bool {
    FILENAME_PATTERN.is_match(name)
}

/// Whether `mime_type` is on the receipt allow-list
pub fn is_allowed_mime_type(mime_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime_type)
}

/// Validate a submitted receipt.
///
/// The declared MIME type is trusted as sent; file bytes are not sniffed.
pub fn validate_file(
    submission: Option<&Submission>,
    diagnostics: &dyn DiagnosticSink,
) -> Result<(), ValidationError> {
    diagnostics.record(
        Level::Debug,
        &format!("Uploaded file details: {:?}", submission),
    );

    let submission = match submission {
        Some(sub) if sub.transfer_status.is_ok() => sub,
        Some(sub) => {
            diagnostics.record(
                Level::Warn,
                &format!("File upload error: {}", sub.transfer_status),
            );
            return Err(ValidationError::receipt(MSG_UPLOAD_FAILED));
        }
        None => {
            diagnostics.record(Level::Warn, "File upload error: No file received");
            return Err(ValidationError::receipt(MSG_UPLOAD_FAILED));
        }
    };

    if submission.size_bytes > MAX_RECEIPT_BYTES {
        diagnostics.record(
            Level::Warn,
            &format!("File too large: {} bytes", submission.size_bytes),
        );
        return Err(ValidationError::receipt(MSG_TOO_LARGE));
    }

    if !is_valid_filename(&submission.declared_name) {
        diagnostics.record(
            Level::Warn,
            &format!("Invalid filename: {}", submission.declared_name),
        );
        return Err(ValidationError::receipt(MSG_INVALID_FILENAME));
    }

    if !is_allowed_mime_type(&submission.declared_mime_type) {
        diagnostics.record(
            Level::Warn,
            &format!("Invalid file type: {}", submission.declared_mime_type),
        );
        return Err(ValidationError::receipt(MSG_INVALID_TYPE));
    }

    Ok(())
}
