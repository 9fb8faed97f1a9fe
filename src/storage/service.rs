//! Receipt service
//!
//! The two operations the controller calls: `validate_file` then `upload`.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ValidationError;
use crate::storage::results::StoredFile;
use crate::storage::submission::Submission;
use crate::storage::validation;
use crate::storage::writer::StorageWriter;
use crate::utils::DiagnosticSink;

#[derive(Clone)]
pub struct ReceiptService {
    writer: StorageWriter,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl ReceiptService {
    pub fn new(upload_directory: impl Into<PathBuf>, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            writer: StorageWriter::new(upload_directory, Arc::clone(&diagnostics)),
            diagnostics,
        }
    }

    pub fn validate_file(&self, submission: Option<&Submission>) -> Result<(), ValidationError> {
        validation::validate_file(submission, self.diagnostics.as_ref())
    }

    pub fn upload(&self, submission: &Submission) -> Result<StoredFile, ValidationError> {
        self.writer.store(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MemorySink;
    use std::fs;

    #[test]
    fn test_rejected_submission_is_never_stored() {
        let temp_dir = tempfile::tempdir().unwrap();
        let upload_dir = tempfile::tempdir().unwrap();
        let service = ReceiptService::new(upload_dir.path(), Arc::new(MemorySink::new()));

        let temp = temp_dir.path().join("incoming");
        fs::write(&temp, b"hello").unwrap();
        let sub = Submission::new("notes.txt", "text/plain", 5, &temp);

        let result = service
            .validate_file(Some(&sub))
            .and_then(|_| service.upload(&sub).map(|_| ()));
        assert!(result.is_err());
        assert!(temp.exists());
        assert_eq!(fs::read_dir(upload_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_accepted_submission_is_stored() {
        let temp_dir = tempfile::tempdir().unwrap();
        let upload_dir = tempfile::tempdir().unwrap();
        let service = ReceiptService::new(upload_dir.path(), Arc::new(MemorySink::new()));

        let temp = temp_dir.path().join("incoming");
        fs::write(&temp, b"%PDF-1.7").unwrap();
        let sub = Submission::new("March receipt.pdf", "application/pdf", 8, &temp);

        service.validate_file(Some(&sub)).unwrap();
        let stored = service.upload(&sub).unwrap();
        assert!(stored.file_name.ends_with(".pdf"));
        assert_eq!(stored.path.parent().unwrap(), upload_dir.path());
    }
}
