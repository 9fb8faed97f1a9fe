//! Submitted receipt files as handed over by the transport layer.

use std::fmt;
use std::path::PathBuf;

/// Outcome of moving the request body into temporary storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    Ok,
    /// Body exceeded the transport's own size limit
    IniSize,
    /// Body exceeded the limit declared by the submitting form
    FormSize,
    /// Connection ended before the declared size was received
    Partial,
    /// No file content was sent
    NoFile,
    /// Temporary directory is missing
    NoTmpDir,
    /// Temporary file could not be written
    CantWrite,
    /// Transfer stopped by a transport hook
    Extension,
}

impl TransferStatus {
    /// Numeric status code, stable across releases
    pub fn code(self) -> u8 {
        match self {
            TransferStatus::Ok => 0,
            TransferStatus::IniSize => 1,
            TransferStatus::FormSize => 2,
            TransferStatus::Partial => 3,
            TransferStatus::NoFile => 4,
            TransferStatus::NoTmpDir => 6,
            TransferStatus::CantWrite => 7,
            TransferStatus::Extension => 8,
        }
    }

    pub fn is_ok(self) -> bool {
        self == TransferStatus::Ok
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferStatus::Ok => "ok",
            TransferStatus::IniSize => "exceeds transport size limit",
            TransferStatus::FormSize => "exceeds form size limit",
            TransferStatus::Partial => "partially received",
            TransferStatus::NoFile => "no file received",
            TransferStatus::NoTmpDir => "temporary directory missing",
            TransferStatus::CantWrite => "cannot write temporary file",
            TransferStatus::Extension => "stopped by extension",
        };
        write!(f, "{} ({})", self.code(), name)
    }
}

/// One uploaded file, request-scoped.
///
/// `declared_name` and `declared_mime_type` are client supplied and
/// untrusted. `temporary_location` belongs to the transport until the
/// storage writer moves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub transfer_status: TransferStatus,
    pub declared_name: String,
    pub declared_mime_type: String,
    pub size_bytes: u64,
    pub temporary_location: PathBuf,
}

impl Submission {
    pub fn new(
        declared_name: impl Into<String>,
        declared_mime_type: impl Into<String>,
        size_bytes: u64,
        temporary_location: impl Into<PathBuf>,
    ) -> Self {
        Self {
            transfer_status: TransferStatus::Ok,
            declared_name: declared_name.into(),
            declared_mime_type: declared_mime_type.into(),
            size_bytes,
            temporary_location: temporary_location.into(),
        }
    }

    pub fn with_status(mut self, status: TransferStatus) -> Self {
        self.transfer_status = status;
        self
    }

    /// Substring after the last `.` of the declared name, empty if none
    pub fn extension(&self) -> &str {
        self.declared_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or("")
    }
}
