//! Receipt storage
//!
//! Intake validation, directory checks and the move into permanent storage.

pub mod filesystem;
pub mod permissions;
pub mod results;
pub mod service;
pub mod submission;
pub mod validation;
pub mod writer;

pub use results::StoredFile;
pub use service::ReceiptService;
pub use submission::{Submission, TransferStatus};
pub use validation::{MAX_RECEIPT_BYTES, validate_file};
pub use writer::{StorageWriter, generate_filename};
