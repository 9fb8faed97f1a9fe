pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod protocol;
pub mod server;
pub mod storage;
pub mod transaction;
pub mod transfer;
pub mod utils;

pub use config::AppConfig;
pub use controller::{ControllerOutcome, ReceiptController};
pub use error::{ServerError, ValidationError};
pub use server::Server;
pub use storage::{ReceiptService, StorageWriter, StoredFile, Submission, TransferStatus};
