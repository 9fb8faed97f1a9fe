//! Receipt intake protocol
//!
//! Handles request parsing and response generation.

pub mod commands;
pub mod handlers;
pub mod responses;

pub use commands::{Command, ReceiptHeader, parse_command};
pub use handlers::{handle_form, handle_receipt};
