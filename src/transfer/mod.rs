//! Transfer module
//!
//! Moves request bodies off the connection into temporary storage.

pub mod file_ops;

pub use file_ops::{ReceivedBody, discard_temporary, drain, receive_upload};
