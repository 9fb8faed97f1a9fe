//! Error handling
//!
//! Defines error types and handling for the receipt intake server.

pub mod handlers;
pub mod types;

pub use types::*;
