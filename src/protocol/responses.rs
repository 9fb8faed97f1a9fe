//! Protocol responses
//!
//! Defines response codes and formatting.

use crate::controller::ControllerOutcome;

pub const OK: u16 = 200;
pub const GOODBYE: u16 = 221;
pub const READY: u16 = 220;
pub const REDIRECT: u16 = 302;
pub const TOO_MANY_CONNECTIONS: u16 = 421;
pub const UNPROCESSABLE: u16 = 422;
pub const INTERNAL_ERROR: u16 = 500;

/// Format a response line
pub fn format_response(code: u16, message: &str) -> String {
    format!("{} {}\r\n", code, message)
}

/// Render a controller outcome as a response line
pub fn render_outcome(outcome: &ControllerOutcome) -> String {
    match outcome {
        ControllerOutcome::ShowUploadForm { transaction_id } => format_response(
            OK,
            &format!("Send receipt for transaction {}", transaction_id),
        ),
        ControllerOutcome::Redirect { location } => format_response(REDIRECT, location),
        ControllerOutcome::Uploaded { location, stored } => {
            format_response(REDIRECT, &format!("{} {}", location, stored.file_name))
        }
    }
}
