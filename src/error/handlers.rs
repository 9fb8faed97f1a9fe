//! Error handlers
//!
//! Converts errors into protocol status codes and response lines.

use crate::error::types::{ServerError, ValidationError};
use crate::protocol::responses::{INTERNAL_ERROR, UNPROCESSABLE, format_response};
use log::error;

/// Handle a server error
pub fn handle_error(err: &ServerError) {
    error!("Receipt intake error ({}): {}", error_to_status_code(err), err);
}

/// Convert error to protocol response code
pub fn error_to_status_code(err: &ServerError) -> u16 {
    match err {
        ServerError::Config(_) | ServerError::Io(_) => INTERNAL_ERROR,
    }
}

/// Render every field message as its own `422 field: message` line.
pub fn validation_response(err: &ValidationError) -> String {
    let mut response = String::new();
    for (field, messages) in err.errors() {
        for message in messages {
            response.push_str(&format_response(
                UNPROCESSABLE,
                &format!("{}: {}", field, message),
            ));
        }
    }
    response
}
