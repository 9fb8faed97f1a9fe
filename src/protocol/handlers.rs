//! Command handlers
//!
//! Turns controller results into response text.

use log::info;

use crate::controller::ReceiptController;
use crate::error::handlers::validation_response;
use crate::protocol::responses::render_outcome;
use crate::storage::Submission;

/// Handle `FORM <transaction>`
pub fn handle_form(controller: &ReceiptController, transaction_id: &str) -> String {
    render_outcome(&controller.upload_view(transaction_id))
}

/// Run a received receipt through the controller.
///
/// Blocking: performs filesystem checks and the move into storage.
pub fn handle_receipt(
    controller: &ReceiptController,
    transaction_id: &str,
    submission: Option<Submission>,
) -> String {
    match controller.upload(transaction_id, submission) {
        Ok(outcome) => render_outcome(&outcome),
        Err(err) => {
            info!("Receipt rejected for transaction {transaction_id}: {err}");
            validation_response(&err)
        }
    }
}
