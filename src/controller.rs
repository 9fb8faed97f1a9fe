//! Receipt controller
//!
//! Entry points the transport calls. A missing transaction aborts the request
//! with a redirect before any validation or storage happens.

use log::{info, warn};
use std::sync::Arc;

use crate::error::ValidationError;
use crate::storage::{ReceiptService, StoredFile, Submission};
use crate::transaction::TransactionStore;

/// Where aborted and completed requests are sent
pub const HOME_LOCATION: &str = "/";

/// What the transport should answer with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerOutcome {
    /// Transaction exists; the client may send its receipt
    ShowUploadForm { transaction_id: String },
    /// Request aborted, client goes back to `location`
    Redirect { location: String },
    /// Receipt stored, client goes back to `location`
    Uploaded { location: String, stored: StoredFile },
}

impl ControllerOutcome {
    fn home() -> Self {
        ControllerOutcome::Redirect {
            location: HOME_LOCATION.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct ReceiptController {
    transactions: Arc<dyn TransactionStore>,
    receipts: ReceiptService,
}

impl ReceiptController {
    pub fn new(transactions: Arc<dyn TransactionStore>, receipts: ReceiptService) -> Self {
        Self {
            transactions,
            receipts,
        }
    }

    pub fn upload_view(&self, transaction_id: &str) -> ControllerOutcome {
        match self.transactions.get_user_transaction(transaction_id) {
            Some(transaction) => ControllerOutcome::ShowUploadForm {
                transaction_id: transaction.id,
            },
            None => {
                warn!("Upload form requested for unknown transaction {transaction_id}");
                ControllerOutcome::home()
            }
        }
    }

    pub fn upload(
        &self,
        transaction_id: &str,
        submission: Option<Submission>,
    ) -> Result<ControllerOutcome, ValidationError> {
        if self
            .transactions
            .get_user_transaction(transaction_id)
            .is_none()
        {
            warn!("Receipt sent for unknown transaction {transaction_id}");
            return Ok(ControllerOutcome::home());
        }

        self.receipts.validate_file(submission.as_ref())?;

        // validate_file rejects an absent submission
        let Some(submission) = submission else {
            return Err(ValidationError::receipt(
                crate::storage::validation::MSG_UPLOAD_FAILED,
            ));
        };

        let stored = self.receipts.upload(&submission)?;
        info!(
            "Receipt for transaction {transaction_id} stored as {}",
            stored.file_name
        );

        Ok(ControllerOutcome::Uploaded {
            location: HOME_LOCATION.to_string(),
            stored,
        })
    }
}
