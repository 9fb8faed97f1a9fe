//! Module `commands`
//!
//! Parses request lines of the receipt intake protocol.
//!
//! ```text
//! FORM <transaction>
//! RECEIPT <transaction> <size> <mime-type> <file name...>
//! QUIT
//! ```
//!
//! A `RECEIPT` line is followed by exactly `<size>` raw bytes of file content.

/// Header of a `RECEIPT` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptHeader {
    pub transaction_id: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub file_name: String,
}

/// A parsed request line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    /// Ask whether a receipt can be sent for the transaction
    Form(String),
    /// Receipt header, body follows
    Receipt(ReceiptHeader),
    /// `RECEIPT` whose file fields are missing or unreadable. Carries the
    /// transaction id (possibly empty) and the body size when one was given.
    MalformedReceipt {
        transaction_id: String,
        size_bytes: Option<u64>,
    },
    Unknown(String),
}

/// Parses a raw request line into a `Command`.
///
/// The file name is everything after the mime type, so it may contain spaces.
pub fn parse_command(raw: &str) -> Command {
    let trimmed = raw.trim_end_matches(['\r', '\n']).trim_start();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("").to_ascii_uppercase();
    let arg = parts.next().unwrap_or("");

    match cmd.as_str() {
        "QUIT" | "Q" => Command::Quit,
        "FORM" if !arg.trim().is_empty() => Command::Form(arg.trim().to_string()),
        "RECEIPT" => parse_receipt(arg),
        _ => Command::Unknown(trimmed.to_string()),
    }
}

fn parse_receipt(arg: &str) -> Command {
    let mut fields = arg.splitn(4, ' ');
    let transaction_id = fields.next().unwrap_or("").trim().to_string();
    let size = fields.next().and_then(|s| s.trim().parse::<u64>().ok());
    let mime_type = fields.next().map(str::trim).filter(|m| !m.is_empty());
    let file_name = fields.next().filter(|n| !n.is_empty());

    match (size, mime_type, file_name) {
        (Some(size_bytes), Some(mime_type), Some(file_name)) if !transaction_id.is_empty() => {
            Command::Receipt(ReceiptHeader {
                transaction_id,
                size_bytes,
                mime_type: mime_type.to_string(),
                file_name: file_name.to_string(),
            })
        }
        (size_bytes, _, _) => Command::MalformedReceipt {
            transaction_id,
            size_bytes,
        },
    }
}
