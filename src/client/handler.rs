use log::{error, info, warn};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::controller::ReceiptController;
use crate::protocol::responses::{GOODBYE, INTERNAL_ERROR, READY, format_response};
use crate::protocol::{Command, handle_form, handle_receipt, parse_command};
use crate::transfer::{discard_temporary, drain, receive_upload};

/// Per-connection settings taken from the server configuration
#[derive(Debug, Clone)]
pub struct SessionLimits {
    pub temp_directory: PathBuf,
    pub max_request_bytes: u64,
    pub max_command_length: usize,
}

/// Handles one intake session.
///
/// - Reads request lines with a `BufReader`; receipt bodies are read from the
///   same buffer so nothing is lost between header and content.
/// - Never buffers more than `max_command_length + 1` bytes of a request line.
///   A longer line closes the session, since the rest of it cannot be told
///   apart from the next request.
/// - Runs the blocking intake pipeline on tokio's blocking pool.
/// - Removes any temporary body the pipeline left behind.
pub async fn handle_client<S>(
    stream: S,
    client_addr: SocketAddr,
    controller: Arc<ReceiptController>,
    limits: Arc<SessionLimits>,
) -> std::io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (read_half, mut write_half) = tokio::io::split(stream);
    let mut reader = BufReader::new(read_half);
    let mut line = Vec::new();
    let line_limit = limits.max_command_length as u64 + 1;

    write_half
        .write_all(format_response(READY, "Receipt intake ready").as_bytes())
        .await?;
    write_half.flush().await?;

    loop {
        line.clear();
        if (&mut reader).take(line_limit).read_until(b'\n', &mut line).await? == 0 {
            info!("Connection closed by client {}", client_addr);
            return Ok(());
        }

        if line.len() > limits.max_command_length {
            warn!("Command from {} exceeds {} bytes", client_addr, limits.max_command_length);
            write_half
                .write_all(format_response(INTERNAL_ERROR, "Command too long").as_bytes())
                .await?;
            write_half.flush().await?;
            info!("Closing connection to {}", client_addr);
            return Ok(());
        }

        let command = parse_command(&String::from_utf8_lossy(&line));
        info!("Received from {}: {:?}", client_addr, command);

        let (response, close) = match command {
            Command::Quit => (format_response(GOODBYE, "Goodbye"), true),
            Command::Form(transaction_id) => (handle_form(&controller, &transaction_id), false),
            Command::MalformedReceipt {
                transaction_id,
                size_bytes,
            } => {
                // A declared body still follows the header and must not be
                // read as request lines.
                let in_sync = match size_bytes {
                    Some(len) if len > limits.max_request_bytes => false,
                    Some(len) => drain(&mut reader, len).await,
                    None => true,
                };
                let response = run_pipeline(&controller, transaction_id, None).await;
                (response, !in_sync)
            }
            Command::Receipt(header) => {
                let body = receive_upload(
                    &mut reader,
                    &header,
                    &limits.temp_directory,
                    limits.max_request_bytes,
                )
                .await;
                let temp = body.submission.temporary_location.clone();

                let response =
                    run_pipeline(&controller, header.transaction_id, Some(body.submission)).await;
                discard_temporary(&temp).await;
                (response, body.close_connection)
            }
            Command::Unknown(raw) => {
                warn!("Unknown command from {}: {}", client_addr, raw);
                (format_response(INTERNAL_ERROR, "Unknown command"), false)
            }
        };

        write_half.write_all(response.as_bytes()).await?;
        write_half.flush().await?;

        if close {
            info!("Closing connection to {}", client_addr);
            return Ok(());
        }
    }
}

async fn run_pipeline(
    controller: &Arc<ReceiptController>,
    transaction_id: String,
    submission: Option<crate::storage::Submission>,
) -> String {
    let controller = Arc::clone(controller);
    match tokio::task::spawn_blocking(move || {
        handle_receipt(&controller, &transaction_id, submission)
    })
    .await
    {
        Ok(response) => response,
        Err(e) => {
            error!("Intake pipeline task failed: {e}");
            format_response(INTERNAL_ERROR, "Internal error")
        }
    }
}
