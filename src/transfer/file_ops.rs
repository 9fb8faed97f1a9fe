//! Module `file_ops`
//!
//! Receives a request body into the transport's temporary directory and
//! describes the result as a `Submission`. Transfer problems are recorded in
//! the submission's transfer status rather than returned as errors.

use log::{error, info, warn};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{self, AsyncRead, AsyncReadExt, AsyncWriteExt};

use crate::protocol::ReceiptHeader;
use crate::storage::{Submission, TransferStatus};

/// A body pulled off the wire
#[derive(Debug)]
pub struct ReceivedBody {
    pub submission: Submission,
    /// The stream is out of sync or exhausted and must be closed
    pub close_connection: bool,
}

/// Temporary file name for an incoming body
fn temporary_path(temp_dir: &Path) -> PathBuf {
    temp_dir.join(format!("upload-{}", hex::encode(rand::random::<[u8; 8]>())))
}

fn received(
    header: &ReceiptHeader,
    temp: PathBuf,
    status: TransferStatus,
    close: bool,
) -> ReceivedBody {
    ReceivedBody {
        submission: Submission::new(
            header.file_name.clone(),
            header.mime_type.clone(),
            header.size_bytes,
            temp,
        )
        .with_status(status),
        close_connection: close,
    }
}

/// Discard `len` bytes so the next request line can be read.
///
/// Returns false when the stream ended or failed before `len` bytes arrived.
pub async fn drain<R: AsyncRead + Unpin>(reader: &mut R, len: u64) -> bool {
    match io::copy(&mut (&mut *reader).take(len), &mut io::sink()).await {
        Ok(n) => n == len,
        Err(e) => {
            warn!("Failed to drain request body: {e}");
            false
        }
    }
}

/// Read exactly `header.size_bytes` bytes from `reader` into `temp_dir`.
pub async fn receive_upload<R: AsyncRead + Unpin>(
    reader: &mut R,
    header: &ReceiptHeader,
    temp_dir: &Path,
    max_request_bytes: u64,
) -> ReceivedBody {
    let temp = temporary_path(temp_dir);

    if header.size_bytes > max_request_bytes {
        warn!(
            "Request body of {} bytes exceeds transport limit of {} bytes",
            header.size_bytes, max_request_bytes
        );
        return received(header, temp, TransferStatus::IniSize, true);
    }

    if header.size_bytes == 0 {
        return received(header, temp, TransferStatus::NoFile, false);
    }

    if !fs::metadata(temp_dir).await.map(|m| m.is_dir()).unwrap_or(false) {
        error!("Temporary directory missing: {}", temp_dir.display());
        let in_sync = drain(reader, header.size_bytes).await;
        return received(header, temp, TransferStatus::NoTmpDir, !in_sync);
    }

    let mut file = match File::create(&temp).await {
        Ok(file) => file,
        Err(e) => {
            error!("Failed to create temporary file {}: {e}", temp.display());
            let in_sync = drain(reader, header.size_bytes).await;
            return received(header, temp, TransferStatus::CantWrite, !in_sync);
        }
    };

    let copied = match io::copy(&mut (&mut *reader).take(header.size_bytes), &mut file).await {
        Ok(n) => n,
        Err(e) => {
            error!("Failed to write temporary file {}: {e}", temp.display());
            drop(file);
            let _ = fs::remove_file(&temp).await;
            return received(header, temp, TransferStatus::CantWrite, true);
        }
    };

    if let Err(e) = file.flush().await {
        error!("Failed to flush temporary file {}: {e}", temp.display());
        drop(file);
        let _ = fs::remove_file(&temp).await;
        return received(header, temp, TransferStatus::CantWrite, true);
    }
    drop(file);

    if copied < header.size_bytes {
        warn!(
            "Connection ended after {copied} of {} bytes for {}",
            header.size_bytes, header.file_name
        );
        let _ = fs::remove_file(&temp).await;
        return received(header, temp, TransferStatus::Partial, true);
    }

    info!(
        "Received {copied} bytes for {} into {}",
        header.file_name,
        temp.display()
    );
    received(header, temp, TransferStatus::Ok, false)
}

/// Remove a temporary body the storage writer did not consume.
pub async fn discard_temporary(path: &Path) {
    if fs::metadata(path).await.is_ok() {
        match fs::remove_file(path).await {
            Ok(()) => info!("Discarded temporary upload {}", path.display()),
            Err(e) => warn!("Failed to discard temporary upload {}: {e}", path.display()),
        }
    }
}
