use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use log::Level;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use receipt_intake_server::storage::validation::{
    MSG_INVALID_FILENAME, MSG_INVALID_TYPE, MSG_TOO_LARGE, MSG_UPLOAD_FAILED,
};
use receipt_intake_server::storage::writer::MSG_DIRECTORY_MISSING;
use receipt_intake_server::utils::MemorySink;
use receipt_intake_server::{AppConfig, ReceiptService, Server, Submission, TransferStatus};

// Helper to stage a body the way the transport would
fn staged(dir: &Path, name: &str, mime: &str, content: &[u8]) -> Submission {
    let temp = dir.join(format!("upload-{}", hex::encode(rand::random::<[u8; 6]>())));
    fs::write(&temp, content).unwrap();
    Submission::new(name, mime, content.len() as u64, temp)
}

fn is_stored_name(name: &str, ext: &str) -> bool {
    let (hex_part, rest) = name.split_once('.').unwrap();
    hex_part.len() == 32 && hex_part.chars().all(|c| c.is_ascii_hexdigit()) && rest == ext
}

fn first_message(service: &ReceiptService, sub: Option<&Submission>) -> String {
    let err = service.validate_file(sub).unwrap_err();
    err.messages("receipt")[0].clone()
}

#[test]
fn test_end_to_end_png_receipt() {
    let temp_dir = tempfile::tempdir().unwrap();
    let upload_dir = tempfile::tempdir().unwrap();
    let sink = Arc::new(MemorySink::new());
    let service = ReceiptService::new(upload_dir.path(), sink.clone());

    let sub = staged(temp_dir.path(), "receipt.png", "image/png", &[7u8; 1024]);
    assert_eq!(sub.size_bytes, 1024);

    service.validate_file(Some(&sub)).unwrap();
    let stored = service.upload(&sub).unwrap();

    assert!(is_stored_name(&stored.file_name, "png"));
    assert_eq!(stored.path.parent().unwrap(), upload_dir.path());
    assert_eq!(fs::read(&stored.path).unwrap(), vec![7u8; 1024]);
    assert!(!sub.temporary_location.exists());
    assert!(sink.contains(Level::Info, "File successfully uploaded to"));
}

#[test]
fn test_validation_messages() {
    let upload_dir = tempfile::tempdir().unwrap();
    let service = ReceiptService::new(upload_dir.path(), Arc::new(MemorySink::new()));
    let base = Submission::new("receipt.png", "image/png", 1024, "/tmp/none");

    assert_eq!(first_message(&service, None), MSG_UPLOAD_FAILED);
    assert_eq!(
        first_message(&service, Some(&base.clone().with_status(TransferStatus::IniSize))),
        MSG_UPLOAD_FAILED
    );

    let mut big = base.clone();
    big.size_bytes = 3_145_729;
    assert_eq!(first_message(&service, Some(&big)), MSG_TOO_LARGE);
    big.size_bytes = 3_145_728;
    assert!(service.validate_file(Some(&big)).is_ok());

    for name in ["../evil.png", "résumé.png", "a/b.png", "semi;colon.png"] {
        let mut sub = base.clone();
        sub.declared_name = name.into();
        assert_eq!(first_message(&service, Some(&sub)), MSG_INVALID_FILENAME, "{name}");
    }
    let mut sub = base.clone();
    sub.declared_name = "My Receipt_01.png".into();
    assert!(service.validate_file(Some(&sub)).is_ok());

    let mut sub = base.clone();
    sub.declared_mime_type = "text/plain".into();
    assert_eq!(first_message(&service, Some(&sub)), MSG_INVALID_TYPE);
}

#[test]
fn test_missing_upload_directory_leaves_temp_in_place() {
    let temp_dir = tempfile::tempdir().unwrap();
    let service = ReceiptService::new(
        temp_dir.path().join("no-such-dir"),
        Arc::new(MemorySink::new()),
    );

    let sub = staged(temp_dir.path(), "receipt.pdf", "application/pdf", b"%PDF");
    let err = service.upload(&sub).unwrap_err();

    assert_eq!(err.messages("receipt"), [MSG_DIRECTORY_MISSING.to_string()]);
    assert!(sub.temporary_location.exists());
}

#[test]
fn test_concurrent_uploads_do_not_collide() {
    let temp_dir = tempfile::tempdir().unwrap();
    let upload_dir = tempfile::tempdir().unwrap();
    let service = ReceiptService::new(upload_dir.path(), Arc::new(MemorySink::new()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = service.clone();
            let content = format!("{i}");
            let sub = staged(temp_dir.path(), "receipt.jpg", "image/jpeg", content.as_bytes());
            thread::spawn(move || {
                service.validate_file(Some(&sub)).unwrap();
                service.upload(&sub).unwrap()
            })
        })
        .collect();

    let mut names: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().unwrap().file_name)
        .collect();
    names.sort();
    names.dedup();

    assert_eq!(names.len(), 8);
    assert_eq!(fs::read_dir(upload_dir.path()).unwrap().count(), 8);
}

async fn start_server(upload_dir: &Path, temp_dir: &Path) -> std::net::SocketAddr {
    let config = AppConfig {
        bind_address: "127.0.0.1".into(),
        port: 0,
        upload_directory: upload_dir.to_string_lossy().into_owned(),
        temp_directory: temp_dir.to_string_lossy().into_owned(),
        max_request_bytes: 4 * 1024 * 1024,
        max_clients: 4,
        max_command_length: 512,
        transactions: vec!["txn-1001".into()],
    };
    let server = Server::new(config).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(async move { server.start().await });
    addr
}

async fn exchange(addr: std::net::SocketAddr, request: &[u8]) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();
    stream.write_all(b"QUIT\r\n").await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn test_server_stores_receipt_over_tcp() {
    let upload_dir = tempfile::tempdir().unwrap();
    let temp_dir = tempfile::tempdir().unwrap();
    let addr = start_server(upload_dir.path(), temp_dir.path()).await;

    let response = exchange(
        addr,
        b"FORM txn-1001\r\nRECEIPT txn-1001 5 application/pdf March receipt.pdf\r\n%PDF!",
    )
    .await;
    let lines: Vec<&str> = response.split("\r\n").collect();

    assert_eq!(lines[0], "220 Receipt intake ready");
    assert_eq!(lines[1], "200 Send receipt for transaction txn-1001");
    let stored_name = lines[2].strip_prefix("302 / ").unwrap();
    assert!(is_stored_name(stored_name, "pdf"));
    assert_eq!(lines[3], "221 Goodbye");
    assert_eq!(fs::read(upload_dir.path().join(stored_name)).unwrap(), b"%PDF!");
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_server_rejections() {
    let upload_dir = tempfile::tempdir().unwrap();
    let temp_dir = tempfile::tempdir().unwrap();
    let addr = start_server(upload_dir.path(), temp_dir.path()).await;

    let response = exchange(
        addr,
        b"RECEIPT txn-9999 3 image/png a.png\r\nabc\
          RECEIPT txn-1001 3 text/plain notes.txt\r\nabc\
          RECEIPT txn-1001 3 image/png ../evil.png\r\nabc\
          RECEIPT txn-1001\r\n",
    )
    .await;
    let lines: Vec<&str> = response.split("\r\n").collect();

    assert_eq!(lines[1], "302 /");
    assert_eq!(lines[2], "422 receipt: Invalid file type");
    assert_eq!(lines[3], "422 receipt: Invalid filename");
    assert_eq!(lines[4], "422 receipt: Failed to upload file");
    assert_eq!(lines[5], "221 Goodbye");
    assert_eq!(fs::read_dir(upload_dir.path()).unwrap().count(), 0);
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}
