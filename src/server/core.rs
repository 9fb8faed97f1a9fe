use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use crate::client::{SessionLimits, handle_client};
use crate::config::AppConfig;
use crate::controller::ReceiptController;
use crate::error::ServerError;
use crate::protocol::responses::{TOO_MANY_CONNECTIONS, format_response};
use crate::storage::ReceiptService;
use crate::storage::filesystem::create_directory;
use crate::transaction::InMemoryTransactionStore;
use crate::utils::LogSink;

pub struct Server {
    listener: TcpListener,
    controller: Arc<ReceiptController>,
    limits: Arc<SessionLimits>,
    active_clients: Arc<AtomicUsize>,
    max_clients: usize,
}

impl Server {
    pub async fn new(config: AppConfig) -> Result<Self, ServerError> {
        let socket = config.listen_socket();
        let listener = TcpListener::bind(&socket).await.map_err(|e| {
            error!("Failed to bind to {}: {}", socket, e);
            ServerError::Io(e)
        })?;
        info!("Server bound to {}", socket);

        for dir in [config.upload_directory_path(), config.temp_directory_path()] {
            if let Err(e) = create_directory(&dir) {
                warn!("Failed to create directory {}: {}", dir.display(), e);
            } else {
                info!("Using directory {}", dir.display());
            }
        }

        let transactions = InMemoryTransactionStore::new(config.transactions.iter().cloned());
        info!("Serving {} known transactions", transactions.len());

        let receipts = ReceiptService::new(config.upload_directory_path(), Arc::new(LogSink));
        let controller = Arc::new(ReceiptController::new(Arc::new(transactions), receipts));

        Ok(Self {
            listener,
            controller,
            limits: Arc::new(SessionLimits {
                temp_directory: config.temp_directory_path(),
                max_request_bytes: config.max_request_bytes,
                max_command_length: config.max_command_length,
            }),
            active_clients: Arc::new(AtomicUsize::new(0)),
            max_clients: config.max_clients,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn start(&self) {
        info!(
            "Starting receipt intake server on {:?} (max {} clients)",
            self.local_addr().ok(),
            self.max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((mut stream, addr)) => {
                    if self.active_clients.load(Ordering::SeqCst) >= self.max_clients {
                        warn!("Rejecting {}: client limit reached", addr);
                        let _ = stream
                            .write_all(
                                format_response(TOO_MANY_CONNECTIONS, "Too many connections")
                                    .as_bytes(),
                            )
                            .await;
                        continue;
                    }

                    let active = Arc::clone(&self.active_clients);
                    let controller = Arc::clone(&self.controller);
                    let limits = Arc::clone(&self.limits);
                    let count = active.fetch_add(1, Ordering::SeqCst) + 1;
                    info!("Accepted client {} ({}/{})", addr, count, self.max_clients);

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) = handle_client(stream, addr, controller, limits).await {
                            warn!("Failed to handle client {}: {}", addr, e);
                        }
                        active.fetch_sub(1, Ordering::SeqCst);
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}
