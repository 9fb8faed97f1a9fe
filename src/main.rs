//! Receipt Intake Server - Entry Point
//!
//! Accepts purchase receipts for known transactions and stores them under
//! random names in the configured upload directory.

use log::info;

use receipt_intake_server::error::handlers::handle_error;
use receipt_intake_server::utils::setup_logging;
use receipt_intake_server::{AppConfig, Server, ServerError};

#[tokio::main]
async fn main() {
    // env_logger picks up RUST_LOG
    setup_logging();

    info!("Launching receipt intake server...");

    if let Err(e) = run().await {
        handle_error(&e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let config = AppConfig::load()?;
    let server = Server::new(config).await?;
    server.start().await;
    Ok(())
}
