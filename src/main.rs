//! Task tracker server with live task, comment and attachment updates.

use events::Relay;
use log::*;
use service::{config::Config, logging::Logger, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let config = Config::new();

    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to initialize logger: {e}");
    }

    info!(
        "Starting up task relay ({} environment)...",
        config.runtime_env()
    );

    let db = match service::init_database(&config).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to connect to the database: {e}");
            std::process::exit(1);
        }
    };

    let relay = Arc::new(Relay::new());
    let app_state = web::AppState::new(AppState::new(config, &db), relay);

    if let Err(e) = web::init_server(app_state).await {
        error!("Server exited with error: {e}");
        std::process::exit(1);
    }
}

