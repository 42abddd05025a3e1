use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use events::Relay;
use log::*;
use sea_orm::DatabaseConnection;
use service::config::Config;
use ::sse::Subscriptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

mod controller;
mod error;
pub(crate) mod extractors;
mod router;
mod sse;

#[cfg(test)]
#[cfg(feature = "mock")]
mod test_support;

pub use error::{Error, Result};

/// Web-layer state: infrastructure from `service` plus the relay that
/// connects mutation handlers to live subscriptions.
#[derive(Clone)]
pub struct AppState {
    pub service_state: service::AppState,
    pub relay: Arc<Relay>,
    pub subscriptions: Subscriptions,
}

impl AppState {
    pub fn new(service_state: service::AppState, relay: Arc<Relay>) -> Self {
        let subscriptions = Subscriptions::new(Arc::clone(&relay));
        Self {
            service_state,
            relay,
            subscriptions,
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.service_state.db_conn_ref()
    }

    pub fn config(&self) -> &Config {
        &self.service_state.config
    }
}

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let server_url = app_state.config().listen_address();
    info!("Server starting... listening for connections on http://{server_url}");

    let allowed_origins: Vec<HeaderValue> = app_state
        .config()
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {origin}");
                None
            }
        })
        .collect();
    info!("CORS allowed origins: {allowed_origins:?}");

    let cors_layer = CorsLayer::new()
        .allow_methods([Method::DELETE, Method::GET, Method::POST, Method::PUT])
        .allow_credentials(true)
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_origin(allowed_origins);

    let listener = tokio::net::TcpListener::bind(server_url).await?;
    let router = router::define_routes(app_state).layer(cors_layer);

    axum::serve(listener, router).await
}
