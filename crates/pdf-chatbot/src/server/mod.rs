//! HTTP server for the chatbot

pub mod pages;
pub mod routes;
pub mod session;
pub mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use state::AppState;

/// Chatbot HTTP server
pub struct ChatbotServer {
    state: AppState,
}

impl ChatbotServer {
    /// Create a server with the production providers
    pub fn new(config: AppConfig) -> Result<Self> {
        Ok(Self::with_state(AppState::new(config)?))
    }

    /// Create a server around prepared state
    pub fn with_state(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        let server = &self.state.config().server;

        let router = Router::new()
            // Health check
            .route("/health", get(health_check))
            .merge(routes::page_routes(server.max_upload_size))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if server.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router.layer(cors)
        } else {
            router
        }
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.router();

        tracing::info!("Starting chatbot server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        let server = &self.state.config().server;
        format!("{}:{}", server.host, server.port)
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
