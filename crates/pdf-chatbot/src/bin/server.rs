//! Chatbot server binary
//!
//! Run with: cargo run -p pdf-chatbot --bin pdf-chatbot-server

use pdf_chatbot::{config::AppConfig, server::ChatbotServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the variables may come from the environment
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_chatbot=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - LLM model: {}", config.llm.model);
    tracing::info!("  - LLM timeout: {}s", config.llm.timeout_secs);
    tracing::info!("  - Max upload size: {} bytes", config.server.max_upload_size);
    tracing::info!("  - Session lifetime: {}s", config.session.ttl_secs);

    // Create and start server
    let server = ChatbotServer::new(config)?;

    println!("\nServer starting...");
    println!("  App:    http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
