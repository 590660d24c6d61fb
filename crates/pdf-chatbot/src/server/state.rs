//! Application state for the chatbot server

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::Result;
use crate::pipeline::QaPipeline;
use crate::providers::{FirebaseAuth, IdentityProvider, LlmProvider, OpenAiClient};

use super::pages::PageRenderer;
use super::session::SessionSigner;

/// Shared application state
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: AppConfig,
    /// Account backend (Firebase)
    identity: Arc<dyn IdentityProvider>,
    /// Extraction + completion pipeline
    pipeline: QaPipeline,
    /// Compiled page templates
    pages: PageRenderer,
    /// Session cookie signer
    sessions: SessionSigner,
}

impl AppState {
    /// Create application state with the production providers
    pub fn new(config: AppConfig) -> Result<Self> {
        tracing::info!("Initializing chatbot application state...");

        let llm = Arc::new(OpenAiClient::new(&config.llm));
        tracing::info!("LLM provider initialized ({} at {})", config.llm.model, llm.endpoint());

        let identity = Arc::new(FirebaseAuth::new(&config.identity));
        tracing::info!("Identity provider initialized ({})", config.identity.base_url);

        Self::with_providers(config, llm, identity)
    }

    /// Create application state around explicit providers
    pub fn with_providers(
        config: AppConfig,
        llm: Arc<dyn LlmProvider>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self> {
        let pages = PageRenderer::new()?;
        let sessions = SessionSigner::new(&config.session);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                identity,
                pipeline: QaPipeline::new(llm),
                pages,
                sessions,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get identity provider
    pub fn identity(&self) -> &Arc<dyn IdentityProvider> {
        &self.inner.identity
    }

    /// Get question answering pipeline
    pub fn pipeline(&self) -> &QaPipeline {
        &self.inner.pipeline
    }

    /// Get page renderer
    pub fn pages(&self) -> &PageRenderer {
        &self.inner.pages
    }

    /// Get session signer
    pub fn sessions(&self) -> &SessionSigner {
        &self.inner.sessions
    }
}
