//! HTTP API server for Chatterbox
//!
//! Serves the single-page chat UI and the JSON endpoints it drives. All
//! conversation state lives in the in-memory [`SessionStore`].

mod error;
pub mod health;
pub mod meta;
pub mod sessions;

pub use error::ApiError;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::pipeline::TurnProcessor;
use crate::session::SessionStore;
use crate::Result;

/// Shared state for API handlers
pub struct ApiState {
    /// Turn pipeline shared by every session
    pub processor: TurnProcessor,
    /// Live sessions
    pub sessions: SessionStore,
    /// Defaults applied to new sessions
    pub config: Config,
}

impl ApiState {
    #[must_use]
    pub fn new(processor: TurnProcessor, config: Config) -> Self {
        Self {
            processor,
            sessions: SessionStore::with_idle_timeout(config.chat.session_idle),
            config,
        }
    }
}

/// Build the router with all routes
pub fn router(state: Arc<ApiState>) -> Router {
    // the UI may be served from another origin during development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/sessions", sessions::router(state.clone()))
        .merge(meta::router(state.clone()))
        .merge(health::router())
        .merge(health::ready_router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    host: String,
    port: u16,
}

impl ApiServer {
    #[must_use]
    pub fn new(state: ApiState) -> Self {
        let host = state.config.server.host.clone();
        let port = state.config.server.port;
        Self {
            state: Arc::new(state),
            host,
            port,
        }
    }

    /// Run the API server until it fails or the process stops
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind {addr}: {e}")))?;

        tracing::info!(
            addr = %addr,
            llm = self.state.processor.llm_name().unwrap_or("none"),
            speech = self.state.processor.speech().name(),
            "chat UI listening"
        );

        axum::serve(listener, router(self.state))
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}
