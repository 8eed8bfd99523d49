//! HTTP API server for meetbrief.
//!
//! Provides HTTP endpoints for:
//! - The landing page and health check
//! - Transcript summarization
//! - Sharing summaries

pub mod error;
pub mod routes;

use crate::config::{Config, ServerConfig};
use crate::share::ShareService;
use crate::summarize::Summarizer;
use anyhow::{Context, Result};
use axum::{http::HeaderValue, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Services shared by every request. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub summarizer: Arc<Summarizer>,
    pub share: Arc<ShareService>,
}

impl AppState {
    pub fn new(summarizer: Summarizer, share: ShareService) -> Self {
        Self {
            summarizer: Arc::new(summarizer),
            share: Arc::new(share),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            Summarizer::from_config(&config.upstream)?,
            ShareService::simulated(config.share.default_subject.clone()),
        ))
    }
}

pub struct ApiServer {
    host: String,
    port: u16,
    cors: CorsLayer,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: &ServerConfig, state: AppState) -> Result<Self> {
        Ok(Self {
            host: config.host.clone(),
            port: config.port,
            cors: cors_layer(&config.cors_origins)?,
            state,
        })
    }

    pub fn router(&self) -> Router {
        Router::new()
            .merge(routes::index::router(self.state.summarizer.clone()))
            .merge(routes::summarize::router(self.state.summarizer.clone()))
            .merge(routes::share::router(self.state.share.clone()))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(self.cors.clone()),
            )
    }

    pub async fn start(self) -> Result<()> {
        let app = self.router();
        let addr = format!("{}:{}", self.host, self.port);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        info!("API server listening on http://{}", addr);
        info!("Endpoints:");
        info!("  GET  /              - Landing page");
        info!("  GET  /health        - Service health");
        info!("  POST /api/summarize - Summarize a transcript");
        info!("  POST /api/share     - Share a summary");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server stopped");
        Ok(())
    }
}

/// Any origin when `origins` is empty, otherwise exactly the listed ones.
fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    if origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let allowed = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid CORS origin: {:?}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
