//! Router construction and the server run loop.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tokio::signal;

use super::config::ContentServerConfig;
use super::handlers::{
    AppState, handle_add_cheat_sheet, handle_add_strategy, handle_add_video_link,
    handle_add_video_upload, handle_healthy, handle_list_cheat_sheets, handle_list_strategies,
    handle_list_videos, handle_metrics, handle_ready, handle_upload_file,
};
use super::metrics::Metrics;
use super::middleware::{CorsLayer, MetricsLayer, TracingLayer};
use super::request::JSON_BODY_LIMIT;
use crate::ContentDb;

/// HTTP server for the content portal.
pub struct ContentServer {
    db: Arc<ContentDb>,
    metrics: Arc<Metrics>,
    config: ContentServerConfig,
}

impl ContentServer {
    pub fn new(db: Arc<ContentDb>, config: ContentServerConfig) -> Self {
        Self {
            db,
            metrics: Arc::new(Metrics::new()),
            config,
        }
    }

    /// Builds the router with every route and middleware installed.
    ///
    /// Upload routes lift the default body limit; the handlers enforce the
    /// per-kind ceilings themselves.
    pub fn router(&self) -> Router {
        let state = AppState {
            db: self.db.clone(),
            metrics: self.metrics.clone(),
        };

        Router::new()
            .route("/api/videos", get(handle_list_videos))
            .route("/api/videos/link", post(handle_add_video_link))
            .route(
                "/api/videos/upload",
                post(handle_add_video_upload).layer(DefaultBodyLimit::disable()),
            )
            .route(
                "/api/strategies",
                get(handle_list_strategies).post(handle_add_strategy),
            )
            .route("/api/cheatsheets", get(handle_list_cheat_sheets))
            .route(
                "/api/cheatsheets/upload",
                post(handle_add_cheat_sheet).layer(DefaultBodyLimit::disable()),
            )
            .route("/uploads/{*path}", get(handle_upload_file))
            .route("/metrics", get(handle_metrics))
            .route("/-/healthy", get(handle_healthy))
            .route("/-/ready", get(handle_ready))
            .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
            .layer(TracingLayer::new())
            .layer(MetricsLayer::new(self.metrics.clone()))
            .layer(CorsLayer::new())
            .with_state(state)
    }

    /// Run the HTTP server until a shutdown signal arrives.
    pub async fn run(self) -> std::io::Result<()> {
        let app = self.router();

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        tracing::info!("Starting content server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shut down gracefully");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, starting graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
