//! Web layer module
//!
//! HTTP interface for the QR image service. Handlers are thin and delegate
//! to [`ImageService`]; responses are shaped in [`responses`].

use anyhow::Result;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;

use crate::{config::Config, services::ImageService};

pub mod handlers;
pub mod middleware;
pub mod responses;

pub use responses::{ApiResponse, handle_error};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub image_service: ImageService,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config, image_service: ImageService) -> Self {
        Self {
            config: Arc::new(config),
            image_service,
            start_time: Instant::now(),
        }
    }
}

/// Build the full router, layers included
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.web.max_body_bytes;

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/image", get(handlers::image::direct_image))
        .route(
            "/image/post/{key}",
            get(handlers::image::cached_image).post(handlers::image::store_image),
        )
        .route("/api/qr/generate", post(handlers::generate::generate))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn(
            middleware::request_logging_middleware,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: Config, image_service: ImageService) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;
        let app = create_router(AppState::new(config, image_service));
        Ok(Self { app, addr })
    }

    /// Serve with a notification when the server is actually listening or fails to bind
    pub async fn serve_with_signal(
        self,
        ready_signal: tokio::sync::oneshot::Sender<Result<()>>,
    ) -> Result<()> {
        match tokio::net::TcpListener::bind(&self.addr).await {
            Ok(listener) => {
                let _ = ready_signal.send(Ok(()));
                axum::serve(listener, self.app)
                    .with_graceful_shutdown(shutdown_signal())
                    .await?;
                Ok(())
            }
            Err(bind_error) => {
                let bind_err_msg = format!("Failed to bind to {}: {}", self.addr, bind_error);
                let _ = ready_signal.send(Err(anyhow::anyhow!("{}", bind_err_msg)));
                Err(anyhow::anyhow!("{}", bind_err_msg))
            }
        }
    }

    /// Get the host address
    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Resolves on SIGTERM or Ctrl+C. If no handler can be installed the
/// server runs until killed.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {
                        tracing::info!("Received SIGTERM, shutting down gracefully");
                    }
                    _ = sigint.recv() => {
                        tracing::info!("Received SIGINT (Ctrl+C), shutting down gracefully");
                    }
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!("Failed to install signal handlers: {}", e);
                std::future::pending::<()>().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down gracefully"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    }
}
