//! # HTTP Server
//!
//! Wraps the router with CORS and request tracing, binds the listener and
//! serves until Ctrl+C or SIGTERM. The storage handle is closed once the
//! server has drained.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;

use super::routes::{router, AppState};

/// HTTP server for the review service
pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Router with middleware applied
    pub fn router(&self) -> Router {
        router(self.state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&self.config.cors_origins))
    }

    /// Bind and serve until a shutdown signal arrives
    pub async fn start(self) -> std::io::Result<()> {
        let addr: SocketAddr = self.socket_addr().parse().map_err(|err| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("{err}"))
        })?;

        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        self.state.coordinator.database().close();
        info!("server stopped");
        Ok(())
    }
}

/// CORS from configured origins; an empty list allows any origin
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
