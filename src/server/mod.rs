//! HTTP server for the viewer UI.
//!
//! # Routes
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | `POST` | `/api/chat` | [`ChatResponse`](crate::models::ChatResponse), or 400 `{"error":"Invalid JSON"}` |
//! | `GET` | `/health` | `{"status":"OK","timestamp":...}` |
//! | `GET` | `/test/*` | Files from the configured static directory |
//! | any | other, including other methods on the routes above | 404 `{"error":"Not Found"}` |
//!
//! Every non-preflight request is held for a random delay drawn from the
//! configured bounds before it reaches its handler.

mod handlers;
mod middleware;

pub use middleware::LatencySimulator;

use crate::catalog::Catalog;
use crate::config::DocchatConfig;
use crate::services::ChatService;
use crate::{Error, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use axum::{Router, middleware as axum_middleware};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

/// Maximum accepted request body (1 MiB).
pub const MAX_REQUEST_BODY_SIZE: usize = 1024 * 1024;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Chat responder.
    pub chat: Arc<ChatService>,
}

/// Builds the application router for the given configuration.
#[must_use]
pub fn build_router(chat: Arc<ChatService>, config: &DocchatConfig) -> Router {
    let mut app = Router::new()
        .route("/api/chat", post(handlers::chat))
        .route("/health", get(handlers::health));

    if let Some(dir) = &config.static_dir {
        app = app.nest_service("/test", ServeDir::new(dir));
    }

    let mut app = app
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::not_found)
        .with_state(AppState { chat });

    if config.simulates_delay() {
        let latency = Arc::new(LatencySimulator::new(config.delay));
        app = app.layer(axum_middleware::from_fn_with_state(
            latency,
            middleware::simulate_latency,
        ));
    }

    app = app
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::propagate_request_id))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ));

    // Outermost so preflights are answered before the delay.
    if config.features.cors {
        app = app.layer(cors_layer());
    }

    app
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// The docchat HTTP server.
pub struct ChatServer {
    config: DocchatConfig,
    chat: Arc<ChatService>,
}

impl ChatServer {
    /// Creates a server over a loaded catalog.
    #[must_use]
    pub fn new(config: DocchatConfig, catalog: Arc<Catalog>) -> Self {
        let chat = Arc::new(ChatService::new(catalog, config.chat.clone()));
        Self { config, chat }
    }

    /// Returns the router this server would serve.
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.chat), &self.config)
    }

    /// Binds `0.0.0.0:<port>` and serves until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be bound or the server fails.
    pub async fn serve(self) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| Error::operation("bind", e))?;
        self.serve_on(listener, shutdown_signal()).await
    }

    /// Serves on an already-bound listener until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener
            .local_addr()
            .map_err(|e| Error::operation("local_addr", e))?;
        self.log_startup(local_addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| Error::operation("serve", e))?;

        tracing::info!("Server stopped");
        Ok(())
    }

    fn log_startup(&self, addr: SocketAddr) {
        tracing::info!(
            port = addr.port(),
            delay_min_ms = self.config.delay.min_ms,
            delay_max_ms = self.config.delay.max_ms,
            simulated_delay = self.config.simulates_delay(),
            default_source_count = self.config.chat.default_source_count,
            mode = self.config.chat.mode.as_str(),
            catalog_entries = self.chat.catalog().len(),
            "Mock chat server listening"
        );
        tracing::info!(
            chat = %format!("http://localhost:{}/api/chat", addr.port()),
            health = %format!("http://localhost:{}/health", addr.port()),
            static_dir = ?self.config.static_dir,
            "Endpoints"
        );
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
