//! Server initialization and routing
//!
//! Router setup, middleware stack and graceful shutdown.

use crate::config::ServerConfig;
use crate::middleware::{log_requests, request_id};
use crate::routes::{api_info, health, not_found, reports};
use crate::state::ServerState;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use codesim::{EmbeddingProvider, SimilarityEngine};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Build the Axum router with all routes and middleware
///
/// Middleware, outermost first:
/// 1. Tracing
/// 2. Request ID tracking
/// 3. Request logging
/// 4. CORS
/// 5. Timeout handling
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let api_routes = Router::new()
        .route("/api/v1/languages", get(reports::list_languages))
        .route("/api/v1/reports", post(reports::create_report))
        .layer(DefaultBodyLimit::max(state.config.max_body_size()));

    Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .merge(api_routes)
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.timeout(),
        ))
        .layer(cors)
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Install the JSON log subscriber. `RUST_LOG` wins over `log_level`.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .init();
}

/// Start the codesim HTTP server
///
/// Blocks until SIGTERM or Ctrl+C. The engine is passed in already built:
/// providers with a blocking HTTP client must be created and dropped outside
/// the async runtime, so the caller keeps its own `Arc` alive past this call.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use codesim::{build_provider, SimilarityEngine};
/// use server::ServerConfig;
///
/// fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     let pipeline = config.pipeline()?;
///     let provider = build_provider(&pipeline.embedding)?;
///     let engine = Arc::new(SimilarityEngine::new(provider, pipeline.engine_config()));
///
///     let runtime = tokio::runtime::Runtime::new()?;
///     runtime.block_on(server::start_server(config, engine.clone()))?;
///     Ok(())
/// }
/// ```
pub async fn start_server(
    config: ServerConfig,
    engine: Arc<SimilarityEngine>,
) -> anyhow::Result<()> {
    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(
        provider = engine.provider().name(),
        dimension = engine.provider().dimension(),
        threshold = engine.config().threshold,
        "engine_ready"
    );
    tracing::info!(
        "Timeout: {}s, Max body: {}MB, CORS: {}",
        config.timeout_secs,
        config.max_body_size_mb,
        config.enable_cors
    );

    let state = Arc::new(ServerState::new(config, engine));
    let app = build_router(state);

    tracing::info!("Starting codesim server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
