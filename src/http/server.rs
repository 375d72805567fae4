//! HTTP server setup and graceful shutdown

use axum::{middleware::from_fn_with_state, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::cache::SnapshotCache;
use crate::error::{Error, Result};
use crate::http::handlers::{handle_info, handle_not_found, AppState};
use crate::http::middleware::{access_log_middleware, AccessSink, StdoutSink};

/// Fixed listen address. The sidecar always answers on 8080, all interfaces.
const LISTEN_ADDR: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED),
    8080,
);

/// Bind the listener and serve until the shutdown signal resolves.
pub async fn start_server(
    cache: Arc<SnapshotCache>,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app_state = Arc::new(AppState { cache });
    let router = create_router(app_state, Arc::new(StdoutSink));

    let listener = TcpListener::bind(LISTEN_ADDR).await.map_err(|e| {
        error!(error = %e, addr = %LISTEN_ADDR, "failed to bind listen address");
        Error::Io(e)
    })?;

    info!(
        local_addr = %listener.local_addr().unwrap_or(LISTEN_ADDR),
        "HTTP server listening"
    );

    let server = axum::serve(listener, router).with_graceful_shutdown(async {
        shutdown_signal.await;
        info!("shutdown signal received, starting graceful shutdown");
    });

    if let Err(e) = server.await {
        error!(error = %e, "HTTP server error");
        return Err(Error::Io(e));
    }

    info!("HTTP server shutdown complete");
    Ok(())
}

/// Create the router. The access log middleware wraps every route,
/// the fallback included, so no request escapes logging.
fn create_router(app_state: Arc<AppState>, sink: Arc<dyn AccessSink>) -> Router {
    Router::new()
        .route("/info", get(handle_info))
        .fallback(handle_not_found)
        .layer(from_fn_with_state(sink, access_log_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
