use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::catalog::HttpCatalog;
use crate::config::AppConfig;
use crate::handlers;
use crate::session::{MemorySessionStore, session_cookie_middleware};
use crate::views::Templates;

/// How often idle sessions are swept.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Build the application router.
///
/// Unmatched paths fall through to the static asset directory.
pub fn build_router(state: AppState) -> Router {
    let timeout_duration = state.config.request_timeout();

    Router::new()
        .route("/", get(handlers::home))
        .route("/action", post(handlers::add_comparison))
        .route("/comparisons", get(handlers::comparisons))
        .route("/comparisons/remove", post(handlers::remove_comparison))
        .route("/favorite/toggle", post(handlers::toggle_favorite))
        .fallback_service(ServeDir::new(&state.config.server.static_dir))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_cookie_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(
            move |req: Request, next: Next| async move {
                match tokio::time::timeout(timeout_duration, next.run(req)).await {
                    Ok(res) => res,
                    Err(_) => (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response(),
                }
            },
        ))
        .with_state(state)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let catalog = HttpCatalog::new(&config.catalog.base_url, config.catalog_timeout())?;
    info!(
        name: "catalog.config.loaded",
        base_url = %catalog.base_url(),
        timeout_secs = config.catalog.timeout_secs,
        "Catalog API configured"
    );

    let sessions = MemorySessionStore::new();
    sessions.spawn_sweeper(config.session_ttl(), SESSION_SWEEP_INTERVAL);

    let state = AppState {
        catalog: Arc::new(catalog),
        sessions: Arc::new(sessions),
        templates: Arc::new(Templates::new()?),
        config: Arc::clone(&config),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
