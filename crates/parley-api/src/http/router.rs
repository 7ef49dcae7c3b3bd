//! Axum router configuration with middleware.
//!
//! All API routes are under `/api/`. Unknown API paths (and unsupported
//! methods on known ones) answer `404 {"error":"API route not found"}`.
//! Middleware: CORS, tracing.
//!
//! When a web client build directory exists (`PARLEY_WEB_DIR`, default
//! `client/dist`), every other path is served from it, falling back to
//! `index.html` for client-side routing.

use std::path::{Path, PathBuf};

use axum::Router;
use axum::routing::{any, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::error::AppError;
use crate::http::handlers;
use crate::state::AppState;

/// Web client directory from `PARLEY_WEB_DIR`, if it exists on disk.
pub fn web_dir_from_env() -> Option<PathBuf> {
    let dir = std::env::var("PARLEY_WEB_DIR").unwrap_or_else(|_| "client/dist".to_string());
    let dir = PathBuf::from(dir);
    dir.is_dir().then_some(dir)
}

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState, web_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route(
            "/api/health",
            get(handlers::health::health_check).fallback(api_not_found),
        )
        .route(
            "/api/messages",
            get(handlers::messages::list_messages).fallback(api_not_found),
        )
        .route(
            "/api/send",
            post(handlers::messages::send_message).fallback(api_not_found),
        )
        .route("/api", any(api_not_found))
        .route("/api/", any(api_not_found))
        .route("/api/{*rest}", any(api_not_found))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if let Some(web_dir) = web_dir {
        let serve_dir = ServeDir::new(web_dir).fallback(ServeFile::new(web_dir.join("index.html")));
        router = router.fallback_service(serve_dir);
        tracing::info!(path = %web_dir.display(), "Web client static file serving enabled");
    }

    router
}

async fn api_not_found() -> AppError {
    AppError::NotFound("API route not found".to_string())
}
