//! Local API router.
//!
//! Returns a composable `Router` with every endpoint nested under `/api/`.
//! When configured, the built browser view is served from a static
//! directory as the fallback, and a permissive CORS layer is added for a
//! separate dev server.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Build the local API router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(core: Arc<CoreState>) -> Router {
    let config = core.config().clone();
    let ctx = ApiContext::new(core);

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/classifier/health", get(endpoints::health::classifier))
        .route("/analyses", post(endpoints::analyses::upload))
        .route("/analyses/url", post(endpoints::analyses::from_url))
        .route("/analyses/current", get(endpoints::analyses::current))
        .route("/history", get(endpoints::history::list))
        .route("/history/:index/select", post(endpoints::history::select))
        .route("/chat", get(endpoints::chat::snapshot))
        .route("/chat/messages", post(endpoints::chat::send))
        .layer(DefaultBodyLimit::max(
            config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES,
        ))
        .with_state(ctx);

    let mut app = Router::new().nest("/api", api);

    if let Some(dir) = &config.static_dir {
        tracing::info!(dir = %dir.display(), "Serving browser view from static directory");
        app = app.fallback_service(ServeDir::new(dir));
    }
    if config.cors_permissive {
        app = app.layer(CorsLayer::permissive());
    }

    app
}
