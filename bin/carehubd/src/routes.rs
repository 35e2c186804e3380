//! Route registration — module routes under /api plus system endpoints.

use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

/// Build the complete router. Module routers carry their own path
/// prefixes ("/auth/...", "/patients/...") and land under /api; the
/// system endpoints stay at the root.
pub fn build_router(module_routes: Vec<(&str, Router)>) -> Router {
    let mut api = Router::new();
    for (_name, router) in module_routes {
        api = api.merge(router);
    }

    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .nest("/api", api)
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "carehubd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
