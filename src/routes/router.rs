//! Router assembly.

use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::locale::locale_middleware;
use crate::routes::api_routes::configure_api_routes;
use crate::server::config::ServerConfig;
use crate::server::state::AppState;

/// `GET /health`
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "OK",
        "message": "Babil blog API is running",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /api` - endpoint index.
async fn api_index() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Welcome to the Babil blog API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "auth": "/api/auth",
            "posts": "/api/posts",
            "categories": "/api/categories",
            "tags": "/api/tags",
            "comments": "/api/comments",
            "staticPages": "/api/static-pages",
            "languages": "/api/languages",
        },
    }))
}

async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "success": false,
            "message": format!("Cannot {method} {uri}"),
        })),
    )
}

fn cors_layer(origin: &str) -> CorsLayer {
    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT_LANGUAGE,
        ])
        .allow_credentials(true);
    match origin.parse::<HeaderValue>() {
        Ok(value) => cors = cors.allow_origin(value),
        Err(_) => tracing::warn!("invalid CORS_ORIGIN, allowing no cross-origin requests"),
    }
    cors
}

/// Create the router with all routes and layers configured.
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/api", get(api_index));

    let router = configure_api_routes(router);

    router
        .fallback(not_found)
        .layer(axum::middleware::from_fn(locale_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origin))
        .with_state(state)
}
