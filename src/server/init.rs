//! Application assembly.

use axum::Router;
use sqlx::PgPool;

use crate::routes::router::create_router;
use crate::server::config::{load_database, ServerConfig};
use crate::server::state::AppState;

/// Build the application router from an existing pool and configuration.
///
/// Split from [`create_app`] so tests can inject their own pool.
pub fn build_app(pool: PgPool, config: &ServerConfig) -> Router {
    let state = AppState { db_pool: pool };
    create_router(state, config)
}

/// Connect to the database, run migrations and build the full application.
pub async fn create_app(config: &ServerConfig) -> Result<Router, sqlx::Error> {
    tracing::info!("initializing babil backend server");
    let pool = load_database().await?;
    Ok(build_app(pool, config))
}
