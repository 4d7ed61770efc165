//! Application state.
//!
//! The state holds only the database pool: every request re-reads from
//! storage and the application keeps no authoritative in-memory state.

use axum::extract::FromRef;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
}

/// Lets handlers take `State<PgPool>` directly.
impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}
