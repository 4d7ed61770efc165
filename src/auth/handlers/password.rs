//! Password change handler for `PUT /api/auth/change-password`.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;

use crate::auth::handlers::types::ChangePasswordRequest;
use crate::auth::users;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;

/// Change the authenticated user's password after verifying the current one.
///
/// # Errors
///
/// * `400` - Current password does not match, or new password too short
/// * `404` - Principal no longer exists
pub async fn change_password(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let user = users::find_by_id(&pool, principal.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if !verify(&request.current_password, &user.password_hash)? {
        return Err(ApiError::validation("Current password is incorrect"));
    }

    let password_hash = hash(&request.new_password, DEFAULT_COST)?;
    users::update_password(&pool, user.id, &password_hash).await?;
    tracing::info!("password changed for {}", user.username);

    Ok(ApiResponse::message("Password changed successfully"))
}
