//! Profile handlers for `GET /api/auth/profile` and `PUT /api/auth/profile`.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use sqlx::PgPool;

use crate::auth::handlers::types::{UpdateProfileRequest, UserResponse};
use crate::auth::users;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;

/// Return the authenticated user's profile.
pub async fn get_profile(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let user = users::find_by_id(&pool, principal.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::ok(
        "Profile retrieved successfully",
        UserResponse::from(user),
    ))
}

/// Update the authenticated user's own profile. Only first name, last name
/// and avatar are editable here.
pub async fn update_profile(
    State(pool): State<PgPool>,
    AuthUser(principal): AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let user = users::update_profile(
        &pool,
        principal.id,
        request.first_name.as_deref(),
        request.last_name.as_deref(),
        request.avatar.as_deref(),
    )
    .await?;

    Ok(ApiResponse::ok(
        "Profile updated successfully",
        UserResponse::from(user),
    ))
}
