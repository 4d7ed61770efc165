//! Login handler for `POST /api/auth/login`.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use bcrypt::verify;
use sqlx::PgPool;

use crate::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::auth::sessions::create_token;
use crate::auth::users;
use crate::error::ApiError;
use crate::response::ApiResponse;

/// Authenticate a user by email and password.
///
/// Unknown emails and wrong passwords produce the identical message so the
/// endpoint cannot be used to enumerate accounts.
///
/// # Errors
///
/// * `401` - Unknown email, wrong password, or deactivated account
/// * `500` - Database or token failure
pub async fn login(
    State(pool): State<PgPool>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let user = users::find_by_email(&pool, &request.email)
        .await?
        .ok_or_else(|| ApiError::authentication("Invalid email or password"))?;

    if !user.is_active {
        return Err(ApiError::authentication("Account is deactivated"));
    }

    if !verify(&request.password, &user.password_hash)? {
        tracing::debug!("password mismatch for {}", user.email);
        return Err(ApiError::authentication("Invalid email or password"));
    }

    let token = create_token(user.id, &user.email)?;
    tracing::info!("user logged in: {}", user.username);

    Ok(ApiResponse::ok(
        "Login successful",
        AuthResponse {
            user: user.into(),
            token,
        },
    ))
}
