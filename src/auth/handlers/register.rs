//! User registration handler for `POST /api/auth/register`.
//!
//! Validates input, rejects duplicate emails/usernames, hashes the password
//! with bcrypt and returns the sanitized user together with a session token.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;

use crate::auth::handlers::types::{AuthResponse, RegisterRequest};
use crate::auth::sessions::create_token;
use crate::auth::users::{self, NewUser};
use crate::error::ApiError;
use crate::response::ApiResponse;

/// Register a new user.
///
/// # Errors
///
/// * `400` - Field validation failed, or the email/username is taken
/// * `500` - Hashing, token creation or database failure
pub async fn register(
    State(pool): State<PgPool>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    if users::find_by_email(&pool, &request.email).await?.is_some() {
        return Err(ApiError::conflict("Email already registered"));
    }
    if users::find_by_username(&pool, &request.username)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict("Username already taken"));
    }

    // DEFAULT_COST is 12.
    let password_hash = hash(&request.password, DEFAULT_COST)?;

    let user = users::create_user(
        &pool,
        NewUser {
            email: request.email,
            username: request.username,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
        },
    )
    .await?;

    let token = create_token(user.id, &user.email)?;
    tracing::info!("user registered: {} ({})", user.username, user.email);

    Ok(ApiResponse::created(
        "User registered successfully",
        AuthResponse {
            user: user.into(),
            token,
        },
    ))
}
