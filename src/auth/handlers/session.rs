//! Session handlers: `POST /api/auth/logout` and `POST /api/auth/refresh`.

use axum::response::IntoResponse;

use crate::auth::handlers::types::TokenResponse;
use crate::auth::sessions::create_token;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;

/// Logout. Tokens are stateless, so there is nothing to invalidate
/// server-side; clients discard the token.
pub async fn logout() -> impl IntoResponse {
    ApiResponse::message("Logout successful")
}

/// Reissue a token for the already-authenticated principal.
pub async fn refresh_token(AuthUser(principal): AuthUser) -> Result<impl IntoResponse, ApiError> {
    let token = create_token(principal.id, &principal.email)?;
    Ok(ApiResponse::ok(
        "Token refreshed successfully",
        TokenResponse { token },
    ))
}
