//! Authentication extractors and role policy.
//!
//! Handlers take [`AuthUser`] when a route requires a principal, or
//! [`MaybeAuthUser`] when authentication is optional. Both verify the JWT
//! from the `Authorization` header and load the user row, so the role and
//! active flag are always current rather than trusted from the token.
//!
//! Role checks go through [`AuthenticatedUser::require_role`], the single
//! policy point, instead of per-route conditionals.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use uuid::Uuid;

use crate::auth::sessions::verify_token;
use crate::auth::users::{self, UserRole};
use crate::error::ApiError;
use crate::server::state::AppState;

/// The verified principal attached to a request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// Policy check: the principal's role must be at least `min`.
    pub fn require_role(&self, min: UserRole) -> Result<(), ApiError> {
        if self.role >= min {
            Ok(())
        } else {
            let message = match min {
                UserRole::Admin => "Admin access required",
                UserRole::Moderator => "Admin or Moderator access required",
                UserRole::User => "Authentication required",
            };
            Err(ApiError::authorization(message))
        }
    }

    /// Ownership-or-moderator check used by comment edit/delete.
    pub fn owns_or_moderates(&self, owner_id: Uuid) -> bool {
        self.id == owner_id || self.role >= UserRole::Moderator
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

async fn authenticate(state: &AppState, token: &str) -> Result<AuthenticatedUser, ApiError> {
    let claims = verify_token(token).map_err(|err| {
        tracing::debug!("token rejected: {err}");
        ApiError::authentication("Invalid or expired token")
    })?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::authentication("Invalid or expired token"))?;

    let user = users::find_by_id(&state.db_pool, user_id)
        .await?
        .ok_or_else(|| ApiError::authentication("Invalid or expired token"))?;

    if !user.is_active {
        return Err(ApiError::authentication("Account is deactivated"));
    }

    Ok(AuthenticatedUser {
        id: user.id,
        email: user.email,
        username: user.username,
        role: user.role,
    })
}

/// Extractor for routes that require authentication.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::authentication("Authentication required"))?;
        let user = authenticate(state, token).await?;
        Ok(AuthUser(user))
    }
}

/// Extractor for routes where authentication is optional. A missing or
/// invalid token yields `None` rather than a rejection.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthenticatedUser>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(MaybeAuthUser(None));
        };
        match authenticate(state, token).await {
            Ok(user) => Ok(MaybeAuthUser(Some(user))),
            Err(ApiError::Database(err)) => Err(ApiError::Database(err)),
            Err(_) => Ok(MaybeAuthUser(None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn principal(role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "mod@example.com".to_string(),
            username: "moderator".to_string(),
            role,
        }
    }

    #[test]
    fn test_require_role_hierarchy() {
        assert!(principal(UserRole::Admin).require_role(UserRole::Moderator).is_ok());
        assert!(principal(UserRole::Moderator).require_role(UserRole::Moderator).is_ok());
        let err = principal(UserRole::User)
            .require_role(UserRole::Moderator)
            .unwrap_err();
        assert!(matches!(err, ApiError::Authorization { .. }));
    }

    #[test]
    fn test_owns_or_moderates() {
        let user = principal(UserRole::User);
        assert!(user.owns_or_moderates(user.id));
        assert!(!user.owns_or_moderates(Uuid::new_v4()));
        assert!(principal(UserRole::Moderator).owns_or_moderates(Uuid::new_v4()));
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert_eq!(bearer_token(&headers), None);
    }
}
