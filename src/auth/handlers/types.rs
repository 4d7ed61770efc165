//! Request and response types for the auth handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::users::{User, UserRole};
use crate::error::ApiError;
use crate::validation::{is_valid_email, is_valid_username, len_between, optional, Validator};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.check("email", is_valid_email(&self.email), "Valid email is required");
        v.check(
            "username",
            is_valid_username(&self.username),
            "Username must be 3-20 characters, alphanumeric and underscores only",
        );
        v.check(
            "password",
            self.password.len() >= 6,
            "Password must be at least 6 characters",
        );
        v.check(
            "firstName",
            optional(self.first_name.as_deref(), |s| len_between(s, 1, 50)),
            "First name must be 1-50 characters",
        );
        v.check(
            "lastName",
            optional(self.last_name.as_deref(), |s| len_between(s, 1, 50)),
            "Last name must be 1-50 characters",
        );
        v.finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.check("email", is_valid_email(&self.email), "Valid email is required");
        v.check("password", !self.password.is_empty(), "Password is required");
        v.finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.check(
            "firstName",
            optional(self.first_name.as_deref(), |s| len_between(s, 1, 50)),
            "First name must be 1-50 characters",
        );
        v.check(
            "lastName",
            optional(self.last_name.as_deref(), |s| len_between(s, 1, 50)),
            "Last name must be 1-50 characters",
        );
        v.finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl ChangePasswordRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Validator::new();
        v.check(
            "currentPassword",
            !self.current_password.is_empty(),
            "Current password is required",
        );
        v.check(
            "newPassword",
            self.new_password.len() >= 6,
            "Password must be at least 6 characters",
        );
        v.finish()
    }
}

/// User fields safe to return to clients. Never contains the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            avatar: user.avatar,
            bio: user.bio,
            role: user.role,
            is_active: user.is_active,
            email_verified: user.email_verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_field_errors() {
        let request = RegisterRequest {
            email: "not-an-email".to_string(),
            username: "x".to_string(),
            password: "short".to_string(),
            first_name: None,
            last_name: None,
        };
        match request.validate().unwrap_err() {
            ApiError::Validation { errors, .. } => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["email", "username", "password"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_register_request_valid() {
        let request = RegisterRequest {
            email: "a@b.com".to_string(),
            username: "abc".to_string(),
            password: "secret1".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: None,
        };
        assert!(request.validate().is_ok());
    }
}
