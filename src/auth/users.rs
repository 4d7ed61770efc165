//! User model and database operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Flat role hierarchy. Ordering follows privilege: `User < Moderator <
/// Admin`, which is what the policy check in `middleware::auth` relies on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Moderator,
    Admin,
}

/// A user row. The password hash never leaves this type; responses are
/// shaped through `auth::handlers::types::UserResponse`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
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

const USER_COLUMNS: &str = "id, email, username, password_hash, first_name, last_name, avatar, \
     bio, role, is_active, email_verified, created_at, updated_at";

/// Fields required to create a user. Role always starts as `USER`.
#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub async fn create_user(pool: &PgPool, new_user: NewUser) -> Result<User, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO users (id, email, username, password_hash, first_name, last_name, role)
        VALUES ($1, $2, $3, $4, $5, $6, 'USER')
        RETURNING {USER_COLUMNS}
        "#
    );
    sqlx::query_as::<_, User>(&query)
        .bind(Uuid::new_v4())
        .bind(&new_user.email)
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .fetch_one(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
    sqlx::query_as::<_, User>(&query)
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
    sqlx::query_as::<_, User>(&query)
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Update the profile fields a user may edit themselves.
pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    first_name: Option<&str>,
    last_name: Option<&str>,
    avatar: Option<&str>,
) -> Result<User, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE users
        SET first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            avatar = COALESCE($4, avatar),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    );
    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .bind(avatar)
        .fetch_one(pool)
        .await
}

pub async fn update_password(
    pool: &PgPool,
    id: Uuid,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ordering_matches_privilege() {
        assert!(UserRole::User < UserRole::Moderator);
        assert!(UserRole::Moderator < UserRole::Admin);
        assert!(UserRole::Admin >= UserRole::Moderator);
    }

    #[test]
    fn test_role_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&UserRole::Moderator).unwrap(),
            "\"MODERATOR\""
        );
        let parsed: UserRole = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(parsed, UserRole::Admin);
    }
}
