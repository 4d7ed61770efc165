//! Authentication: user accounts, password hashing and JWT sessions.
//!
//! - **`users`** - User model, roles and database operations
//! - **`sessions`** - JWT token creation and verification
//! - **`handlers`** - HTTP handlers for `/api/auth`

pub mod handlers;
pub mod sessions;
pub mod users;
