//! HTTP handlers for `/api/auth`.

pub mod login;
pub mod password;
pub mod profile;
pub mod register;
pub mod session;
pub mod types;

pub use login::login;
pub use password::change_password;
pub use profile::{get_profile, update_profile};
pub use register::register;
pub use session::{logout, refresh_token};
