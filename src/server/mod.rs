//! Server bootstrap.
//!
//! - **`config`** - Environment configuration and database pool creation
//! - **`state`** - `AppState` and `FromRef` implementations
//! - **`init`** - Application assembly

pub mod config;
pub mod init;
pub mod state;

pub use config::ServerConfig;
pub use init::{build_app, create_app};
pub use state::AppState;
