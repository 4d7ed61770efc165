//! Blog posts: the main content resource.

pub mod db;
pub mod handlers;
pub mod types;

pub use types::ContentStatus;
